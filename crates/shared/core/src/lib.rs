//! COT Core Domain
//!
//! Pure domain types for the COT positioning metrics engine.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;

// Re-export commonly used types at crate root
pub use entities::{
    // Cross-group analysis
    CrossMetrics,
    // Group axis
    GroupMetrics,
    GroupSet,
    Leg,
    LegMetrics,
    // Derived metrics
    MetricsRow,
    MetricsTable,
    NetAlignment,
    NetMetrics,
    // Net exposure
    NetSide,
    RebalanceMetrics,
    ShareMetrics,
    TraderGroup,
    // Canonical input
    WeeklyPosition,
};
