//! COT Metrics Builder
//!
//! Derives the full analytic column set from canonical weekly positions:
//!
//! - **Resolver**: structural checks and per-market partitioning
//! - **Heat**: min/max/percentile-position over expanding and trailing windows
//! - **Changes**: week-over-week deltas and net-side flip detection
//! - **Rebalance**: decomposition of two-sided turnover into directional
//!   and offsetting components
//! - **Alignment**: primary-group side agreement and magnitude divergence
//! - **Shares**: per-group share of combined gross exposure
//! - **Builder**: assembles everything into a [`cot_core::MetricsTable`]
//!
//! The builder is a pure batch transformation: no I/O, no shared mutable
//! state, and per-market sequences are computed independently.

pub mod alignment;
pub mod builder;
pub mod changes;
pub mod heat;
pub mod rebalance;
pub mod resolver;
pub mod shares;

pub use builder::MetricsBuilder;
pub use heat::HeatPoint;
pub use resolver::MarketSeries;
