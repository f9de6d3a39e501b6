//! COT Validation Suite
//!
//! Terminal, blocking QA gate for the assembled metrics table. Every
//! metric family is re-derived from the canonical input with this crate's
//! own loops - no code shared with the builder beyond the domain types -
//! and compared within a small numeric tolerance.
//!
//! Checks run against the complete table, never a sample; failures are
//! collected exhaustively rather than fail-fast, and any non-empty report
//! blocks the table's release downstream.

mod report;
mod suite;

pub use report::{ValidationReport, Violation};
pub use suite::ValidationSuite;
