//! COT Runner - Engine Orchestration
//!
//! Wires the metrics builder and the validation suite into the engine's
//! single public operation:
//!
//! - **Pipeline**: `build_metrics` produces the table together with its
//!   validation report; `release` converts a non-empty report into a
//!   rejection; `run` drives a source/sink pair end to end
//! - **Store**: in-memory implementation of the source/sink ports for
//!   wiring and tests
//!
//! A non-empty report is fatal by contract: the accompanying table must
//! never be persisted or served.

pub mod pipeline;
pub mod store;

// Re-export main types
pub use pipeline::{build_metrics, release, run};
pub use store::MemoryStore;

/// Initialize env_logger once, tolerant of repeat calls from tests
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .try_init();
}
