//! COT Ports
//!
//! Boundary definitions for the COT metrics engine.
//! These define the seams between the engine and the external
//! acquisition / presentation stages.

mod config;
mod error;
mod store;

pub use config::EngineConfig;
pub use error::{BuildError, BuildResult};
pub use store::{MetricsSink, PositionsSource};
