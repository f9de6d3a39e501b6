use cot_core::{MetricsTable, WeeklyPosition};

use crate::error::BuildResult;

/// Source of canonical weekly positions
///
/// Implemented by the upstream normalization stage (columnar storage in
/// production, in-memory fixtures in tests). The engine never reads files
/// itself.
pub trait PositionsSource {
    /// Load the full canonical table, ordered by (market_key, report_date)
    fn load_positions(&self) -> BuildResult<Vec<WeeklyPosition>>;
}

/// Destination for a validated metrics table
///
/// Implemented by the downstream presentation stage. Callers must only
/// hand over tables whose validation report is empty.
pub trait MetricsSink {
    /// Persist or forward the released table
    fn store_metrics(&mut self, table: &MetricsTable) -> BuildResult<()>;
}
