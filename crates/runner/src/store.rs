//! In-memory source/sink
//!
//! Stands in for the external columnar storage in tests and local wiring;
//! production deployments implement the ports against their own storage.

use cot_core::{MetricsTable, WeeklyPosition};
use cot_ports::{BuildResult, MetricsSink, PositionsSource};

/// Holds canonical rows and captures the released table
#[derive(Debug, Default)]
pub struct MemoryStore {
    positions: Vec<WeeklyPosition>,
    released: Option<MetricsTable>,
}

impl MemoryStore {
    /// Store seeded with canonical rows
    pub fn with_positions(positions: Vec<WeeklyPosition>) -> Self {
        Self {
            positions,
            released: None,
        }
    }

    /// The table the pipeline released, if any run has succeeded
    pub fn released(&self) -> Option<&MetricsTable> {
        self.released.as_ref()
    }
}

impl PositionsSource for MemoryStore {
    fn load_positions(&self) -> BuildResult<Vec<WeeklyPosition>> {
        Ok(self.positions.clone())
    }
}

impl MetricsSink for MemoryStore {
    fn store_metrics(&mut self, table: &MetricsTable) -> BuildResult<()> {
        self.released = Some(table.clone());
        Ok(())
    }
}
