//! Build-and-gate pipeline
//!
//! Structural errors abort before the table is assembled; everything else
//! is collected by the validation suite and reported in one pass, so a
//! single run surfaces every defect at once.

use cot_core::{MetricsTable, WeeklyPosition};
use cot_metrics::MetricsBuilder;
use cot_ports::{BuildError, BuildResult, EngineConfig, MetricsSink, PositionsSource};
use cot_validate::{ValidationReport, ValidationSuite};
use log::{info, warn};

/// Build the derived table and check it, returning both
///
/// The caller owns the gate decision: an empty report means the table is
/// usable, a non-empty one means it is contractually forbidden to persist
/// or serve it (see [`release`]).
pub fn build_metrics(
    positions: &[WeeklyPosition],
    config: &EngineConfig,
) -> BuildResult<(MetricsTable, ValidationReport)> {
    let table = MetricsBuilder::with_config(config.clone()).build(positions)?;
    let report = ValidationSuite::with_config(config.clone()).check(positions, &table);

    if report.is_empty() {
        info!("[runner] built {} rows, validation PASS", table.len());
    } else {
        for violation in report.iter() {
            warn!("[runner] {violation}");
        }
        warn!(
            "[runner] validation FAIL: {} violation(s), table must not be released",
            report.len()
        );
    }
    Ok((table, report))
}

/// Enforce the gate: a table only leaves the engine with an empty report
pub fn release(table: MetricsTable, report: &ValidationReport) -> BuildResult<MetricsTable> {
    if report.is_empty() {
        Ok(table)
    } else {
        Err(BuildError::ValidationRejected {
            violations: report.len(),
        })
    }
}

/// Full run against a source/sink pair: load, build, gate, store
pub fn run<S, K>(source: &S, sink: &mut K, config: &EngineConfig) -> BuildResult<MetricsTable>
where
    S: PositionsSource,
    K: MetricsSink,
{
    let positions = source.load_positions()?;
    info!("[runner] loaded {} canonical rows", positions.len());

    let (table, report) = build_metrics(&positions, config)?;
    let table = release(table, &report)?;
    sink.store_metrics(&table)?;
    Ok(table)
}
