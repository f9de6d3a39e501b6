//! Alignment & divergence analyzer
//!
//! Compares the two primary groups' net exposure across one market's
//! series: side agreement, the speculative-vs-hedging net spread, and the
//! magnitude gap with its trailing heat range. The optional nonreportable
//! group takes no part in this comparison; its presence appends per-group
//! columns elsewhere without touching this family.

use cot_core::{CrossMetrics, NetAlignment, NetSide};
use cot_ports::EngineConfig;
use rust_decimal::Decimal;

use crate::{changes, heat};

/// Cross-group metrics for one market, one entry per row
///
/// `nc_nets` and `comm_nets` are the primaries' net series, already in
/// strict date order.
pub fn cross_series(
    nc_nets: &[Decimal],
    comm_nets: &[Decimal],
    config: &EngineConfig,
) -> Vec<CrossMetrics> {
    debug_assert_eq!(nc_nets.len(), comm_nets.len());

    let spreads: Vec<Decimal> = nc_nets
        .iter()
        .zip(comm_nets)
        .map(|(nc, comm)| *nc - *comm)
        .collect();
    let spread_chgs = changes::diff(&spreads);

    let gaps: Vec<Decimal> = nc_nets
        .iter()
        .zip(comm_nets)
        .map(|(nc, comm)| nc.abs() - comm.abs())
        .collect();
    let gap_chgs = changes::diff(&gaps);
    let gap_heat = heat::trailing_ranges(&gaps, config.trailing_window_weeks, config.warmup_weeks);

    (0..nc_nets.len())
        .map(|i| {
            let alignment = NetAlignment::compare(
                NetSide::from_net(nc_nets[i]),
                NetSide::from_net(comm_nets[i]),
            );
            CrossMetrics {
                spec_vs_hedge_net: spreads[i],
                spec_vs_hedge_net_chg_1w: spread_chgs[i],
                net_alignment: alignment,
                net_mag_gap: gaps[i],
                net_mag_gap_chg_1w: gap_chgs[i],
                net_mag_gap_min_5y: gap_heat[i].map(|p| p.min),
                net_mag_gap_max_5y: gap_heat[i].map(|p| p.max),
                net_mag_gap_pos_5y: gap_heat[i].and_then(|p| p.pos),
            }
        })
        .collect()
}
