//! Rebalance decomposer
//!
//! A group's long and short legs move independently; the portion of gross
//! two-sided movement not reflected in net movement is pure rebalancing
//! (simultaneous long+short adjustment that cancels out). The triangle
//! inequality guarantees `gross_chg >= |net_chg|`, so the rebalance
//! component is never negative.

use cot_core::RebalanceMetrics;
use rust_decimal::Decimal;

/// Decompose one week's leg changes into directional and offsetting parts
///
/// All fields are `None` on a market's first row (no prior week). The
/// share is additionally `None` when there was no turnover at all.
pub fn decompose(
    long_chg: Option<Decimal>,
    short_chg: Option<Decimal>,
    net_chg: Option<Decimal>,
) -> RebalanceMetrics {
    let gross_chg_1w = match (long_chg, short_chg) {
        (Some(l), Some(s)) => Some(l.abs() + s.abs()),
        _ => None,
    };
    let net_abs_chg_1w = net_chg.map(|n| n.abs());
    let rebalance_chg_1w = match (gross_chg_1w, net_abs_chg_1w) {
        (Some(gross), Some(net)) => Some(gross - net),
        _ => None,
    };
    let rebalance_share_1w = match (rebalance_chg_1w, gross_chg_1w) {
        (Some(rebalance), Some(gross)) if gross > Decimal::ZERO => Some(rebalance / gross),
        _ => None,
    };

    RebalanceMetrics {
        gross_chg_1w,
        net_abs_chg_1w,
        rebalance_chg_1w,
        rebalance_share_1w,
    }
}
