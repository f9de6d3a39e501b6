//! Exposure share calculator
//!
//! Each active group's share of the combined gross exposure across all
//! active groups, its week-over-week change in percentage points, and
//! gross exposure as a fraction of open interest. The share denominator
//! is the groups' own gross sum, not open interest - open interest enters
//! only through `gross_pct_oi`.

use cot_core::ShareMetrics;
use rust_decimal::Decimal;

use crate::changes;

/// Share metrics for one group across one market's series
///
/// `grosses` is the group's gross series, `totals` the per-row sum of all
/// active groups' gross exposure, `open_interest` the per-row OI.
pub fn share_series(
    grosses: &[Decimal],
    totals: &[Decimal],
    open_interest: &[Decimal],
) -> Vec<ShareMetrics> {
    debug_assert_eq!(grosses.len(), totals.len());
    debug_assert_eq!(grosses.len(), open_interest.len());

    let shares: Vec<Option<Decimal>> = grosses
        .iter()
        .zip(totals)
        .map(|(gross, total)| {
            if *total > Decimal::ZERO {
                Some(*gross / *total)
            } else {
                None
            }
        })
        .collect();
    let share_chgs = changes::diff_opt(&shares);

    (0..grosses.len())
        .map(|i| ShareMetrics {
            gross: grosses[i],
            gross_share: shares[i],
            gross_share_chg_1w_pp: share_chgs[i],
            gross_pct_oi: if open_interest[i] > Decimal::ZERO {
                Some(grosses[i] / open_interest[i])
            } else {
                None
            },
        })
        .collect()
}
