//! Metrics table assembly
//!
//! Orchestrates the component calculators across the active group set and
//! every market series, producing one [`MetricsRow`] per canonical row.
//! The table is rebuilt from scratch on every run; identical input yields
//! an identical table.

use std::collections::BTreeMap;

use cot_core::{
    GroupMetrics, GroupSet, LegMetrics, MetricsRow, MetricsTable, NetMetrics, NetSide,
    TraderGroup, WeeklyPosition,
};
use cot_ports::{BuildResult, EngineConfig};
use log::{debug, info};
use rust_decimal::Decimal;

use crate::resolver::MarketSeries;
use crate::{alignment, changes, heat, rebalance, resolver, shares};

/// Derives the full metric set from canonical weekly positions
pub struct MetricsBuilder {
    config: EngineConfig,
}

impl MetricsBuilder {
    /// Builder with the default policy constants
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Builder with custom policy constants
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Build the derived table for the whole canonical input
    ///
    /// Structural violations abort before any derivation; everything else
    /// is left for the validation suite to judge.
    pub fn build(&self, positions: &[WeeklyPosition]) -> BuildResult<MetricsTable> {
        let (groups, markets) = resolver::resolve(positions)?;
        info!(
            "[metrics] building {} rows across {} markets ({} groups)",
            positions.len(),
            markets.len(),
            groups.len()
        );

        let mut rows = Vec::with_capacity(positions.len());
        for series in &markets {
            debug!(
                "[metrics] market {}: {} weeks",
                series.market_key,
                series.len()
            );
            rows.extend(self.build_market(&groups, series));
        }

        Ok(MetricsTable::new(rows))
    }

    /// Derive every metric family for one market's series
    fn build_market(&self, groups: &GroupSet, series: &MarketSeries<'_>) -> Vec<MetricsRow> {
        let n = series.len();
        let open_interest: Vec<Decimal> =
            series.rows.iter().map(|r| r.open_interest_all).collect();

        // Leg value series per group, computed once
        let longs: BTreeMap<TraderGroup, Vec<Decimal>> =
            groups.iter().map(|g| (g, series.longs(g))).collect();
        let shorts: BTreeMap<TraderGroup, Vec<Decimal>> =
            groups.iter().map(|g| (g, series.shorts(g))).collect();
        let totals: BTreeMap<TraderGroup, Vec<Decimal>> = groups
            .iter()
            .map(|g| {
                let sums = longs[&g]
                    .iter()
                    .zip(&shorts[&g])
                    .map(|(l, s)| *l + *s)
                    .collect();
                (g, sums)
            })
            .collect();

        // Per-row sum of all active groups' gross exposure (share denominator)
        let combined_gross: Vec<Decimal> = (0..n)
            .map(|i| groups.iter().map(|g| totals[&g][i]).sum())
            .collect();

        let mut per_group: BTreeMap<TraderGroup, Vec<GroupMetrics>> = BTreeMap::new();
        for group in groups.iter() {
            let long_legs = self.leg_metrics(&longs[&group]);
            let short_legs = self.leg_metrics(&shorts[&group]);
            let total_legs = self.leg_metrics(&totals[&group]);

            let nets: Vec<Decimal> = longs[&group]
                .iter()
                .zip(&shorts[&group])
                .map(|(l, s)| *l - *s)
                .collect();
            let net_chgs = changes::diff(&nets);
            let sides: Vec<NetSide> = nets.iter().map(|n| NetSide::from_net(*n)).collect();
            let flip_flags = changes::flips(&sides);

            let share_metrics =
                shares::share_series(&totals[&group], &combined_gross, &open_interest);

            let assembled = (0..n)
                .map(|i| GroupMetrics {
                    rebalance: rebalance::decompose(
                        long_legs[i].chg_1w,
                        short_legs[i].chg_1w,
                        net_chgs[i],
                    ),
                    net: NetMetrics {
                        value: nets[i],
                        chg_1w: net_chgs[i],
                        side: sides[i],
                        flip_1w: flip_flags[i],
                    },
                    long: long_legs[i].clone(),
                    short: short_legs[i].clone(),
                    total: total_legs[i].clone(),
                    share: share_metrics[i].clone(),
                })
                .collect();
            per_group.insert(group, assembled);
        }

        let cross = alignment::cross_series(
            &per_group[&TraderGroup::NonCommercial]
                .iter()
                .map(|g| g.net.value)
                .collect::<Vec<_>>(),
            &per_group[&TraderGroup::Commercial]
                .iter()
                .map(|g| g.net.value)
                .collect::<Vec<_>>(),
            &self.config,
        );

        (0..n)
            .map(|i| MetricsRow {
                market_key: series.market_key.to_string(),
                report_date: series.rows[i].report_date,
                open_interest_all: open_interest[i],
                groups: groups
                    .iter()
                    .map(|g| (g, per_group[&g][i].clone()))
                    .collect(),
                cross: cross[i].clone(),
            })
            .collect()
    }

    /// Heat ranges and first differences for one value series
    fn leg_metrics(&self, values: &[Decimal]) -> Vec<LegMetrics> {
        let expanding = heat::expanding_ranges(values);
        let trailing = heat::trailing_ranges(
            values,
            self.config.trailing_window_weeks,
            self.config.warmup_weeks,
        );
        let chgs = changes::diff(values);

        (0..values.len())
            .map(|i| LegMetrics {
                value: values[i],
                min_all: expanding[i].min,
                max_all: expanding[i].max,
                pos_all: expanding[i].pos,
                min_5y: trailing[i].map(|p| p.min),
                max_5y: trailing[i].map(|p| p.max),
                pos_5y: trailing[i].and_then(|p| p.pos),
                chg_1w: chgs[i],
            })
            .collect()
    }
}

impl Default for MetricsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cot_core::NetAlignment;
    use rust_decimal_macros::dec;

    fn date(week: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap() + chrono::Duration::weeks(week as i64)
    }

    fn short_warmup() -> MetricsBuilder {
        MetricsBuilder::with_config(EngineConfig {
            trailing_window_weeks: 8,
            warmup_weeks: 2,
            ..EngineConfig::default()
        })
    }

    fn two_week_market() -> Vec<WeeklyPosition> {
        vec![
            WeeklyPosition::new(
                "gold",
                date(0),
                dec!(1000),
                (dec!(50), dec!(30)),
                (dec!(200), dec!(240)),
            ),
            WeeklyPosition::new(
                "gold",
                date(1),
                dec!(1100),
                (dec!(40), dec!(45)),
                (dec!(210), dec!(200)),
            ),
        ]
    }

    #[test]
    fn base_identities_hold() {
        let table = short_warmup().build(&two_week_market()).unwrap();
        let row = table.get("gold", date(0)).unwrap();
        let nc = row.group(TraderGroup::NonCommercial).unwrap();
        assert_eq!(nc.total.value, dec!(80));
        assert_eq!(nc.net.value, dec!(20));
        assert_eq!(nc.share.gross, dec!(80));
    }

    #[test]
    fn full_reversal_has_zero_rebalance() {
        // net 20 -> -5: net_chg -25, gross_chg 25, rebalance 0
        let table = short_warmup().build(&two_week_market()).unwrap();
        let row = table.get("gold", date(1)).unwrap();
        let nc = row.group(TraderGroup::NonCommercial).unwrap();
        assert_eq!(nc.net.chg_1w, Some(dec!(-25)));
        assert_eq!(nc.rebalance.gross_chg_1w, Some(dec!(25)));
        assert_eq!(nc.rebalance.net_abs_chg_1w, Some(dec!(25)));
        assert_eq!(nc.rebalance.rebalance_chg_1w, Some(dec!(0)));
    }

    #[test]
    fn flip_detected_on_strict_reversal() {
        let table = short_warmup().build(&two_week_market()).unwrap();
        let row = table.get("gold", date(1)).unwrap();
        let nc = row.group(TraderGroup::NonCommercial).unwrap();
        // NET_LONG (20) -> NET_SHORT (-5)
        assert_eq!(nc.net.side, NetSide::NetShort);
        assert_eq!(nc.net.flip_1w, Some(true));

        let comm = row.group(TraderGroup::Commercial).unwrap();
        // NET_SHORT (-40) -> NET_LONG (10)
        assert_eq!(comm.net.flip_1w, Some(true));
    }

    #[test]
    fn cross_metrics_compare_primaries() {
        let table = short_warmup().build(&two_week_market()).unwrap();
        let first = table.get("gold", date(0)).unwrap();
        assert_eq!(first.cross.spec_vs_hedge_net, dec!(60));
        assert_eq!(first.cross.net_alignment, NetAlignment::OppositeSide);
        let second = table.get("gold", date(1)).unwrap();
        assert_eq!(second.cross.spec_vs_hedge_net, dec!(-15));
        assert_eq!(second.cross.spec_vs_hedge_net_chg_1w, Some(dec!(-75)));
    }

    #[test]
    fn first_rows_have_null_changes_per_market() {
        let mut rows = two_week_market();
        rows.push(WeeklyPosition::new(
            "silver",
            date(0),
            dec!(500),
            (dec!(10), dec!(5)),
            (dec!(20), dec!(30)),
        ));
        let table = short_warmup().build(&rows).unwrap();

        let silver = table.get("silver", date(0)).unwrap();
        let nc = silver.group(TraderGroup::NonCommercial).unwrap();
        assert_eq!(nc.long.chg_1w, None);
        assert_eq!(nc.net.chg_1w, None);
        assert_eq!(nc.net.flip_1w, None);
        assert_eq!(nc.rebalance.gross_chg_1w, None);
    }

    #[test]
    fn optional_group_appends_without_changing_primaries() {
        let without = short_warmup().build(&two_week_market()).unwrap();

        let with: Vec<WeeklyPosition> = two_week_market()
            .into_iter()
            .map(|r| r.with_nonreportable(dec!(15), dec!(10)))
            .collect();
        let with = short_warmup().build(&with).unwrap();

        for (a, b) in without.iter().zip(with.iter()) {
            for group in TraderGroup::PRIMARY {
                let (a, b) = (a.group(group).unwrap(), b.group(group).unwrap());
                // every family except the share re-normalization is untouched
                assert_eq!(a.long, b.long);
                assert_eq!(a.short, b.short);
                assert_eq!(a.total, b.total);
                assert_eq!(a.net, b.net);
                assert_eq!(a.rebalance, b.rebalance);
                assert_eq!(a.share.gross, b.share.gross);
                assert_eq!(a.share.gross_pct_oi, b.share.gross_pct_oi);
            }
            assert_eq!(a.cross, b.cross);
            assert!(b.group(TraderGroup::Nonreportable).is_some());
            assert!(a.group(TraderGroup::Nonreportable).is_none());
        }
    }

    #[test]
    fn shares_renormalize_across_active_groups() {
        let rows: Vec<WeeklyPosition> = two_week_market()
            .into_iter()
            .map(|r| r.with_nonreportable(dec!(15), dec!(10)))
            .collect();
        let table = short_warmup().build(&rows).unwrap();

        let row = table.get("gold", date(0)).unwrap();
        let sum: Decimal = row
            .groups
            .values()
            .map(|g| g.share.gross_share.unwrap())
            .sum();
        assert!((sum - dec!(1)).abs() < dec!(0.000000001), "sum = {sum}");
    }

    #[test]
    fn rebuild_is_deterministic() {
        let rows = two_week_market();
        let builder = short_warmup();
        assert_eq!(builder.build(&rows).unwrap(), builder.build(&rows).unwrap());
    }
}
