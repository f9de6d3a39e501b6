//! Post-hoc invariant checker for the assembled metrics table
//!
//! Re-derives every metric family from the canonical input and records a
//! [`Violation`] for each mismatch, bounds breach, null-policy breach or
//! degenerate heat-range window. The whole table is checked; nothing is
//! sampled and nothing short-circuits.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use cot_core::{
    GroupSet, LegMetrics, MetricsRow, MetricsTable, NetAlignment, NetSide, TraderGroup,
    WeeklyPosition,
};
use cot_ports::EngineConfig;
use log::{info, warn};
use rust_decimal::Decimal;

use crate::report::{ValidationReport, Violation};

/// Midpoint expected for a one-observation heat window
const SINGLETON_POS: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Re-derives the builder's output and blocks release on any mismatch
pub struct ValidationSuite {
    config: EngineConfig,
}

impl ValidationSuite {
    /// Suite with the default policy constants
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Suite with the same policy constants the builder ran under
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Check the complete table against its canonical input
    pub fn check(&self, positions: &[WeeklyPosition], table: &MetricsTable) -> ValidationReport {
        let mut report = ValidationReport::new();
        let groups = GroupSet::detect(positions);

        self.check_structure(positions, table, &groups, &mut report);

        let by_key: BTreeMap<(&str, NaiveDate), &MetricsRow> = table
            .iter()
            .map(|r| ((r.market_key.as_str(), r.report_date), r))
            .collect();

        for series in partition(positions) {
            let metrics: Vec<Option<&MetricsRow>> = series
                .rows
                .iter()
                .map(|r| by_key.get(&(r.market_key.as_str(), r.report_date)).copied())
                .collect();
            self.check_market(&series, &metrics, &groups, &mut report);
        }

        if report.is_empty() {
            info!("[validate] PASS: {} rows checked", table.len());
        } else {
            warn!(
                "[validate] FAIL: {} violation(s) across {} rows",
                report.len(),
                table.len()
            );
        }
        report
    }

    /// Table-level checks: row coverage, key uniqueness, input quality
    fn check_structure(
        &self,
        positions: &[WeeklyPosition],
        table: &MetricsTable,
        groups: &GroupSet,
        report: &mut ValidationReport,
    ) {
        if table.is_empty() {
            report.push(Violation::table("structure.rows", "output has 0 rows".into()));
        }
        if table.len() != positions.len() {
            report.push(Violation::table(
                "structure.rows",
                format!("output has {} rows, input has {}", table.len(), positions.len()),
            ));
        }

        let mut seen: BTreeMap<(&str, NaiveDate), usize> = BTreeMap::new();
        for row in table.iter() {
            *seen.entry((row.market_key.as_str(), row.report_date)).or_default() += 1;
        }
        for ((market, date), count) in &seen {
            if *count > 1 {
                report.push(Violation::row(
                    market,
                    *date,
                    "structure.unique",
                    format!("{count} output rows share this key"),
                ));
            }
        }
        for position in positions {
            if !seen.contains_key(&(position.market_key.as_str(), position.report_date)) {
                report.push(Violation::row(
                    &position.market_key,
                    position.report_date,
                    "structure.coverage",
                    "input row has no output row".into(),
                ));
            }
        }
        for row in table.iter() {
            let known = positions
                .iter()
                .any(|p| p.market_key == row.market_key && p.report_date == row.report_date);
            if !known {
                report.push(Violation::row(
                    &row.market_key,
                    row.report_date,
                    "structure.coverage",
                    "output row has no input row".into(),
                ));
            }
            let actual: Vec<TraderGroup> = row.groups.keys().copied().collect();
            let expected: Vec<TraderGroup> = groups.iter().collect();
            if actual != expected {
                report.push(Violation::row(
                    &row.market_key,
                    row.report_date,
                    "structure.groups",
                    format!("row carries groups {actual:?}, expected {expected:?}"),
                ));
            }
        }

        // Input data quality, surfaced alongside the derived checks
        for position in positions {
            if position.open_interest_all < Decimal::ZERO {
                report.push(Violation::row(
                    &position.market_key,
                    position.report_date,
                    "input.open_interest",
                    format!("negative open interest {}", position.open_interest_all),
                ));
            }
            for group in groups.iter() {
                for (tag, leg) in [
                    ("long", position.long(group)),
                    ("short", position.short(group)),
                ] {
                    if let Some(value) = leg {
                        if value < Decimal::ZERO {
                            report.push(Violation::row(
                                &position.market_key,
                                position.report_date,
                                "input.legs",
                                format!("negative {} {tag} {value}", group.prefix()),
                            ));
                        }
                    }
                }
            }
        }
    }

    /// Re-derive and compare every family for one market's series
    fn check_market(
        &self,
        series: &Series<'_>,
        metrics: &[Option<&MetricsRow>],
        groups: &GroupSet,
        report: &mut ValidationReport,
    ) {
        let open_interest: Vec<Decimal> =
            series.rows.iter().map(|r| r.open_interest_all).collect();
        let mut nets: BTreeMap<TraderGroup, Vec<Decimal>> = BTreeMap::new();
        let mut grosses: BTreeMap<TraderGroup, Vec<Decimal>> = BTreeMap::new();

        for group in groups.iter() {
            let longs: Vec<Decimal> = series
                .rows
                .iter()
                .map(|r| r.long(group).unwrap_or(Decimal::ZERO))
                .collect();
            let shorts: Vec<Decimal> = series
                .rows
                .iter()
                .map(|r| r.short(group).unwrap_or(Decimal::ZERO))
                .collect();
            let totals: Vec<Decimal> = longs.iter().zip(&shorts).map(|(l, s)| *l + *s).collect();
            nets.insert(
                group,
                longs.iter().zip(&shorts).map(|(l, s)| *l - *s).collect(),
            );
            grosses.insert(group, totals.clone());

            for (tag, values) in [("long", &longs), ("short", &shorts), ("total", &totals)] {
                self.check_leg_family(series, metrics, group, tag, values, report);
            }
            self.check_net_family(series, metrics, group, &nets[&group], report);
            self.check_rebalance_family(
                series, metrics, group, &longs, &shorts, &nets[&group], report,
            );
        }

        let combined: Vec<Decimal> = (0..series.rows.len())
            .map(|i| groups.iter().map(|g| grosses[&g][i]).sum())
            .collect();
        for group in groups.iter() {
            self.check_share_family(
                series,
                metrics,
                group,
                &grosses[&group],
                &combined,
                &open_interest,
                report,
            );
        }
        self.check_cross_family(
            series,
            metrics,
            &nets[&TraderGroup::NonCommercial],
            &nets[&TraderGroup::Commercial],
            report,
        );
    }

    /// Heat ranges and WoW change for one (group, leg) series
    fn check_leg_family(
        &self,
        series: &Series<'_>,
        metrics: &[Option<&MetricsRow>],
        group: TraderGroup,
        tag: &str,
        values: &[Decimal],
        report: &mut ValidationReport,
    ) {
        let tol = self.config.tolerance;
        let mut run_min = Decimal::MAX;
        let mut run_max = Decimal::MIN;

        for (i, &value) in values.iter().enumerate() {
            run_min = run_min.min(value);
            run_max = run_max.max(value);
            let Some(leg) = metrics[i].map(|m| leg_of(m, group, tag)) else {
                continue;
            };
            let Some(leg) = leg else {
                continue; // missing group already reported by structure.groups
            };
            let date = series.rows[i].report_date;
            let mut fail = |check: &str, message: String| {
                report.push(Violation::row(series.market_key, date, check, message));
            };
            let label = format!("{}_{tag}", group.prefix());

            if (leg.value - value).abs() > tol {
                fail("base.value", format!("{label} = {}, input says {value}", leg.value));
            }
            if (leg.min_all - run_min).abs() > tol || (leg.max_all - run_max).abs() > tol {
                fail(
                    "heat.range_all",
                    format!(
                        "{label} full-history range [{}, {}], expected [{run_min}, {run_max}]",
                        leg.min_all, leg.max_all
                    ),
                );
            }
            if i > 0 && run_min == run_max {
                fail(
                    "heat.degenerate_all",
                    format!("{label} zero-variance full-history window at {run_min}"),
                );
            }
            match expected_pos(value, run_min, run_max, i + 1) {
                Some(expected) => match leg.pos_all {
                    None => fail("heat.pos_all.null", format!("{label} pos_all is null")),
                    Some(pos) => {
                        if (pos - expected).abs() > tol {
                            fail(
                                "heat.pos_all.formula",
                                format!("{label} pos_all = {pos}, expected {expected}"),
                            );
                        }
                        if pos < -tol || pos > Decimal::ONE + tol {
                            fail("heat.pos_all.bounds", format!("{label} pos_all = {pos}"));
                        }
                    }
                },
                // degenerate window: the range violation above blocks release,
                // and the resulting null still breaches the null-never policy
                None => match leg.pos_all {
                    None => fail("heat.pos_all.null", format!("{label} pos_all is null")),
                    Some(_) => fail(
                        "heat.pos_all.formula",
                        format!("{label} pos_all defined over a degenerate window"),
                    ),
                },
            }

            self.check_trailing(series, i, &label, values, leg, report);

            let expected_chg = if i == 0 { None } else { Some(value - values[i - 1]) };
            if !matches_opt(leg.chg_1w, expected_chg, tol) {
                report.push(Violation::row(
                    series.market_key,
                    date,
                    "change.chg_1w",
                    format!("{label} chg_1w = {:?}, expected {:?}", leg.chg_1w, expected_chg),
                ));
            }
        }
    }

    /// Trailing-window min/max/pos and its warm-up null policy
    fn check_trailing(
        &self,
        series: &Series<'_>,
        i: usize,
        label: &str,
        values: &[Decimal],
        leg: &LegMetrics,
        report: &mut ValidationReport,
    ) {
        let tol = self.config.tolerance;
        let date = series.rows[i].report_date;
        let mut fail = |check: &str, message: String| {
            report.push(Violation::row(series.market_key, date, check, message));
        };

        if i + 1 < self.config.warmup_weeks.max(1) {
            if leg.min_5y.is_some() || leg.max_5y.is_some() || leg.pos_5y.is_some() {
                fail(
                    "heat.pos_5y.warmup",
                    format!("{label} trailing metrics defined before warm-up"),
                );
            }
            return;
        }

        let start = (i + 1).saturating_sub(self.config.trailing_window_weeks);
        let window = &values[start..=i];
        let min = window.iter().copied().fold(window[0], Decimal::min);
        let max = window.iter().copied().fold(window[0], Decimal::max);

        match (leg.min_5y, leg.max_5y) {
            (Some(got_min), Some(got_max)) => {
                if (got_min - min).abs() > tol || (got_max - max).abs() > tol {
                    fail(
                        "heat.range_5y",
                        format!(
                            "{label} trailing range [{got_min}, {got_max}], expected [{min}, {max}]"
                        ),
                    );
                }
            }
            _ => fail(
                "heat.range_5y",
                format!("{label} trailing extrema null after warm-up"),
            ),
        }
        if window.len() > 1 && min == max {
            fail(
                "heat.degenerate_5y",
                format!("{label} zero-variance trailing window at {min}"),
            );
        }
        match expected_pos(values[i], min, max, window.len()) {
            Some(expected) => match leg.pos_5y {
                None => fail(
                    "heat.pos_5y.null",
                    format!("{label} pos_5y null after warm-up"),
                ),
                Some(pos) => {
                    if (pos - expected).abs() > tol {
                        fail(
                            "heat.pos_5y.formula",
                            format!("{label} pos_5y = {pos}, expected {expected}"),
                        );
                    }
                    if pos < -tol || pos > Decimal::ONE + tol {
                        fail("heat.pos_5y.bounds", format!("{label} pos_5y = {pos}"));
                    }
                }
            },
            None => match leg.pos_5y {
                None => fail(
                    "heat.pos_5y.null",
                    format!("{label} pos_5y null after warm-up"),
                ),
                Some(_) => fail(
                    "heat.pos_5y.formula",
                    format!("{label} pos_5y defined over a degenerate window"),
                ),
            },
        }
    }

    /// Net value, side classification, WoW change and flip policy
    fn check_net_family(
        &self,
        series: &Series<'_>,
        metrics: &[Option<&MetricsRow>],
        group: TraderGroup,
        nets: &[Decimal],
        report: &mut ValidationReport,
    ) {
        let tol = self.config.tolerance;
        for (i, &net) in nets.iter().enumerate() {
            let Some(gm) = metrics[i].and_then(|m| m.group(group)) else {
                continue;
            };
            let date = series.rows[i].report_date;
            let mut fail = |check: &str, message: String| {
                report.push(Violation::row(series.market_key, date, check, message));
            };
            let label = format!("{}_net", group.prefix());

            if (gm.net.value - net).abs() > tol {
                fail("base.net", format!("{label} = {}, expected {net}", gm.net.value));
            }
            if gm.net.side != NetSide::from_net(net) {
                fail(
                    "net.side",
                    format!("{label} side {:?} disagrees with value {net}", gm.net.side),
                );
            }
            let expected_chg = if i == 0 { None } else { Some(net - nets[i - 1]) };
            if !matches_opt(gm.net.chg_1w, expected_chg, tol) {
                fail(
                    "change.net_chg_1w",
                    format!("{label} chg_1w = {:?}, expected {:?}", gm.net.chg_1w, expected_chg),
                );
            }
            let expected_flip = if i == 0 {
                None
            } else {
                let prev = NetSide::from_net(nets[i - 1]);
                Some(!prev.is_flat() && prev.opposite() == Some(NetSide::from_net(net)))
            };
            if gm.net.flip_1w != expected_flip {
                fail(
                    "net.flip",
                    format!(
                        "{label} flip_1w = {:?}, expected {:?} (strict reversal policy)",
                        gm.net.flip_1w, expected_flip
                    ),
                );
            }
        }
    }

    /// Rebalance decomposition formulas, sign and share bounds
    #[allow(clippy::too_many_arguments)]
    fn check_rebalance_family(
        &self,
        series: &Series<'_>,
        metrics: &[Option<&MetricsRow>],
        group: TraderGroup,
        longs: &[Decimal],
        shorts: &[Decimal],
        nets: &[Decimal],
        report: &mut ValidationReport,
    ) {
        let tol = self.config.tolerance;
        for i in 0..longs.len() {
            let Some(gm) = metrics[i].and_then(|m| m.group(group)) else {
                continue;
            };
            let date = series.rows[i].report_date;
            let mut fail = |check: &str, message: String| {
                report.push(Violation::row(series.market_key, date, check, message));
            };
            let label = format!("{}_rebalance", group.prefix());
            let r = &gm.rebalance;

            let (gross, net_abs, rebalance, share) = if i == 0 {
                (None, None, None, None)
            } else {
                let gross =
                    (longs[i] - longs[i - 1]).abs() + (shorts[i] - shorts[i - 1]).abs();
                let net_abs = (nets[i] - nets[i - 1]).abs();
                let rebalance = gross - net_abs;
                let share = if gross > Decimal::ZERO {
                    Some(rebalance / gross)
                } else {
                    None
                };
                (Some(gross), Some(net_abs), Some(rebalance), share)
            };

            if !matches_opt(r.gross_chg_1w, gross, tol) {
                fail(
                    "rebalance.gross",
                    format!("{label} gross_chg = {:?}, expected {gross:?}", r.gross_chg_1w),
                );
            }
            if !matches_opt(r.net_abs_chg_1w, net_abs, tol) {
                fail(
                    "rebalance.net_abs",
                    format!("{label} net_abs_chg = {:?}, expected {net_abs:?}", r.net_abs_chg_1w),
                );
            }
            if !matches_opt(r.rebalance_chg_1w, rebalance, tol) {
                fail(
                    "rebalance.formula",
                    format!("{label} chg = {:?}, expected {rebalance:?}", r.rebalance_chg_1w),
                );
            }
            if let Some(value) = r.rebalance_chg_1w {
                if value < -tol {
                    fail("rebalance.sign", format!("{label} chg = {value} < 0"));
                }
            }
            if !matches_opt(r.rebalance_share_1w, share, tol) {
                fail(
                    "rebalance.share",
                    format!("{label} share = {:?}, expected {share:?}", r.rebalance_share_1w),
                );
            }
            if let Some(value) = r.rebalance_share_1w {
                if value < -tol || value > Decimal::ONE + tol {
                    fail("rebalance.share.bounds", format!("{label} share = {value}"));
                }
            }
        }
    }

    /// Exposure shares, their WoW change and the pct-of-OI ratio
    #[allow(clippy::too_many_arguments)]
    fn check_share_family(
        &self,
        series: &Series<'_>,
        metrics: &[Option<&MetricsRow>],
        group: TraderGroup,
        grosses: &[Decimal],
        combined: &[Decimal],
        open_interest: &[Decimal],
        report: &mut ValidationReport,
    ) {
        let tol = self.config.tolerance;
        let expected_shares: Vec<Option<Decimal>> = grosses
            .iter()
            .zip(combined)
            .map(|(g, c)| if *c > Decimal::ZERO { Some(*g / *c) } else { None })
            .collect();

        for i in 0..grosses.len() {
            let Some(gm) = metrics[i].and_then(|m| m.group(group)) else {
                continue;
            };
            let date = series.rows[i].report_date;
            let mut fail = |check: &str, message: String| {
                report.push(Violation::row(series.market_key, date, check, message));
            };
            let label = format!("{}_gross", group.prefix());
            let s = &gm.share;

            if (s.gross - grosses[i]).abs() > tol {
                fail("base.gross", format!("{label} = {}, expected {}", s.gross, grosses[i]));
            }
            if !matches_opt(s.gross_share, expected_shares[i], tol) {
                fail(
                    "share.formula",
                    format!(
                        "{label}_share = {:?}, expected {:?}",
                        s.gross_share, expected_shares[i]
                    ),
                );
            }
            if let Some(share) = s.gross_share {
                if share < -tol || share > Decimal::ONE + tol {
                    fail("share.bounds", format!("{label}_share = {share}"));
                }
            }
            let expected_chg = if i == 0 {
                None
            } else {
                match (expected_shares[i], expected_shares[i - 1]) {
                    (Some(now), Some(prev)) => Some(now - prev),
                    _ => None,
                }
            };
            if !matches_opt(s.gross_share_chg_1w_pp, expected_chg, tol) {
                fail(
                    "share.chg_pp",
                    format!(
                        "{label}_share_chg = {:?}, expected {expected_chg:?}",
                        s.gross_share_chg_1w_pp
                    ),
                );
            }
            let expected_pct = if open_interest[i] > Decimal::ZERO {
                Some(grosses[i] / open_interest[i])
            } else {
                None
            };
            if !matches_opt(s.gross_pct_oi, expected_pct, tol) {
                fail(
                    "share.pct_oi",
                    format!("{label}_pct_oi = {:?}, expected {expected_pct:?}", s.gross_pct_oi),
                );
            }
        }
    }

    /// Primary-pair spread, alignment and magnitude-gap heat range
    fn check_cross_family(
        &self,
        series: &Series<'_>,
        metrics: &[Option<&MetricsRow>],
        nc_nets: &[Decimal],
        comm_nets: &[Decimal],
        report: &mut ValidationReport,
    ) {
        let tol = self.config.tolerance;
        let gaps: Vec<Decimal> = nc_nets
            .iter()
            .zip(comm_nets)
            .map(|(nc, comm)| nc.abs() - comm.abs())
            .collect();

        for i in 0..nc_nets.len() {
            let Some(row) = metrics[i] else {
                continue;
            };
            let date = series.rows[i].report_date;
            let mut fail = |check: &str, message: String| {
                report.push(Violation::row(series.market_key, date, check, message));
            };
            let cross = &row.cross;

            let spread = nc_nets[i] - comm_nets[i];
            if (cross.spec_vs_hedge_net - spread).abs() > tol {
                fail(
                    "cross.spread",
                    format!("spec_vs_hedge_net = {}, expected {spread}", cross.spec_vs_hedge_net),
                );
            }
            let expected_chg = if i == 0 {
                None
            } else {
                Some(spread - (nc_nets[i - 1] - comm_nets[i - 1]))
            };
            if !matches_opt(cross.spec_vs_hedge_net_chg_1w, expected_chg, tol) {
                fail(
                    "cross.spread_chg",
                    format!(
                        "spec_vs_hedge_net_chg = {:?}, expected {expected_chg:?}",
                        cross.spec_vs_hedge_net_chg_1w
                    ),
                );
            }
            let expected_alignment = NetAlignment::compare(
                NetSide::from_net(nc_nets[i]),
                NetSide::from_net(comm_nets[i]),
            );
            if cross.net_alignment != expected_alignment {
                fail(
                    "cross.alignment",
                    format!(
                        "net_alignment = {:?}, expected {expected_alignment:?}",
                        cross.net_alignment
                    ),
                );
            }
            if (cross.net_mag_gap - gaps[i]).abs() > tol {
                fail(
                    "cross.mag_gap",
                    format!("net_mag_gap = {}, expected {}", cross.net_mag_gap, gaps[i]),
                );
            }
            let expected_gap_chg = if i == 0 { None } else { Some(gaps[i] - gaps[i - 1]) };
            if !matches_opt(cross.net_mag_gap_chg_1w, expected_gap_chg, tol) {
                fail(
                    "cross.mag_gap_chg",
                    format!(
                        "net_mag_gap_chg = {:?}, expected {expected_gap_chg:?}",
                        cross.net_mag_gap_chg_1w
                    ),
                );
            }

            // trailing heat range of the magnitude gap
            if i + 1 < self.config.warmup_weeks.max(1) {
                if cross.net_mag_gap_min_5y.is_some()
                    || cross.net_mag_gap_max_5y.is_some()
                    || cross.net_mag_gap_pos_5y.is_some()
                {
                    fail(
                        "cross.mag_gap_5y.warmup",
                        "magnitude-gap trailing metrics defined before warm-up".into(),
                    );
                }
                continue;
            }
            let start = (i + 1).saturating_sub(self.config.trailing_window_weeks);
            let window = &gaps[start..=i];
            let min = window.iter().copied().fold(window[0], Decimal::min);
            let max = window.iter().copied().fold(window[0], Decimal::max);
            match (cross.net_mag_gap_min_5y, cross.net_mag_gap_max_5y) {
                (Some(got_min), Some(got_max)) => {
                    if (got_min - min).abs() > tol || (got_max - max).abs() > tol {
                        fail(
                            "cross.mag_gap_5y",
                            format!(
                                "gap trailing range [{got_min}, {got_max}], expected [{min}, {max}]"
                            ),
                        );
                    }
                }
                _ => fail(
                    "cross.mag_gap_5y",
                    "gap trailing extrema null after warm-up".into(),
                ),
            }
            if window.len() > 1 && min == max {
                fail(
                    "heat.degenerate_5y",
                    format!("net_mag_gap zero-variance trailing window at {min}"),
                );
            }
            match expected_pos(gaps[i], min, max, window.len()) {
                Some(expected) => match cross.net_mag_gap_pos_5y {
                    None => fail(
                        "cross.mag_gap_5y",
                        "gap pos_5y null after warm-up".into(),
                    ),
                    Some(pos) => {
                        if (pos - expected).abs() > tol {
                            fail(
                                "cross.mag_gap_5y",
                                format!("gap pos_5y = {pos}, expected {expected}"),
                            );
                        }
                    }
                },
                None => match cross.net_mag_gap_pos_5y {
                    None => fail("cross.mag_gap_5y", "gap pos_5y null after warm-up".into()),
                    Some(_) => fail(
                        "cross.mag_gap_5y",
                        "gap pos_5y defined over a degenerate window".into(),
                    ),
                },
            }
        }
    }
}

impl Default for ValidationSuite {
    fn default() -> Self {
        Self::new()
    }
}

/// One market's canonical rows in input order
struct Series<'a> {
    market_key: &'a str,
    rows: Vec<&'a WeeklyPosition>,
}

/// Partition canonical rows by market in first-appearance order
fn partition(positions: &[WeeklyPosition]) -> Vec<Series<'_>> {
    let mut markets: Vec<Series<'_>> = Vec::new();
    for row in positions {
        match markets
            .iter_mut()
            .find(|m| m.market_key == row.market_key.as_str())
        {
            Some(series) => series.rows.push(row),
            None => markets.push(Series {
                market_key: &row.market_key,
                rows: vec![row],
            }),
        }
    }
    markets
}

/// Expected percentile position, `None` for a degenerate multi-row window
fn expected_pos(value: Decimal, min: Decimal, max: Decimal, window_len: usize) -> Option<Decimal> {
    if max > min {
        Some((value - min) / (max - min))
    } else if window_len == 1 {
        Some(SINGLETON_POS)
    } else {
        None
    }
}

/// Nullable equality within tolerance: both null, or both within `tol`
fn matches_opt(got: Option<Decimal>, expected: Option<Decimal>, tol: Decimal) -> bool {
    match (got, expected) {
        (None, None) => true,
        (Some(a), Some(b)) => (a - b).abs() <= tol,
        _ => false,
    }
}

/// Leg metrics for a (group, leg-tag) pair, if the group is on the row
fn leg_of<'a>(row: &'a MetricsRow, group: TraderGroup, tag: &str) -> Option<&'a LegMetrics> {
    let gm = row.group(group)?;
    Some(match tag {
        "long" => &gm.long,
        "short" => &gm.short,
        _ => &gm.total,
    })
}
