use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::group::{Leg, TraderGroup};
use crate::entities::net::{NetAlignment, NetSide};

/// Heat-range and change metrics for one position leg (long, short or total)
///
/// Null policy: `pos_all` is only ever `None` under a degenerate
/// (zero-variance) full-history window, which the validation suite rejects;
/// the `_5y` fields are `None` until the trailing-window warm-up is met;
/// `chg_1w` is `None` on each market's first row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegMetrics {
    /// The underlying position value this week
    pub value: Decimal,

    /// Minimum over the full history up to and including this row
    pub min_all: Decimal,
    /// Maximum over the full history up to and including this row
    pub max_all: Decimal,
    /// Percentile position within [min_all, max_all], in [0, 1]
    pub pos_all: Option<Decimal>,

    /// Minimum over the trailing window, once warmed up
    pub min_5y: Option<Decimal>,
    /// Maximum over the trailing window, once warmed up
    pub max_5y: Option<Decimal>,
    /// Percentile position within the trailing window, in [0, 1]
    pub pos_5y: Option<Decimal>,

    /// First difference from the prior week within the same market
    pub chg_1w: Option<Decimal>,
}

/// Net exposure metrics for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetMetrics {
    /// Long minus short this week
    pub value: Decimal,
    /// Week-over-week change of net exposure
    pub chg_1w: Option<Decimal>,
    /// Side of the net exposure
    pub side: NetSide,
    /// True only on a strict NET_LONG <-> NET_SHORT reversal from the prior
    /// week; transitions involving FLAT never flag. `None` on first rows.
    pub flip_1w: Option<bool>,
}

/// Decomposition of weekly two-sided position change for one group
///
/// `rebalance_chg_1w = gross_chg_1w - net_abs_chg_1w` is non-negative by the
/// triangle inequality and captures offsetting long/short turnover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceMetrics {
    /// |Δlong| + |Δshort|: total two-sided turnover
    pub gross_chg_1w: Option<Decimal>,
    /// |Δnet|: the directional component
    pub net_abs_chg_1w: Option<Decimal>,
    /// Offsetting turnover, always >= 0
    pub rebalance_chg_1w: Option<Decimal>,
    /// rebalance / gross, in [0, 1]; `None` when gross turnover is zero
    pub rebalance_share_1w: Option<Decimal>,
}

/// Gross exposure share metrics for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareMetrics {
    /// Long + short this week
    pub gross: Decimal,
    /// Share of the sum of all active groups' gross exposure, in [0, 1];
    /// `None` when that sum is zero
    pub gross_share: Option<Decimal>,
    /// Week-over-week share change in percentage points (plain difference
    /// of fractions, not re-normalized)
    pub gross_share_chg_1w_pp: Option<Decimal>,
    /// Gross exposure as a fraction of open interest; `None` when open
    /// interest is zero
    pub gross_pct_oi: Option<Decimal>,
}

/// All derived metrics for one group on one row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMetrics {
    pub long: LegMetrics,
    pub short: LegMetrics,
    pub total: LegMetrics,
    pub net: NetMetrics,
    pub rebalance: RebalanceMetrics,
    pub share: ShareMetrics,
}

impl GroupMetrics {
    /// Leg metrics by axis
    pub fn leg(&self, leg: Leg) -> &LegMetrics {
        match leg {
            Leg::Long => &self.long,
            Leg::Short => &self.short,
            Leg::Total => &self.total,
        }
    }
}

/// Comparison of the two primary groups' net exposure
///
/// The optional nonreportable group is not part of this comparison; its
/// presence appends per-group columns without touching this family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossMetrics {
    /// nc_net - comm_net
    pub spec_vs_hedge_net: Decimal,
    /// Week-over-week change of the spread
    pub spec_vs_hedge_net_chg_1w: Option<Decimal>,
    /// Side relationship between the two primaries
    pub net_alignment: NetAlignment,
    /// |nc_net| - |comm_net|: magnitude gap between the primaries
    pub net_mag_gap: Decimal,
    /// Week-over-week change of the magnitude gap
    pub net_mag_gap_chg_1w: Option<Decimal>,
    /// Trailing-window minimum of the magnitude gap, once warmed up
    pub net_mag_gap_min_5y: Option<Decimal>,
    /// Trailing-window maximum of the magnitude gap, once warmed up
    pub net_mag_gap_max_5y: Option<Decimal>,
    /// Percentile position of the magnitude gap in its trailing window
    pub net_mag_gap_pos_5y: Option<Decimal>,
}

/// One derived row: the full metric set for a single market-week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    /// Stable market identifier (same key as the canonical row)
    pub market_key: String,
    /// Report week (same key as the canonical row)
    pub report_date: NaiveDate,
    /// Total outstanding contracts, carried through from the input
    pub open_interest_all: Decimal,
    /// Per-group metric families, one entry per active group
    pub groups: BTreeMap<TraderGroup, GroupMetrics>,
    /// Two-primary comparison metrics
    pub cross: CrossMetrics,
}

impl MetricsRow {
    /// Metrics for the given group, if it is active
    pub fn group(&self, group: TraderGroup) -> Option<&GroupMetrics> {
        self.groups.get(&group)
    }
}

/// The assembled derived table, ordered by (market_key, report_date)
///
/// Produced fresh on every run; fully derivable from the canonical input,
/// with no identity across runs beyond the row keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsTable {
    rows: Vec<MetricsRow>,
}

impl MetricsTable {
    pub fn new(rows: Vec<MetricsRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[MetricsRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricsRow> {
        self.rows.iter()
    }

    /// Look up a row by its key
    pub fn get(&self, market_key: &str, report_date: NaiveDate) -> Option<&MetricsRow> {
        self.rows
            .iter()
            .find(|r| r.market_key == market_key && r.report_date == report_date)
    }

    /// Distinct market keys in table order
    pub fn markets(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for row in &self.rows {
            if seen.last() != Some(&row.market_key.as_str())
                && !seen.contains(&row.market_key.as_str())
            {
                seen.push(&row.market_key);
            }
        }
        seen
    }
}
