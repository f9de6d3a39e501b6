//! Base position resolver
//!
//! Validates the canonical input's structural invariants and partitions it
//! into per-market series before any derivation runs. Structural failures
//! abort the build immediately; nothing downstream sees a malformed table.

use cot_core::{GroupSet, TraderGroup, WeeklyPosition};
use cot_ports::{BuildError, BuildResult};
use log::debug;
use rust_decimal::Decimal;

/// One market's rows, in strictly ascending date order
#[derive(Debug)]
pub struct MarketSeries<'a> {
    pub market_key: &'a str,
    pub rows: Vec<&'a WeeklyPosition>,
}

impl<'a> MarketSeries<'a> {
    /// Long leg values for one group, one per row
    ///
    /// Only called for active groups, where the resolver has already
    /// guaranteed every leg is populated; a missing leg would have been a
    /// structural error.
    pub fn longs(&self, group: TraderGroup) -> Vec<Decimal> {
        self.rows
            .iter()
            .map(|r| r.long(group).unwrap_or(Decimal::ZERO))
            .collect()
    }

    /// Short leg values for one group, one per row
    pub fn shorts(&self, group: TraderGroup) -> Vec<Decimal> {
        self.rows
            .iter()
            .map(|r| r.short(group).unwrap_or(Decimal::ZERO))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Resolve the active group set and partition rows into market series
///
/// Checks, in order:
/// 1. non-empty input;
/// 2. both primary groups carry data somewhere in the table;
/// 3. per-market strict date ordering and (market_key, report_date)
///    uniqueness;
/// 4. every active group's legs are populated on every row (a group is
///    either entirely present or entirely absent).
pub fn resolve(rows: &[WeeklyPosition]) -> BuildResult<(GroupSet, Vec<MarketSeries<'_>>)> {
    if rows.is_empty() {
        return Err(BuildError::EmptyInput);
    }

    for group in TraderGroup::PRIMARY {
        let populated = rows
            .iter()
            .any(|r| r.long(group).is_some() && r.short(group).is_some());
        if !populated {
            return Err(BuildError::MissingPrimaryGroup { group });
        }
    }

    let groups = GroupSet::detect(rows);

    // Partition by market in first-appearance order
    let mut markets: Vec<MarketSeries<'_>> = Vec::new();
    for row in rows {
        match markets
            .iter_mut()
            .find(|m| m.market_key == row.market_key.as_str())
        {
            Some(series) => series.rows.push(row),
            None => markets.push(MarketSeries {
                market_key: &row.market_key,
                rows: vec![row],
            }),
        }
    }

    // Strict date order and key uniqueness within each market
    for series in &markets {
        for pair in series.rows.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.report_date == prev.report_date {
                return Err(BuildError::DuplicateKey {
                    market_key: next.market_key.clone(),
                    report_date: next.report_date,
                });
            }
            if next.report_date < prev.report_date {
                return Err(BuildError::UnorderedMarket {
                    market_key: next.market_key.clone(),
                    report_date: next.report_date,
                });
            }
        }
    }

    // Active groups are all-or-nothing per dataset
    for row in rows {
        for group in groups.iter() {
            if row.long(group).is_none() || row.short(group).is_none() {
                return Err(BuildError::MissingGroupValue {
                    group,
                    market_key: row.market_key.clone(),
                    report_date: row.report_date,
                });
            }
        }
    }

    debug!(
        "[metrics] resolved {} markets, {} rows, {} active groups",
        markets.len(),
        rows.len(),
        groups.len()
    );

    Ok((groups, markets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(week: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap() + chrono::Duration::weeks(week as i64)
    }

    fn row(market: &str, week: u32) -> WeeklyPosition {
        WeeklyPosition::new(
            market,
            date(week),
            dec!(1000),
            (dec!(100), dec!(50)),
            (dec!(200), dec!(250)),
        )
    }

    #[test]
    fn partitions_by_market() {
        let rows = vec![row("gold", 0), row("gold", 1), row("silver", 0)];
        let (groups, markets) = resolve(&rows).unwrap();
        assert_eq!(groups, GroupSet::primaries());
        assert_eq!(markets.len(), 2);
        assert_eq!(markets[0].market_key, "gold");
        assert_eq!(markets[0].len(), 2);
        assert_eq!(markets[1].market_key, "silver");
    }

    #[test]
    fn empty_input_is_fatal() {
        let err = resolve(&[]).unwrap_err();
        assert_eq!(err, BuildError::EmptyInput);
    }

    #[test]
    fn duplicate_key_is_fatal() {
        let rows = vec![row("gold", 0), row("gold", 0)];
        let err = resolve(&rows).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateKey { .. }));
    }

    #[test]
    fn unordered_market_is_fatal() {
        let rows = vec![row("gold", 2), row("gold", 1)];
        let err = resolve(&rows).unwrap_err();
        assert!(matches!(err, BuildError::UnorderedMarket { .. }));
    }

    #[test]
    fn missing_primary_group_is_fatal() {
        let mut bad = row("gold", 0);
        bad.comm_long = None;
        bad.comm_short = None;
        let err = resolve(&[bad]).unwrap_err();
        assert_eq!(
            err,
            BuildError::MissingPrimaryGroup {
                group: TraderGroup::Commercial
            }
        );
    }

    #[test]
    fn partially_populated_optional_group_is_fatal() {
        let rows = vec![
            row("gold", 0).with_nonreportable(dec!(10), dec!(5)),
            row("gold", 1),
        ];
        let err = resolve(&rows).unwrap_err();
        assert!(matches!(
            err,
            BuildError::MissingGroupValue {
                group: TraderGroup::Nonreportable,
                ..
            }
        ));
    }
}
