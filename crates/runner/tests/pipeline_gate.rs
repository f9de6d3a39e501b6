//! Pipeline Gate Integration Test
//!
//! Drives the full engine end to end:
//! - clean multi-market builds release with an empty report
//! - degenerate data is blocked by the validation gate
//! - structural defects abort before any table is assembled
//! - the optional third group appends without disturbing existing families

use chrono::NaiveDate;
use cot_core::{NetSide, TraderGroup, WeeklyPosition};
use cot_ports::{BuildError, EngineConfig};
use cot_runner::{MemoryStore, build_metrics, release, run};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(week: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 4).unwrap() + chrono::Duration::weeks(week as i64)
}

fn config() -> EngineConfig {
    EngineConfig {
        trailing_window_weeks: 12,
        warmup_weeks: 4,
        ..EngineConfig::default()
    }
}

/// Weekly rows with enough movement to keep every window non-degenerate
fn market(key: &str, weeks: u32) -> Vec<WeeklyPosition> {
    (0..weeks)
        .map(|w| {
            let wobble = Decimal::from(w % 7) * dec!(11);
            let drift = Decimal::from(w) * dec!(3);
            WeeklyPosition::new(
                key,
                date(w),
                dec!(5000) + drift * dec!(4),
                (dec!(400) + wobble + drift, dec!(250) + wobble / dec!(2)),
                (dec!(900) - wobble, dec!(1000) + wobble - drift),
            )
        })
        .collect()
}

/// Test a clean multi-market build passes the gate and reaches the sink
#[test]
fn clean_build_releases_through_the_gate() {
    let mut rows = market("gold", 30);
    rows.extend(market("silver", 10));
    rows.extend(market("copper", 5));

    let source = MemoryStore::with_positions(rows.clone());
    let mut sink = MemoryStore::default();
    let table = run(&source, &mut sink, &config()).unwrap();

    assert_eq!(table.len(), rows.len());
    assert_eq!(sink.released(), Some(&table));
    assert_eq!(table.markets(), vec!["gold", "silver", "copper"]);
}

/// Test warm-up gating across market lengths within one table
#[test]
fn warmup_applies_per_market() {
    let mut rows = market("gold", 8);
    rows.extend(market("silver", 3)); // shorter than the 4-week warm-up

    let (table, report) = build_metrics(&rows, &config()).unwrap();
    assert!(report.is_empty(), "{report}");

    let nc = TraderGroup::NonCommercial;
    let gold_late = table.get("gold", date(7)).unwrap();
    assert!(gold_late.group(nc).unwrap().long.pos_5y.is_some());

    let silver_last = table.get("silver", date(2)).unwrap();
    assert!(silver_last.group(nc).unwrap().long.pos_5y.is_none());
    // full-history position is defined from the first observation
    assert!(silver_last.group(nc).unwrap().long.pos_all.is_some());
}

/// Test the degenerate-range scenario: constant legs must fail validation
#[test]
fn constant_market_is_blocked() {
    let rows: Vec<WeeklyPosition> = (0..6)
        .map(|w| {
            WeeklyPosition::new(
                "flatline",
                date(w),
                dec!(1000),
                (dec!(100), dec!(100)),
                (dec!(100), dec!(100)),
            )
        })
        .collect();

    let (table, report) = build_metrics(&rows, &config()).unwrap();
    assert!(!report.is_empty());

    let err = release(table, &report).unwrap_err();
    assert!(matches!(err, BuildError::ValidationRejected { .. }));

    // and the full run never reaches the sink
    let source = MemoryStore::with_positions(rows);
    let mut sink = MemoryStore::default();
    assert!(run(&source, &mut sink, &config()).is_err());
    assert!(sink.released().is_none());
}

/// Test structural defects abort before validation
#[test]
fn structural_defects_abort_the_build() {
    let mut duplicated = market("gold", 3);
    duplicated.push(duplicated[2].clone());
    assert!(matches!(
        build_metrics(&duplicated, &config()),
        Err(BuildError::DuplicateKey { .. })
    ));

    let mut unordered = market("gold", 3);
    unordered.swap(0, 2);
    assert!(matches!(
        build_metrics(&unordered, &config()),
        Err(BuildError::UnorderedMarket { .. })
    ));

    let mut missing = market("gold", 3);
    for row in &mut missing {
        row.nc_long = None;
        row.nc_short = None;
    }
    assert!(matches!(
        build_metrics(&missing, &config()),
        Err(BuildError::MissingPrimaryGroup {
            group: TraderGroup::NonCommercial
        })
    ));

    assert!(matches!(
        build_metrics(&[], &config()),
        Err(BuildError::EmptyInput)
    ));
}

/// Test two runs over the same input yield identical tables
#[test]
fn rebuild_is_idempotent() {
    let mut rows = market("gold", 20);
    rows.extend(market("silver", 20));

    let (first, report) = build_metrics(&rows, &config()).unwrap();
    assert!(report.is_empty());
    let (second, _) = build_metrics(&rows, &config()).unwrap();
    assert_eq!(first, second);

    // and byte-identical once serialized
    let a = serde_json::to_vec(&first).unwrap();
    let b = serde_json::to_vec(&second).unwrap();
    assert_eq!(a, b);
}

/// Test the optional third group appends columns without touching the
/// existing families (shares re-normalize over the wider denominator)
#[test]
fn third_group_appends_cleanly() {
    let rows = market("gold", 10);
    let (without, report) = build_metrics(&rows, &config()).unwrap();
    assert!(report.is_empty());

    let extended: Vec<WeeklyPosition> = rows
        .iter()
        .enumerate()
        .map(|(w, r)| {
            r.clone().with_nonreportable(
                dec!(60) + Decimal::from(w as u32) * dec!(3),
                dec!(40) + Decimal::from(w as u32) * dec!(2),
            )
        })
        .collect();
    let (with, report) = build_metrics(&extended, &config()).unwrap();
    assert!(report.is_empty(), "{report}");

    for (a, b) in without.iter().zip(with.iter()) {
        for group in TraderGroup::PRIMARY {
            let (a, b) = (a.group(group).unwrap(), b.group(group).unwrap());
            assert_eq!(a.long, b.long);
            assert_eq!(a.short, b.short);
            assert_eq!(a.total, b.total);
            assert_eq!(a.net, b.net);
            assert_eq!(a.rebalance, b.rebalance);
        }
        assert_eq!(a.cross, b.cross);
        assert!(b.group(TraderGroup::Nonreportable).is_some());
    }
}

/// Test the two-week reversal's rebalance arithmetic end to end
#[test]
fn two_week_rebalance_scenario() {
    let rows = vec![
        WeeklyPosition::new(
            "gold",
            date(0),
            dec!(1000),
            (dec!(50), dec!(30)),
            (dec!(200), dec!(260)),
        ),
        WeeklyPosition::new(
            "gold",
            date(1),
            dec!(1000),
            (dec!(40), dec!(45)),
            (dec!(210), dec!(240)),
        ),
    ];

    let (table, _) = build_metrics(&rows, &config()).unwrap();
    let nc = table
        .get("gold", date(1))
        .unwrap()
        .group(TraderGroup::NonCommercial)
        .unwrap();

    // net 20 -> -5: a strict reversal with zero offsetting turnover
    assert_eq!(nc.net.chg_1w, Some(dec!(-25)));
    assert_eq!(nc.net.side, NetSide::NetShort);
    assert_eq!(nc.net.flip_1w, Some(true));
    assert_eq!(nc.rebalance.gross_chg_1w, Some(dec!(25)));
    assert_eq!(nc.rebalance.net_abs_chg_1w, Some(dec!(25)));
    assert_eq!(nc.rebalance.rebalance_chg_1w, Some(dec!(0)));
    assert_eq!(nc.rebalance.rebalance_share_1w, Some(dec!(0)));
}

/// Test violation reports serialize for downstream consumption
#[test]
fn report_serializes() {
    let rows: Vec<WeeklyPosition> = (0..6)
        .map(|w| {
            WeeklyPosition::new(
                "flatline",
                date(w),
                dec!(1000),
                (dec!(100), dec!(100)),
                (dec!(100), dec!(100)),
            )
        })
        .collect();

    let (_, report) = build_metrics(&rows, &config()).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("heat.degenerate_all"));
}
