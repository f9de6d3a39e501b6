use serde::{Deserialize, Serialize};

use crate::entities::position::WeeklyPosition;

/// Trader classification group reported in the weekly data
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TraderGroup {
    /// Non-commercial (speculative) traders - `nc_*` columns
    NonCommercial,
    /// Commercial (hedging) traders - `comm_*` columns
    Commercial,
    /// Nonreportable positions - `nr_*` columns, present only in some datasets
    Nonreportable,
}

impl TraderGroup {
    /// The two groups every dataset must carry
    pub const PRIMARY: [TraderGroup; 2] = [TraderGroup::NonCommercial, TraderGroup::Commercial];

    /// Column prefix used in the canonical table (`nc`, `comm`, `nr`)
    pub fn prefix(&self) -> &'static str {
        match self {
            TraderGroup::NonCommercial => "nc",
            TraderGroup::Commercial => "comm",
            TraderGroup::Nonreportable => "nr",
        }
    }

    /// Whether this group is part of the invariant backbone
    pub fn is_primary(&self) -> bool {
        matches!(self, TraderGroup::NonCommercial | TraderGroup::Commercial)
    }
}

/// Per-side axis of the position metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leg {
    Long,
    Short,
    /// Long + short combined
    Total,
}

impl Leg {
    /// All legs, in the order the derived columns are laid out
    pub const ALL: [Leg; 3] = [Leg::Long, Leg::Short, Leg::Total];

    /// Column tag used in the derived table (`long`, `short`, `total`)
    pub fn tag(&self) -> &'static str {
        match self {
            Leg::Long => "long",
            Leg::Short => "short",
            Leg::Total => "total",
        }
    }
}

/// The set of trader groups active for a dataset
///
/// Resolved once per run from the canonical table (the Group Registry).
/// Every downstream component iterates this set instead of hardcoding
/// group enumeration, so an optional group appearing changes the
/// iteration set and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSet {
    /// Whether the optional nonreportable group carries data
    nonreportable: bool,
}

impl GroupSet {
    /// Just the two primary groups
    pub fn primaries() -> Self {
        Self {
            nonreportable: false,
        }
    }

    /// Primaries plus the nonreportable group
    pub fn with_nonreportable() -> Self {
        Self {
            nonreportable: true,
        }
    }

    /// Detect the active set from the canonical rows
    ///
    /// The optional group is active when at least one row carries both of
    /// its legs; an entirely-null group is treated as absent. Primary
    /// groups are always active (their absence is a structural error
    /// caught by the resolver, not here).
    pub fn detect(rows: &[WeeklyPosition]) -> Self {
        let nonreportable = rows
            .iter()
            .any(|r| r.nr_long.is_some() && r.nr_short.is_some());
        Self { nonreportable }
    }

    /// Whether the given group is active for this dataset
    pub fn contains(&self, group: TraderGroup) -> bool {
        group.is_primary() || (group == TraderGroup::Nonreportable && self.nonreportable)
    }

    /// Active groups, primaries first
    pub fn iter(&self) -> impl Iterator<Item = TraderGroup> + '_ {
        TraderGroup::PRIMARY
            .into_iter()
            .chain(self.nonreportable.then_some(TraderGroup::Nonreportable))
    }

    /// Number of active groups (2 or 3)
    pub fn len(&self) -> usize {
        if self.nonreportable { 3 } else { 2 }
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn row(nr: Option<(rust_decimal::Decimal, rust_decimal::Decimal)>) -> WeeklyPosition {
        let base = WeeklyPosition::new(
            "gold",
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            dec!(1000),
            (dec!(100), dec!(50)),
            (dec!(200), dec!(250)),
        );
        match nr {
            Some((long, short)) => base.with_nonreportable(long, short),
            None => base,
        }
    }

    #[test]
    fn detect_without_nonreportable() {
        let rows = vec![row(None), row(None)];
        let set = GroupSet::detect(&rows);
        assert_eq!(set, GroupSet::primaries());
        assert_eq!(set.len(), 2);
        assert!(!set.contains(TraderGroup::Nonreportable));
    }

    #[test]
    fn detect_with_nonreportable() {
        let rows = vec![row(Some((dec!(10), dec!(5))))];
        let set = GroupSet::detect(&rows);
        assert!(set.contains(TraderGroup::Nonreportable));
        assert_eq!(set.iter().count(), 3);
    }

    #[test]
    fn primaries_always_active() {
        let set = GroupSet::primaries();
        assert!(set.contains(TraderGroup::NonCommercial));
        assert!(set.contains(TraderGroup::Commercial));
    }

    #[test]
    fn iter_puts_primaries_first() {
        let set = GroupSet::with_nonreportable();
        let groups: Vec<_> = set.iter().collect();
        assert_eq!(
            groups,
            vec![
                TraderGroup::NonCommercial,
                TraderGroup::Commercial,
                TraderGroup::Nonreportable
            ]
        );
    }
}
