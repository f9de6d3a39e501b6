use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::group::TraderGroup;

/// One canonical row: positioning for a single market in a single report week
///
/// Rows are uniquely keyed by `(market_key, report_date)`. Within a market
/// the dates are strictly increasing; missing weeks are tolerated but never
/// synthesized. A group's legs are `None` only when that group is entirely
/// absent from the dataset - the resolver rejects a dataset whose primary
/// legs are missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPosition {
    /// Stable market identifier
    pub market_key: String,

    /// Report week (weekly cadence)
    pub report_date: NaiveDate,

    /// Total outstanding contracts for the market this week
    pub open_interest_all: Decimal,

    /// Non-commercial long contracts
    pub nc_long: Option<Decimal>,
    /// Non-commercial short contracts
    pub nc_short: Option<Decimal>,

    /// Commercial long contracts
    pub comm_long: Option<Decimal>,
    /// Commercial short contracts
    pub comm_short: Option<Decimal>,

    /// Nonreportable long contracts, if the dataset carries the group
    pub nr_long: Option<Decimal>,
    /// Nonreportable short contracts, if the dataset carries the group
    pub nr_short: Option<Decimal>,
}

impl WeeklyPosition {
    /// Canonical row with both primary groups populated
    pub fn new(
        market_key: &str,
        report_date: NaiveDate,
        open_interest_all: Decimal,
        nc: (Decimal, Decimal),
        comm: (Decimal, Decimal),
    ) -> Self {
        Self {
            market_key: market_key.to_string(),
            report_date,
            open_interest_all,
            nc_long: Some(nc.0),
            nc_short: Some(nc.1),
            comm_long: Some(comm.0),
            comm_short: Some(comm.1),
            nr_long: None,
            nr_short: None,
        }
    }

    /// Attach the optional nonreportable legs
    pub fn with_nonreportable(mut self, long: Decimal, short: Decimal) -> Self {
        self.nr_long = Some(long);
        self.nr_short = Some(short);
        self
    }

    /// Long leg for the given group, `None` when the group is absent
    pub fn long(&self, group: TraderGroup) -> Option<Decimal> {
        match group {
            TraderGroup::NonCommercial => self.nc_long,
            TraderGroup::Commercial => self.comm_long,
            TraderGroup::Nonreportable => self.nr_long,
        }
    }

    /// Short leg for the given group, `None` when the group is absent
    pub fn short(&self, group: TraderGroup) -> Option<Decimal> {
        match group {
            TraderGroup::NonCommercial => self.nc_short,
            TraderGroup::Commercial => self.comm_short,
            TraderGroup::Nonreportable => self.nr_short,
        }
    }

    /// Long minus short for the given group
    pub fn net(&self, group: TraderGroup) -> Option<Decimal> {
        Some(self.long(group)? - self.short(group)?)
    }

    /// Long plus short for the given group
    pub fn gross(&self, group: TraderGroup) -> Option<Decimal> {
        Some(self.long(group)? + self.short(group)?)
    }
}
