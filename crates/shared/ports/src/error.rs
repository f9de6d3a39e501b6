use chrono::NaiveDate;
use cot_core::TraderGroup;
use thiserror::Error;

/// Structural errors that abort a build before any table is assembled
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("canonical input has no rows")]
    EmptyInput,

    #[error("primary group {group:?} has no populated legs in the canonical input")]
    MissingPrimaryGroup { group: TraderGroup },

    #[error("group {group:?} is active but row ({market_key}, {report_date}) lacks its legs")]
    MissingGroupValue {
        group: TraderGroup,
        market_key: String,
        report_date: NaiveDate,
    },

    #[error("duplicate key ({market_key}, {report_date}) in canonical input")]
    DuplicateKey {
        market_key: String,
        report_date: NaiveDate,
    },

    #[error("market {market_key} is not strictly date-ordered at {report_date}")]
    UnorderedMarket {
        market_key: String,
        report_date: NaiveDate,
    },

    #[error("metrics table rejected by validation: {violations} violation(s)")]
    ValidationRejected { violations: usize },
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;
