use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Policy constants for the metrics engine
///
/// The trailing window and its warm-up threshold are dataset policy, not
/// implementation detail, so they live here rather than as literals in the
/// normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Length of the trailing heat-range window, in weekly observations
    pub trailing_window_weeks: usize,
    /// Observations required before trailing-window metrics are defined
    pub warmup_weeks: usize,
    /// Absolute tolerance for the validation suite's re-derivations
    pub tolerance: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trailing_window_weeks: 260, // ~5 years of weekly reports
            warmup_weeks: 52,           // ~1 year before trailing metrics apply
            tolerance: dec!(0.000000001),
        }
    }
}

impl EngineConfig {
    /// Config with a custom trailing window, keeping the default warm-up
    pub fn with_trailing_window(weeks: usize) -> Self {
        Self {
            trailing_window_weeks: weeks,
            ..Self::default()
        }
    }
}
