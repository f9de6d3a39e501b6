use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One validation failure, tied to the row and check that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Market the failing row belongs to; `None` for table-level checks
    pub market_key: Option<String>,
    /// Report week of the failing row; `None` for table-level checks
    pub report_date: Option<NaiveDate>,
    /// Dotted check identifier, e.g. `heat.pos_all.bounds`
    pub check: String,
    /// Human-readable description of the mismatch
    pub message: String,
}

impl Violation {
    /// Table-level violation, not tied to a single row
    pub fn table(check: &str, message: String) -> Self {
        Self {
            market_key: None,
            report_date: None,
            check: check.to_string(),
            message,
        }
    }

    /// Row-level violation
    pub fn row(market_key: &str, report_date: NaiveDate, check: &str, message: String) -> Self {
        Self {
            market_key: Some(market_key.to_string()),
            report_date: Some(report_date),
            check: check.to_string(),
            message,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.market_key, &self.report_date) {
            (Some(market), Some(date)) => {
                write!(f, "[{}] ({}, {}): {}", self.check, market, date, self.message)
            }
            _ => write!(f, "[{}] {}", self.check, self.message),
        }
    }
}

/// Ordered list of everything wrong with a metrics table
///
/// Empty means PASS. A non-empty report is a contract to the caller that
/// the accompanying table must not be persisted or served.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter()
    }

    /// Violations whose check identifier starts with the given prefix
    pub fn matching(&self, prefix: &str) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(move |v| v.check.starts_with(prefix))
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "validation PASS");
        }
        writeln!(f, "validation FAIL: {} violation(s)", self.len())?;
        for violation in &self.violations {
            writeln!(f, "  {}", violation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_pass() {
        let report = ValidationReport::new();
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "validation PASS");
    }

    #[test]
    fn display_lists_every_violation() {
        let mut report = ValidationReport::new();
        report.push(Violation::table("structure.rows", "0 rows".to_string()));
        report.push(Violation::row(
            "gold",
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            "heat.pos_all.bounds",
            "pos 1.2 outside [0, 1]".to_string(),
        ));

        let text = report.to_string();
        assert!(text.contains("2 violation(s)"));
        assert!(text.contains("[structure.rows]"));
        assert!(text.contains("(gold, 2024-01-02)"));
    }

    #[test]
    fn matching_filters_by_check_prefix() {
        let mut report = ValidationReport::new();
        report.push(Violation::table("heat.degenerate", "x".to_string()));
        report.push(Violation::table("share.bounds", "y".to_string()));
        assert_eq!(report.matching("heat.").count(), 1);
    }
}
