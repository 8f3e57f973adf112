//! Per-rule and per-dataset reports.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::result::{CheckResult, Priority};

/// Everything one rule produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleReport {
    /// Suite the rule belongs to.
    pub suite: String,
    /// Rule name, e.g. `check_latitude_variable`.
    pub rule: String,
    /// Results in the order the rule produced them.
    pub results: Vec<CheckResult>,
    /// Set when the rule could not be evaluated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RuleReport {
    /// Whether the rule ran and every result passed.
    pub fn passed(&self) -> bool {
        self.error.is_none() && self.results.iter().all(|r| r.passed)
    }

    /// Failing results only.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

/// Counts over every result of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of results.
    pub total: usize,
    /// Passing results.
    pub passed: usize,
    /// Failing results.
    pub failed: usize,
    /// Rules that could not be evaluated.
    pub errored_rules: usize,
    /// Failing results by priority label.
    pub failures_by_priority: BTreeMap<String, usize>,
    /// Fraction of results that passed (0.0-1.0); 1.0 when nothing ran.
    pub score: f64,
}

impl ReportSummary {
    /// Summarize a set of rule reports.
    pub fn from_rules(rules: &[RuleReport]) -> Self {
        let mut summary = Self::default();

        for rule in rules {
            if rule.error.is_some() {
                summary.errored_rules += 1;
            }
            for result in &rule.results {
                summary.total += 1;
                if result.passed {
                    summary.passed += 1;
                } else {
                    summary.failed += 1;
                    *summary
                        .failures_by_priority
                        .entry(result.priority.label().to_lowercase())
                        .or_insert(0) += 1;
                }
            }
        }

        summary.score = if summary.total == 0 {
            1.0
        } else {
            summary.passed as f64 / summary.total as f64
        };
        summary
    }

    /// Failing results at `priority`.
    pub fn failures_at(&self, priority: Priority) -> usize {
        self.failures_by_priority
            .get(&priority.label().to_lowercase())
            .copied()
            .unwrap_or(0)
    }
}

/// Result of checking one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Where the dataset came from.
    pub source_location: String,
    /// When the check ran.
    pub checked_at: DateTime<Utc>,
    /// One entry per rule, in suite then rule order.
    pub rules: Vec<RuleReport>,
    /// Summary counts.
    pub summary: ReportSummary,
}

impl Report {
    /// Build a report, computing its summary.
    pub fn new(source_location: impl Into<String>, rules: Vec<RuleReport>) -> Self {
        let summary = ReportSummary::from_rules(&rules);
        Self {
            source_location: source_location.into(),
            checked_at: Utc::now(),
            rules,
            summary,
        }
    }

    /// Look up a rule's report by name.
    pub fn rule(&self, name: &str) -> Option<&RuleReport> {
        self.rules.iter().find(|r| r.rule == name)
    }

    /// Whether every rule ran and passed.
    pub fn is_compliant(&self) -> bool {
        self.rules.iter().all(RuleReport::passed)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, results: Vec<CheckResult>, error: Option<&str>) -> RuleReport {
        RuleReport {
            suite: "imos".into(),
            rule: name.into(),
            results,
            error: error.map(String::from),
        }
    }

    #[test]
    fn test_summary_counts() {
        let rules = vec![
            rule(
                "check_title",
                vec![CheckResult::pass(&["globalattr", "title"])],
                None,
            ),
            rule(
                "check_author",
                vec![
                    CheckResult::fail(&["globalattr", "author"], "missing"),
                    CheckResult::fail(&["globalattr", "author"], "missing")
                        .with_priority(Priority::Low),
                ],
                None,
            ),
            rule("check_data_variables", vec![], Some("broken reference")),
        ];

        let summary = ReportSummary::from_rules(&rules);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.errored_rules, 1);
        assert_eq!(summary.failures_at(Priority::High), 1);
        assert_eq!(summary.failures_at(Priority::Low), 1);
        assert_eq!(summary.failures_at(Priority::Medium), 0);
        assert!((summary.score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_run_scores_full() {
        let summary = ReportSummary::from_rules(&[]);
        assert_eq!(summary.score, 1.0);
    }

    #[test]
    fn test_errored_rule_is_not_passing() {
        let report = Report::new("x.nc", vec![rule("check_data_variables", vec![], Some("bad"))]);
        assert!(!report.is_compliant());
        assert!(report.rule("check_data_variables").is_some());

        let json = report.to_json().unwrap();
        assert!(json.contains("\"error\": \"bad\""));
    }
}
