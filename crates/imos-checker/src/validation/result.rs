//! Check results produced by every rule.

use serde::{Deserialize, Serialize};

/// Priority of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Nice to have.
    Low,
    /// Recommended by the conventions.
    Medium,
    /// Required by the conventions.
    High,
}

impl Priority {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// The outcome of one check against one entity.
///
/// `name` is hierarchical: category, entity, optional sub-entity, then the
/// kind of check, e.g. `["var", "LATITUDE", "valid_min", "check_attributes"]`.
/// A skipped check produces no result at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Priority level.
    pub priority: Priority,
    /// Whether the check passed.
    pub passed: bool,
    /// What was checked.
    pub name: Vec<String>,
    /// Why the check failed.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub reasons: Vec<String>,
}

impl CheckResult {
    /// Create a result with no reasons.
    pub fn new(priority: Priority, passed: bool, name: &[&str]) -> Self {
        Self {
            priority,
            passed,
            name: name.iter().map(|part| part.to_string()).collect(),
            reasons: Vec::new(),
        }
    }

    /// A passing high-priority result.
    pub fn pass(name: &[&str]) -> Self {
        Self::new(Priority::High, true, name)
    }

    /// A failing high-priority result with one reason.
    pub fn fail(name: &[&str], reason: impl Into<String>) -> Self {
        Self::new(Priority::High, false, name).with_reason(reason)
    }

    /// Pass or fail depending on `passed`; the reason is kept only on failure.
    pub fn verdict(name: &[&str], passed: bool, reason: impl Into<String>) -> Self {
        if passed {
            Self::pass(name)
        } else {
            Self::fail(name, reason)
        }
    }

    /// Add a failure reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasons.push(reason.into());
        self
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Whether any part of the name equals `part`.
    pub fn name_contains(&self, part: &str) -> bool {
        self.name.iter().any(|p| p == part)
    }

    /// The name joined with `.` for display.
    pub fn display_name(&self) -> String {
        self.name.join(".")
    }
}
