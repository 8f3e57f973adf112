//! Suites of rules and the engine that runs them.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::cf::{CfHelper, DefaultCfHelper};
use crate::checker::CheckerConfig;
use crate::dataset::Dataset;
use crate::error::DatasetError;
use crate::file_name::FileNameValidator;
use crate::rules::ImosValidator;

use super::report::RuleReport;
use super::result::CheckResult;

/// What a rule returns: its results, or the reason it could not run.
pub type RuleOutcome = Result<Vec<CheckResult>, DatasetError>;

/// A named rule. `R` is the suite's rule signature, usually a fn pointer
/// taking the suite's per-dataset context.
#[derive(Clone, Copy)]
pub struct Rule<R> {
    /// Rule name, e.g. `check_title`.
    pub name: &'static str,
    /// The rule body.
    pub run: R,
}

impl<R> Rule<R> {
    /// Create a rule.
    pub const fn new(name: &'static str, run: R) -> Self {
        Self { name, run }
    }
}

/// A suite of rules sharing one per-dataset setup.
pub trait Validator: Send + Sync {
    /// Suite name used in reports.
    fn suite(&self) -> &'static str;

    /// Names of every rule in the suite, in run order.
    fn rule_names(&self) -> Vec<&'static str>;

    /// Run every rule whose name is not in `skip`.
    fn validate(&self, dataset: &Dataset, skip: &BTreeSet<String>) -> Vec<RuleReport>;

    /// Run one rule by name, or `None` if the suite has no such rule.
    fn run_rule(&self, name: &str, dataset: &Dataset) -> Option<RuleReport>;
}

/// Run one rule body, turning a dataset error into an errored report.
pub(crate) fn evaluate(
    suite: &str,
    rule: &'static str,
    run: impl FnOnce() -> RuleOutcome,
) -> RuleReport {
    match run() {
        Ok(results) => {
            tracing::debug!(
                suite,
                rule,
                results = results.len(),
                failed = results.iter().filter(|r| !r.passed).count(),
                "rule evaluated"
            );
            RuleReport {
                suite: suite.to_string(),
                rule: rule.to_string(),
                results,
                error: None,
            }
        }
        Err(err) => {
            tracing::warn!(suite, rule, error = %err, "rule could not be evaluated");
            RuleReport {
                suite: suite.to_string(),
                rule: rule.to_string(),
                results: Vec::new(),
                error: Some(err.to_string()),
            }
        }
    }
}

/// Run the rules of a suite that are not skipped, in table order.
pub(crate) fn run_rules<R>(
    suite: &str,
    rules: &[Rule<R>],
    skip: &BTreeSet<String>,
    mut call: impl FnMut(&R) -> RuleOutcome,
) -> Vec<RuleReport> {
    rules
        .iter()
        .filter(|rule| !skip.contains(rule.name))
        .map(|rule| evaluate(suite, rule.name, || call(&rule.run)))
        .collect()
}

/// Runs registered suites against a dataset, in registration order.
pub struct ValidationEngine {
    validators: Vec<Box<dyn Validator>>,
    skip_rules: BTreeSet<String>,
}

impl ValidationEngine {
    /// Create an engine with the default suites.
    pub fn new() -> Self {
        Self::with_config(&CheckerConfig::default(), Arc::new(DefaultCfHelper))
    }

    /// Create an engine with the suites `config` enables.
    pub fn with_config(config: &CheckerConfig, cf: Arc<dyn CfHelper>) -> Self {
        let mut validators: Vec<Box<dyn Validator>> = vec![Box::new(ImosValidator::new(
            cf,
            config.required_conventions.clone(),
        ))];
        if config.run_file_name_checks {
            validators.push(Box::new(FileNameValidator));
        }

        Self {
            validators,
            skip_rules: config.skip_rules.iter().cloned().collect(),
        }
    }

    /// Create an engine with no suites.
    pub fn empty() -> Self {
        Self {
            validators: Vec::new(),
            skip_rules: BTreeSet::new(),
        }
    }

    /// Register another suite.
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Names of every registered rule.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.validators.iter().flat_map(|v| v.rule_names()).collect()
    }

    /// Run every suite and collect the rule reports.
    pub fn validate(&self, dataset: &Dataset) -> Vec<RuleReport> {
        let mut reports = Vec::new();

        for validator in &self.validators {
            let suite_reports = validator.validate(dataset, &self.skip_rules);
            tracing::info!(
                suite = validator.suite(),
                rules = suite_reports.len(),
                failing = suite_reports.iter().filter(|r| !r.passed()).count(),
                "suite finished"
            );
            reports.extend(suite_reports);
        }

        reports
    }

    /// Run the first rule called `name` in any suite.
    pub fn run_rule(&self, name: &str, dataset: &Dataset) -> Option<RuleReport> {
        self.validators
            .iter()
            .find_map(|validator| validator.run_rule(name, dataset))
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}
