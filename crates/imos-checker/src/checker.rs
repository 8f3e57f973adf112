//! Main checker struct and public API.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cf::{CfHelper, DefaultCfHelper};
use crate::classify::ClassificationContext;
use crate::dataset::Dataset;
use crate::error::{ImosError, Result};
use crate::file_name::FileNameValidator;
use crate::rules::ImosValidator;
use crate::validation::{Report, RuleReport, ValidationEngine, Validator};

/// Conventions required unless configured otherwise.
pub const DEFAULT_CONVENTIONS: &[&str] = &["CF-1.6", "IMOS-1.3"];

/// Configuration for a checker run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Substrings the `Conventions` attribute must contain.
    pub required_conventions: Vec<String>,
    /// Whether the file name suite runs.
    pub run_file_name_checks: bool,
    /// Rules left out of a full run.
    pub skip_rules: Vec<String>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            required_conventions: DEFAULT_CONVENTIONS.iter().map(|c| c.to_string()).collect(),
            run_file_name_checks: true,
            skip_rules: Vec::new(),
        }
    }
}

impl CheckerConfig {
    /// Parse and validate a configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject rule names that no suite provides.
    pub fn validate(&self) -> Result<()> {
        let known: Vec<&str> = ImosValidator::default()
            .rule_names()
            .into_iter()
            .chain(FileNameValidator.rule_names())
            .collect();

        let unknown: Vec<&str> = self
            .skip_rules
            .iter()
            .map(String::as_str)
            .filter(|name| !known.contains(name))
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ImosError::Config(format!(
                "unknown rules in skip_rules: {}",
                unknown.join(", ")
            )))
        }
    }

    /// Skip these rules as well.
    pub fn with_skip_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_rules.extend(rules.into_iter().map(Into::into));
        self
    }

    /// Turn the file name suite on or off.
    pub fn with_file_name_checks(mut self, enabled: bool) -> Self {
        self.run_file_name_checks = enabled;
        self
    }
}

/// The IMOS conventions checker.
pub struct ImosChecker {
    config: CheckerConfig,
    cf: Arc<dyn CfHelper>,
    engine: ValidationEngine,
}

impl ImosChecker {
    /// Create a checker with default configuration.
    pub fn new() -> Self {
        Self::with_cf_helper(CheckerConfig::default(), Arc::new(DefaultCfHelper))
    }

    /// Create a checker with custom configuration.
    ///
    /// Fails when `skip_rules` names a rule that does not exist.
    pub fn with_config(config: CheckerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_cf_helper(config, Arc::new(DefaultCfHelper)))
    }

    /// Create a checker that answers CF questions with `cf`.
    pub fn with_cf_helper(config: CheckerConfig, cf: Arc<dyn CfHelper>) -> Self {
        let engine = ValidationEngine::with_config(&config, Arc::clone(&cf));
        Self { config, cf, engine }
    }

    /// The configuration in use.
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Names of every rule this checker can run.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.engine.rule_names()
    }

    /// Check a dataset against every enabled rule.
    pub fn check(&self, dataset: &Dataset) -> Report {
        let _span = tracing::info_span!("check", source = dataset.source_location()).entered();
        let report = Report::new(dataset.source_location(), self.engine.validate(dataset));
        tracing::info!(
            passed = report.summary.passed,
            failed = report.summary.failed,
            errored_rules = report.summary.errored_rules,
            "check finished"
        );
        report
    }

    /// Variable roles as the rules see them.
    ///
    /// Fails when a cross-reference attribute names a missing variable.
    pub fn classify(&self, dataset: &Dataset) -> Result<ClassificationContext> {
        Ok(ClassificationContext::classify(dataset, self.cf.as_ref())?)
    }

    /// Load a JSON dataset dump and check it.
    pub fn check_file(&self, path: impl AsRef<Path>) -> Result<Report> {
        let dataset = Dataset::from_json_file(path)?;
        Ok(self.check(&dataset))
    }

    /// Run one rule by name, ignoring `skip_rules`.
    pub fn run_rule(&self, name: &str, dataset: &Dataset) -> Result<RuleReport> {
        self.engine
            .run_rule(name, dataset)
            .ok_or_else(|| ImosError::UnknownRule(name.to_string()))
    }
}

impl Default for ImosChecker {
    fn default() -> Self {
        Self::new()
    }
}
