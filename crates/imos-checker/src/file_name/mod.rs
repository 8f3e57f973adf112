//! IMOS file naming convention.
//!
//! An IMOS file name is an underscore-separated list of fields followed by
//! the `.nc` extension:
//!
//! ```text
//! IMOS_<facility>_<data codes>_<start>_<platform>_<version>[_<product>][_END-<end>][_C-<created>][_PART<n>].nc
//! ```
//!
//! The name is parsed once per dataset into a [`FileName`]; each rule looks
//! at one part of it.

mod fields;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::dataset::Dataset;
use crate::validation::{Rule, RuleOutcome, RuleReport, Validator, evaluate, run_rules};

/// Suite name used in reports.
pub const SUITE: &str = "imos_file_name";

/// Required extension.
pub const EXTENSION: &str = "nc";

/// Allowed field count.
pub const FIELD_COUNT: std::ops::RangeInclusive<usize> = 6..=10;

/// A file name split into base name, extension and fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileName {
    /// Everything before the last `.`.
    pub base: String,
    /// Everything after the last `.`, empty when there is no `.`.
    pub extension: String,
    /// The base name split on `_`.
    pub fields: Vec<String>,
}

impl FileName {
    /// Parse the file name at the end of a path. Never fails.
    pub fn parse(source_location: &str) -> Self {
        let name = source_location.rsplit('/').next().unwrap_or_default();

        let (base, extension) = match name.rsplit_once('.') {
            Some((base, extension)) => (base.to_string(), extension.to_string()),
            None => (name.to_string(), String::new()),
        };
        let fields = base.split('_').map(String::from).collect();

        Self {
            base,
            extension,
            fields,
        }
    }

    /// Field `n`, counting from 1.
    pub fn field(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.fields.get(i))
            .map(String::as_str)
    }
}

/// Per-dataset state shared by the file name rules.
pub struct FileNameContext<'a> {
    /// The dataset, for attributes the name must agree with.
    pub dataset: &'a Dataset,
    /// The parsed name.
    pub file_name: FileName,
}

impl<'a> FileNameContext<'a> {
    /// Parse the dataset's source location.
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            dataset,
            file_name: FileName::parse(dataset.source_location()),
        }
    }
}

/// Signature shared by every file name rule.
pub type FileNameRuleFn = fn(&FileNameContext<'_>) -> RuleOutcome;

const fn rule(name: &'static str, run: FileNameRuleFn) -> Rule<FileNameRuleFn> {
    Rule::new(name, run)
}

/// Every file name rule, in run order.
pub const RULES: &[Rule<FileNameRuleFn>] = &[
    rule("check_extension_name", fields::check_extension_name),
    rule("check_file_name", fields::check_file_name),
    rule("check_file_name_field1", fields::check_file_name_field1),
    rule("check_file_name_field2", fields::check_file_name_field2),
    rule("check_file_name_field3", fields::check_file_name_field3),
    rule("check_file_name_field4", fields::check_file_name_field4),
    rule("check_file_name_field5", fields::check_file_name_field5),
    rule("check_file_name_field6", fields::check_file_name_field6),
    rule("check_file_name_field7_to_field10", fields::check_file_name_field7_to_field10),
];

/// Checks the dataset's file name against the IMOS naming convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileNameValidator;

impl Validator for FileNameValidator {
    fn suite(&self) -> &'static str {
        SUITE
    }

    fn rule_names(&self) -> Vec<&'static str> {
        RULES.iter().map(|r| r.name).collect()
    }

    fn validate(&self, dataset: &Dataset, skip: &BTreeSet<String>) -> Vec<RuleReport> {
        let context = FileNameContext::new(dataset);
        tracing::debug!(
            base = %context.file_name.base,
            fields = context.file_name.fields.len(),
            "parsed file name"
        );
        run_rules(SUITE, RULES, skip, |run| run(&context))
    }

    fn run_rule(&self, name: &str, dataset: &Dataset) -> Option<RuleReport> {
        let rule = RULES.iter().find(|r| r.name == name)?;
        let context = FileNameContext::new(dataset);
        Some(evaluate(SUITE, rule.name, || (rule.run)(&context)))
    }
}
