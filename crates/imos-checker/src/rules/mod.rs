//! The IMOS rule library.
//!
//! Every rule takes a [`RuleContext`] and returns its results in a fixed
//! order. The context is built once per dataset and carries the variable
//! classification; a classification failure surfaces only in the rules
//! that need it.

mod attributes;
mod coordinates;
mod data;
mod geospatial;
mod quality;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::cf::{CfHelper, DefaultCfHelper};
use crate::checker::DEFAULT_CONVENTIONS;
use crate::classify::ClassificationContext;
use crate::dataset::{Dataset, VarId, Variable};
use crate::error::DatasetError;
use crate::validation::{CheckResult, Rule, RuleOutcome, RuleReport, Validator, evaluate, run_rules};

/// Suite name used in reports.
pub const SUITE: &str = "imos";

/// Signature shared by every IMOS rule.
pub type ImosRuleFn = fn(&RuleContext<'_>) -> RuleOutcome;

/// Per-dataset state shared by every rule.
pub struct RuleContext<'a> {
    /// The dataset under check.
    pub dataset: &'a Dataset,
    /// CF helper used for coordinates and units.
    pub cf: &'a dyn CfHelper,
    /// Substrings the `Conventions` attribute must contain.
    pub required_conventions: &'a [String],
    classification: Result<ClassificationContext, DatasetError>,
}

impl<'a> RuleContext<'a> {
    /// Classify `dataset` and build the context.
    pub fn new(dataset: &'a Dataset, cf: &'a dyn CfHelper, required_conventions: &'a [String]) -> Self {
        Self {
            dataset,
            cf,
            required_conventions,
            classification: ClassificationContext::classify(dataset, cf),
        }
    }

    /// The classification, or the error that prevented it.
    pub fn classes(&self) -> Result<&ClassificationContext, DatasetError> {
        self.classification.as_ref().map_err(Clone::clone)
    }

    /// Variables for a set of handles, in file order.
    pub fn variables_in<'s>(
        &'s self,
        ids: &'s BTreeSet<VarId>,
    ) -> impl Iterator<Item = (VarId, &'a Variable)> + 's {
        ids.iter()
            .filter_map(|id| self.dataset.variable_by_id(*id).map(|v| (*id, v)))
    }
}

const fn rule(name: &'static str, run: ImosRuleFn) -> Rule<ImosRuleFn> {
    Rule::new(name, run)
}

/// Every IMOS rule, in run order.
pub const RULES: &[Rule<ImosRuleFn>] = &[
    rule("check_global_attributes", attributes::check_global_attributes),
    rule("check_variable_attributes", attributes::check_variable_attributes),
    rule("check_project_attribute", attributes::check_project_attribute),
    rule("check_conventions", attributes::check_conventions),
    rule("check_naming_authority", attributes::check_naming_authority),
    rule("check_data_centre", attributes::check_data_centre),
    rule("check_data_centre_email", attributes::check_data_centre_email),
    rule("check_author", attributes::check_author),
    rule("check_principal_investigator", attributes::check_principal_investigator),
    rule("check_title", attributes::check_title),
    rule("check_abstract", attributes::check_abstract),
    rule("check_citation", attributes::check_citation),
    rule("check_geospatial_lat_min_max", geospatial::check_geospatial_lat_min_max),
    rule("check_geospatial_lon_min_max", geospatial::check_geospatial_lon_min_max),
    rule("check_geospatial_vertical_min_max", geospatial::check_geospatial_vertical_min_max),
    rule("check_time_coverage", attributes::check_time_coverage),
    rule("check_date_created", attributes::check_date_created),
    rule("check_variables_long_name", data::check_variables_long_name),
    rule("check_coordinate_variables", coordinates::check_coordinate_variables),
    rule("check_time_variable", coordinates::check_time_variable),
    rule("check_longitude_variable", coordinates::check_longitude_variable),
    rule("check_latitude_variable", coordinates::check_latitude_variable),
    rule("check_vertical_variable", coordinates::check_vertical_variable),
    rule("check_variable_attribute_type", data::check_variable_attribute_type),
    rule("check_data_variables", data::check_data_variables),
    rule("check_quality_control_conventions", quality::check_quality_control_conventions),
    rule("check_quality_control_variable_listed", quality::check_quality_control_variable_listed),
    rule("check_quality_variable_dimensions", quality::check_quality_variable_dimensions),
    rule("check_quality_variable_standard_name", quality::check_quality_variable_standard_name),
    rule("check_geospatial_lat_units", attributes::check_geospatial_lat_units),
    rule("check_geospatial_lon_units", attributes::check_geospatial_lon_units),
    rule("check_geospatial_vertical_positive", attributes::check_geospatial_vertical_positive),
    rule("check_geospatial_vertical_units", attributes::check_geospatial_vertical_units),
    rule("check_author_email", attributes::check_author_email),
    rule("check_principal_investigator_email", attributes::check_principal_investigator_email),
    rule("check_quality_control_set", attributes::check_quality_control_set),
    rule("check_local_time_zone", attributes::check_local_time_zone),
    rule("check_acknowledgement", attributes::check_acknowledgement),
    rule("check_distribution_statement", attributes::check_distribution_statement),
];

/// Attribute and variable checks of the IMOS conventions.
pub struct ImosValidator {
    cf: Arc<dyn CfHelper>,
    required_conventions: Vec<String>,
}

impl ImosValidator {
    /// Create a validator using `cf` and requiring `required_conventions`.
    pub fn new(cf: Arc<dyn CfHelper>, required_conventions: Vec<String>) -> Self {
        Self {
            cf,
            required_conventions,
        }
    }

    /// Build the shared per-dataset context.
    pub fn context<'a>(&'a self, dataset: &'a Dataset) -> RuleContext<'a> {
        RuleContext::new(dataset, self.cf.as_ref(), &self.required_conventions)
    }
}

impl Default for ImosValidator {
    fn default() -> Self {
        Self::new(
            Arc::new(DefaultCfHelper),
            DEFAULT_CONVENTIONS.iter().map(|c| c.to_string()).collect(),
        )
    }
}

impl Validator for ImosValidator {
    fn suite(&self) -> &'static str {
        SUITE
    }

    fn rule_names(&self) -> Vec<&'static str> {
        RULES.iter().map(|r| r.name).collect()
    }

    fn validate(&self, dataset: &Dataset, skip: &BTreeSet<String>) -> Vec<RuleReport> {
        let context = self.context(dataset);
        run_rules(SUITE, RULES, skip, |run| run(&context))
    }

    fn run_rule(&self, name: &str, dataset: &Dataset) -> Option<RuleReport> {
        let rule = RULES.iter().find(|r| r.name == name)?;
        let context = self.context(dataset);
        Some(evaluate(SUITE, rule.name, || (rule.run)(&context)))
    }
}

/// Drop skipped checks.
fn collect(results: impl IntoIterator<Item = Option<CheckResult>>) -> Vec<CheckResult> {
    results.into_iter().flatten().collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_names_are_unique() {
        let names: HashSet<_> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), RULES.len());
        assert!(RULES.iter().all(|r| r.name.starts_with("check_")));
    }

    #[test]
    fn test_good_dataset_passes_every_rule() {
        let validator = ImosValidator::default();
        let ds = fixtures::good_dataset();
        for report in validator.validate(&ds, &BTreeSet::new()) {
            let failures: Vec<_> = report.failures().map(|r| r.display_name()).collect();
            assert!(report.error.is_none(), "{}: {:?}", report.rule, report.error);
            assert!(failures.is_empty(), "{}: {:?}", report.rule, failures);
        }
    }

    #[test]
    fn test_run_rule_matches_full_run() {
        let validator = ImosValidator::default();
        let ds = fixtures::good_dataset();
        let full = validator.validate(&ds, &BTreeSet::new());
        let single = validator.run_rule("check_latitude_variable", &ds).unwrap();
        let from_full = full.iter().find(|r| r.rule == "check_latitude_variable").unwrap();
        assert_eq!(&single, from_full);
        assert!(validator.run_rule("check_nothing", &ds).is_none());
    }
}
