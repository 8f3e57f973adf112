//! Global attribute rules.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dataset::AttrValue;
use crate::error::DatasetError;
use crate::validation::{CheckResult, Check, DATE_FORMAT, ExpectedType, Operator, RuleOutcome};

use super::{RuleContext, collect};

/// Required `project` value.
pub const PROJECT: &str = "Integrated Marine Observing System (IMOS)";
/// Required `naming_authority` value.
pub const NAMING_AUTHORITY: &str = "IMOS";
/// Required `data_centre` value.
pub const DATA_CENTRE: &str = "eMarine Information Infrastructure (eMII)";
/// Required `data_centre_email` value.
pub const DATA_CENTRE_EMAIL: &str = "info@emii.org.au";

/// Required acknowledgement wording.
pub const ACKNOWLEDGEMENT: &str = "Any users of IMOS data are required to clearly acknowledge the source of the material derived from IMOS in the format: \"Data was sourced from the Integrated Marine Observing System (IMOS) - IMOS is a national collaborative research infrastructure, supported by the Australian Government.\"";

/// Required distribution statement wording.
pub const DISTRIBUTION_STATEMENT: &str = "Data may be re-used, provided that related metadata explaining the data has been reviewed by the user, and the data is appropriately acknowledged. Data, products and services from IMOS are provided \"as is\" without any warranty as to fitness for a particular purpose.";

/// Older acknowledgement wording, still accepted.
static LEGACY_ACKNOWLEDGEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)^.*Data was sourced from the Integrated Marine Observing System \(IMOS\)\s*-\s*IMOS is supported by the Australian Government through the National Collaborative Research Infrastructure Strategy.*$",
    )
    .unwrap()
});

/// Global attributes holding text must not be empty.
pub fn check_global_attributes(ctx: &RuleContext<'_>) -> RuleOutcome {
    Ok(ctx
        .dataset
        .global_attributes()
        .iter()
        .filter_map(|(name, attr)| attr.as_text().map(|text| (name, text)))
        .map(|(name, text)| {
            CheckResult::verdict(
                &["globalattr", name.as_str(), "check_attribute_empty"],
                !text.is_empty(),
                "Attribute value is empty",
            )
        })
        .collect())
}

/// Variable attributes holding text must not be empty.
pub fn check_variable_attributes(ctx: &RuleContext<'_>) -> RuleOutcome {
    let mut results = Vec::new();
    for (_, variable) in ctx.dataset.variables() {
        for (name, attr) in &variable.attributes {
            if let Some(text) = attr.as_text() {
                results.push(CheckResult::verdict(
                    &["var", variable.name.as_str(), name.as_str(), "check_attribute_empty"],
                    !text.is_empty(),
                    "Attribute value is empty",
                ));
            }
        }
    }
    Ok(results)
}

fn check_equal(ctx: &RuleContext<'_>, attribute: &str, expected: &str) -> RuleOutcome {
    let result = Check::global(attribute)
        .named(&["globalattr", attribute, "check_attributes"])
        .value_check(ctx.dataset, &Operator::Equal(expected.into()))?;
    Ok(collect([result]))
}

/// `project` equals [`PROJECT`].
pub fn check_project_attribute(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_equal(ctx, "project", PROJECT)
}

/// `naming_authority` equals [`NAMING_AUTHORITY`].
pub fn check_naming_authority(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_equal(ctx, "naming_authority", NAMING_AUTHORITY)
}

/// `data_centre` equals [`DATA_CENTRE`].
pub fn check_data_centre(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_equal(ctx, "data_centre", DATA_CENTRE)
}

/// `data_centre_email` equals [`DATA_CENTRE_EMAIL`].
pub fn check_data_centre_email(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_equal(ctx, "data_centre_email", DATA_CENTRE_EMAIL)
}

/// One result per required convention, each a substring of `Conventions`.
pub fn check_conventions(ctx: &RuleContext<'_>) -> RuleOutcome {
    let mut results = Vec::new();
    for convention in ctx.required_conventions {
        results.push(
            Check::global("Conventions")
                .named(&["globalattr", "Conventions", convention.as_str(), "check_attributes"])
                .value_check(ctx.dataset, &Operator::SubString(convention.as_str()))?,
        );
    }
    Ok(collect(results))
}

fn check_text_type(ctx: &RuleContext<'_>, attribute: &str) -> RuleOutcome {
    let result = Check::global(attribute)
        .named(&["globalattr", attribute, "check_attribute_type"])
        .type_check(ctx.dataset, &ExpectedType::Text);
    Ok(collect([result]))
}

/// `author` is text.
pub fn check_author(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_text_type(ctx, "author")
}

/// `principal_investigator` is text.
pub fn check_principal_investigator(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_text_type(ctx, "principal_investigator")
}

/// `title` is text.
pub fn check_title(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_text_type(ctx, "title")
}

/// `abstract` is text.
pub fn check_abstract(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_text_type(ctx, "abstract")
}

/// `citation` is text.
pub fn check_citation(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_text_type(ctx, "citation")
}

fn check_date(ctx: &RuleContext<'_>, attribute: &str) -> Result<Option<CheckResult>, DatasetError> {
    Check::global(attribute)
        .named(&["globalattr", attribute, "check_date_format"])
        .value_check(ctx.dataset, &Operator::DateFormat(DATE_FORMAT))
}

/// Coverage dates; nothing to check without a TIME variable.
pub fn check_time_coverage(ctx: &RuleContext<'_>) -> RuleOutcome {
    if ctx.dataset.variable("TIME").is_none() {
        return Ok(Vec::new());
    }
    Ok(collect([
        check_date(ctx, "time_coverage_start")?,
        check_date(ctx, "time_coverage_end")?,
    ]))
}

/// `date_created` uses the IMOS date format.
pub fn check_date_created(ctx: &RuleContext<'_>) -> RuleOutcome {
    Ok(collect([check_date(ctx, "date_created")?]))
}

fn check_optional(ctx: &RuleContext<'_>, attribute: &str, operator: Operator<'_>) -> RuleOutcome {
    let result = Check::global(attribute)
        .named(&["globalattr", attribute, "check_attributes"])
        .skip_if_absent()
        .value_check(ctx.dataset, &operator)?;
    Ok(collect([result]))
}

/// `geospatial_lat_units`, when present, is `degrees_north`.
pub fn check_geospatial_lat_units(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_optional(ctx, "geospatial_lat_units", Operator::Equal("degrees_north".into()))
}

/// `geospatial_lon_units`, when present, is `degrees_east`.
pub fn check_geospatial_lon_units(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_optional(ctx, "geospatial_lon_units", Operator::Equal("degrees_east".into()))
}

/// `geospatial_vertical_positive`, when present, is `up` or `down`.
pub fn check_geospatial_vertical_positive(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_optional(
        ctx,
        "geospatial_vertical_positive",
        Operator::Within(vec!["up".into(), "down".into()]),
    )
}

/// `geospatial_vertical_units`, when present, converts to meters.
pub fn check_geospatial_vertical_units(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_optional(
        ctx,
        "geospatial_vertical_units",
        Operator::Convertible { units: "meter", cf: ctx.cf },
    )
}

/// `author_email`, when present, is an email address.
pub fn check_author_email(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_optional(ctx, "author_email", Operator::Email)
}

/// `principal_investigator_email`, when present, is an email address.
pub fn check_principal_investigator_email(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_optional(ctx, "principal_investigator_email", Operator::Email)
}

/// Recognized quality-control sets.
pub fn quality_control_sets() -> Vec<AttrValue> {
    (1..=4).map(AttrValue::Integer).collect()
}

/// `quality_control_set`, when present, is a recognized set.
pub fn check_quality_control_set(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_optional(ctx, "quality_control_set", Operator::Within(quality_control_sets()))
}

/// UTC offsets in half-hour steps, -12 to +12.5.
pub fn local_time_zones() -> Vec<AttrValue> {
    (0..=49).map(|step| AttrValue::Float(-12.0 + 0.5 * f64::from(step))).collect()
}

/// `local_time_zone`, when present, is a half-hour UTC offset.
pub fn check_local_time_zone(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_optional(ctx, "local_time_zone", Operator::Within(local_time_zones()))
}

/// Current wording as a substring, or the older wording.
pub fn check_acknowledgement(ctx: &RuleContext<'_>) -> RuleOutcome {
    let check = Check::global("acknowledgement")
        .named(&["globalattr", "acknowledgement", "check_attributes"]);

    let current = check.value_check(ctx.dataset, &Operator::SubString(ACKNOWLEDGEMENT))?;
    if current.as_ref().is_some_and(|r| r.passed) {
        return Ok(collect([current]));
    }

    let legacy = check.value_check(ctx.dataset, &Operator::Matches(&LEGACY_ACKNOWLEDGEMENT))?;
    if legacy.as_ref().is_some_and(|r| r.passed) {
        return Ok(collect([legacy]));
    }
    Ok(collect([current]))
}

/// `distribution_statement` contains [`DISTRIBUTION_STATEMENT`].
pub fn check_distribution_statement(ctx: &RuleContext<'_>) -> RuleOutcome {
    let result = Check::global("distribution_statement")
        .named(&["globalattr", "distribution_statement", "check_attributes"])
        .value_check(ctx.dataset, &Operator::SubString(DISTRIBUTION_STATEMENT))?;
    Ok(collect([result]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cf::DefaultCfHelper;
    use crate::dataset::{Attribute, Dataset, DatasetBuilder, NcType, Variable};
    use crate::rules::fixtures::{empty_dataset, good_dataset};

    fn run(rule: fn(&RuleContext<'_>) -> RuleOutcome, ds: &Dataset) -> Vec<CheckResult> {
        let conventions = vec!["CF-1.6".to_string(), "IMOS-1.3".to_string()];
        let ctx = RuleContext::new(ds, &DefaultCfHelper, &conventions);
        rule(&ctx).unwrap()
    }

    fn bad_dataset() -> Dataset {
        DatasetBuilder::new("bad.nc")
            .global_attribute("project", Attribute::text("Some other project"))
            .global_attribute("Conventions", Attribute::text("CF-1.5"))
            .global_attribute("naming_authority", Attribute::text("NOT IMOS"))
            .global_attribute("title", Attribute::double(1.0))
            .global_attribute("comment", Attribute::text(""))
            .global_attribute("date_created", Attribute::text("2014/03/01 00:00:00"))
            .global_attribute("author_email", Attribute::text("nobody"))
            .global_attribute("quality_control_set", Attribute::int(5))
            .global_attribute("local_time_zone", Attribute::double(10.25))
            .global_attribute("geospatial_vertical_units", Attribute::text("dbar"))
            .global_attribute("geospatial_vertical_positive", Attribute::text("sideways"))
            .global_attribute("acknowledgement", Attribute::text("Thanks"))
            .variable(
                Variable::new("TIME", NcType::Double)
                    .with_dimensions(["TIME"])
                    .with_attribute("comment", Attribute::text("")),
            )
            .build()
    }

    #[test]
    fn test_empty_text_attributes() {
        let ds = bad_dataset();
        let globals = run(check_global_attributes, &ds);
        let comment = globals.iter().find(|r| r.name_contains("comment")).unwrap();
        assert!(!comment.passed);
        assert!(globals.iter().filter(|r| r.name_contains("project")).all(|r| r.passed));
        // numeric attributes are not checked
        assert!(!globals.iter().any(|r| r.name_contains("title")));

        let vars = run(check_variable_attributes, &ds);
        assert_eq!(vars.len(), 1);
        assert!(!vars[0].passed);
        assert_eq!(vars[0].reasons, vec!["Attribute value is empty".to_string()]);
    }

    #[test]
    fn test_fixed_values() {
        let good = good_dataset();
        let bad = bad_dataset();
        let empty = empty_dataset();
        for rule in [check_project_attribute, check_naming_authority, check_data_centre, check_data_centre_email] {
            assert!(run(rule, &good).iter().all(|r| r.passed));
            let missing = run(rule, &empty);
            assert_eq!(missing.len(), 1);
            assert!(!missing[0].passed);
        }
        assert!(!run(check_project_attribute, &bad)[0].passed);
        assert!(!run(check_naming_authority, &bad)[0].passed);
    }

    #[test]
    fn test_conventions_two_outcomes() {
        let good = run(check_conventions, &good_dataset());
        assert_eq!(good.len(), 2);
        assert!(good.iter().all(|r| r.passed));

        let bad = run(check_conventions, &bad_dataset());
        assert_eq!(bad.len(), 2);
        assert!(bad.iter().all(|r| !r.passed));
    }

    #[test]
    fn test_text_typed_attributes() {
        assert!(run(check_title, &good_dataset())[0].passed);
        assert!(!run(check_title, &bad_dataset())[0].passed);
        assert!(!run(check_abstract, &empty_dataset())[0].passed);
    }

    #[test]
    fn test_dates() {
        assert!(run(check_date_created, &good_dataset())[0].passed);
        assert!(!run(check_date_created, &bad_dataset())[0].passed);

        let coverage = run(check_time_coverage, &bad_dataset());
        assert_eq!(coverage.len(), 2);
        assert!(coverage.iter().all(|r| !r.passed));
        assert!(run(check_time_coverage, &empty_dataset()).is_empty());
    }

    #[test]
    fn test_optional_attributes_skip_when_absent() {
        let optional = [
            check_geospatial_lat_units,
            check_geospatial_lon_units,
            check_geospatial_vertical_positive,
            check_geospatial_vertical_units,
            check_author_email,
            check_principal_investigator_email,
            check_quality_control_set,
            check_local_time_zone,
        ];
        for rule in optional {
            assert!(run(rule, &empty_dataset()).is_empty());
            assert!(run(rule, &good_dataset()).iter().all(|r| r.passed));
        }

        for rule in [
            check_geospatial_vertical_positive,
            check_geospatial_vertical_units,
            check_author_email,
            check_quality_control_set,
            check_local_time_zone,
        ] {
            let results = run(rule, &bad_dataset());
            assert_eq!(results.len(), 1);
            assert!(!results[0].passed);
        }
    }

    #[test]
    fn test_local_time_zone_range() {
        let zones = local_time_zones();
        assert_eq!(zones.first(), Some(&AttrValue::Float(-12.0)));
        assert_eq!(zones.last(), Some(&AttrValue::Float(12.5)));
        assert!(zones.contains(&AttrValue::Float(9.5)));
    }

    #[test]
    fn test_acknowledgement_variants() {
        assert!(run(check_acknowledgement, &good_dataset())[0].passed);
        assert!(!run(check_acknowledgement, &bad_dataset())[0].passed);
        assert!(!run(check_acknowledgement, &empty_dataset())[0].passed);

        let legacy = DatasetBuilder::new("x.nc")
            .global_attribute(
                "acknowledgement",
                Attribute::text(
                    "Any users (including re-packagers) of IMOS data are required to clearly acknowledge the source of the material in this format: \"Data was sourced from the Integrated Marine Observing System (IMOS) - IMOS is supported by the Australian Government through the National Collaborative Research Infrastructure Strategy (NCRIS) and the Super Science Initiative (SSI).\"",
                ),
            )
            .build();
        let results = run(check_acknowledgement, &legacy);
        assert_eq!(results.len(), 1);
        assert!(results[0].passed);
    }

    #[test]
    fn test_distribution_statement() {
        assert!(run(check_distribution_statement, &good_dataset())[0].passed);
        assert!(!run(check_distribution_statement, &empty_dataset())[0].passed);
    }
}
