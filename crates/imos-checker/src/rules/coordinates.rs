//! Coordinate variable rules: integrity of every coordinate variable, and
//! the attribute bundles required on TIME, LATITUDE, LONGITUDE and the
//! vertical coordinate.

use crate::dataset::{AttrValue, Dataset, NcType};
use crate::error::DatasetError;
use crate::validation::{CheckResult, Check, ExpectedType, Operator, RuleOutcome, is_monotonic};

use super::geospatial::vertical_variable;
use super::{RuleContext, collect};

/// Units required on TIME.
pub const TIME_UNITS: &str = "days since 1950-01-01 00:00:00 UTC";

fn floating_types() -> ExpectedType {
    ExpectedType::OneOf(vec![NcType::Float, NcType::Double])
}

/// Every coordinate variable is numeric and monotonic, and at least one
/// of them is a space or time axis.
pub fn check_coordinate_variables(ctx: &RuleContext<'_>) -> RuleOutcome {
    let classes = ctx.classes()?;
    let mut results = Vec::new();
    let mut axis_found = false;

    for (_, variable) in ctx.variables_in(classes.coordinates()) {
        let name = variable.name.as_str();
        results.extend(
            Check::variable(name)
                .named(&["var", name, "check_variable_type"])
                .type_check(ctx.dataset, &ExpectedType::Numeric),
        );
        results.push(CheckResult::verdict(
            &["var", name, "check_monotonic"],
            is_monotonic(&variable.data),
            "Values are not monotonic",
        ));

        axis_found = axis_found
            || ctx.cf.is_axis_name(name)
            || variable
                .text_attribute("units")
                .is_some_and(|units| ctx.cf.is_axis_units(units))
            || variable.has_attribute("positive");
    }

    if !classes.coordinates().is_empty() {
        results.push(CheckResult::verdict(
            &["var", "coordinate_variables", "check_axis"],
            axis_found,
            "No coordinate variable is a space or time axis",
        ));
    }

    Ok(results)
}

fn attribute_equals(
    dataset: &Dataset,
    variable: &str,
    attribute: &str,
    expected: AttrValue,
) -> Result<Option<CheckResult>, DatasetError> {
    Check::variable_attribute(variable, attribute)
        .named(&["var", variable, attribute, "check_attribute_value"])
        .value_check(dataset, &Operator::Equal(expected))
}

fn attribute_present(dataset: &Dataset, variable: &str, attribute: &str) -> CheckResult {
    Check::variable_attribute(variable, attribute).presence_check(dataset)
}

fn attribute_is_text(dataset: &Dataset, variable: &str, attribute: &str) -> Option<CheckResult> {
    Check::variable_attribute(variable, attribute)
        .named(&["var", variable, attribute, "check_attribute_type"])
        .type_check(dataset, &ExpectedType::Text)
}

fn variable_type(dataset: &Dataset, variable: &str, expected: ExpectedType) -> Option<CheckResult> {
    Check::variable(variable)
        .named(&["var", variable, "check_variable_type"])
        .type_check(dataset, &expected)
}

/// Two attributes that must jointly equal one of the candidate pairs.
///
/// Always two results, one per attribute, carrying the combined verdict:
/// both pass if any candidate pair fully matches, otherwise both fail.
pub fn check_attribute_pair(
    dataset: &Dataset,
    variable: &str,
    attributes: [&str; 2],
    candidates: &[[AttrValue; 2]],
) -> Vec<CheckResult> {
    let actual = attributes.map(|attribute| {
        dataset
            .variable(variable)
            .and_then(|v| v.attribute(attribute))
            .map(|a| &a.value)
    });

    let pair_matches = candidates.iter().any(|pair| {
        actual
            .iter()
            .zip(pair)
            .all(|(value, expected)| value.is_some_and(|v| v.matches(expected)))
    });

    attributes
        .into_iter()
        .enumerate()
        .map(|(i, attribute)| {
            let name = ["var", variable, attribute, "check_attribute_value"];
            if pair_matches {
                return CheckResult::pass(&name);
            }
            let reason = match actual[i] {
                None => "Variable attribute is not present".to_string(),
                Some(value) if candidates.iter().any(|pair| value.matches(&pair[i])) => format!(
                    "Value {} does not pair with {} {}",
                    value,
                    attributes[1 - i],
                    actual[1 - i].map_or_else(|| "(absent)".to_string(), ToString::to_string),
                ),
                Some(_) => "Value is not in the expected range".to_string(),
            };
            CheckResult::fail(&name, reason)
        })
        .collect()
}

/// TIME attribute bundle and element type, when TIME exists.
pub fn check_time_variable(ctx: &RuleContext<'_>) -> RuleOutcome {
    let ds = ctx.dataset;
    if ds.variable("TIME").is_none() {
        return Ok(Vec::new());
    }

    let calendar = Check::variable_attribute("TIME", "calendar")
        .named(&["var", "TIME", "calendar", "check_attribute_value"])
        .skip_if_absent()
        .value_check(ds, &Operator::Equal("gregorian".into()))?;

    Ok(collect([
        attribute_equals(ds, "TIME", "standard_name", "time".into())?,
        attribute_equals(ds, "TIME", "axis", "T".into())?,
        Some(attribute_present(ds, "TIME", "valid_min")),
        Some(attribute_present(ds, "TIME", "valid_max")),
        attribute_equals(ds, "TIME", "units", TIME_UNITS.into())?,
        calendar,
        variable_type(ds, "TIME", ExpectedType::Exactly(NcType::Double)),
    ]))
}

/// LATITUDE attribute bundle with the fixed -90/90 valid range.
pub fn check_latitude_variable(ctx: &RuleContext<'_>) -> RuleOutcome {
    let ds = ctx.dataset;
    if ds.variable("LATITUDE").is_none() {
        return Ok(Vec::new());
    }

    Ok(collect([
        attribute_equals(ds, "LATITUDE", "standard_name", "latitude".into())?,
        attribute_equals(ds, "LATITUDE", "axis", "Y".into())?,
        attribute_equals(ds, "LATITUDE", "valid_min", AttrValue::Float(-90.0))?,
        attribute_equals(ds, "LATITUDE", "valid_max", AttrValue::Float(90.0))?,
        attribute_equals(ds, "LATITUDE", "units", "degrees_north".into())?,
        attribute_is_text(ds, "LATITUDE", "reference_datum"),
        variable_type(ds, "LATITUDE", floating_types()),
    ]))
}

/// LONGITUDE attribute bundle; the valid range is 0/360 or -180/180.
pub fn check_longitude_variable(ctx: &RuleContext<'_>) -> RuleOutcome {
    let ds = ctx.dataset;
    if ds.variable("LONGITUDE").is_none() {
        return Ok(Vec::new());
    }

    let mut results = collect([
        attribute_equals(ds, "LONGITUDE", "standard_name", "longitude".into())?,
        attribute_equals(ds, "LONGITUDE", "axis", "X".into())?,
    ]);
    results.extend(check_attribute_pair(
        ds,
        "LONGITUDE",
        ["valid_min", "valid_max"],
        &[
            [AttrValue::Float(0.0), AttrValue::Float(360.0)],
            [AttrValue::Float(-180.0), AttrValue::Float(180.0)],
        ],
    ));
    results.extend(collect([
        attribute_equals(ds, "LONGITUDE", "units", "degrees_east".into())?,
        attribute_is_text(ds, "LONGITUDE", "reference_datum"),
        variable_type(ds, "LONGITUDE", floating_types()),
    ]));
    Ok(results)
}

/// Vertical coordinate bundle; `standard_name` and `positive` pair as
/// depth/down or height/up.
pub fn check_vertical_variable(ctx: &RuleContext<'_>) -> RuleOutcome {
    let ds = ctx.dataset;
    let Some(variable) = vertical_variable(ctx) else {
        return Ok(Vec::new());
    };
    let name = variable.name.as_str();

    let mut results = vec![
        attribute_present(ds, name, "valid_min"),
        attribute_present(ds, name, "valid_max"),
    ];
    results.extend(check_attribute_pair(
        ds,
        name,
        ["standard_name", "positive"],
        &[
            ["depth".into(), "down".into()],
            ["height".into(), "up".into()],
        ],
    ));

    let units = Check::variable_attribute(name, "units")
        .named(&["var", name, "units", "check_attribute_value"])
        .value_check(ds, &Operator::Convertible { units: "meter", cf: ctx.cf })?;

    results.extend(collect([
        attribute_equals(ds, name, "axis", "Z".into())?,
        units,
        attribute_is_text(ds, name, "reference_datum"),
        variable_type(ds, name, floating_types()),
    ]));
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cf::DefaultCfHelper;
    use crate::dataset::{Attribute, DatasetBuilder, Variable};
    use crate::rules::fixtures::{empty_dataset, good_dataset};

    fn run(rule: fn(&RuleContext<'_>) -> RuleOutcome, ds: &Dataset) -> Vec<CheckResult> {
        let ctx = RuleContext::new(ds, &DefaultCfHelper, &[]);
        rule(&ctx).unwrap()
    }

    fn latitude(valid_min: f64) -> Dataset {
        DatasetBuilder::new("x.nc")
            .variable(
                Variable::new("LATITUDE", NcType::Double)
                    .with_attribute("standard_name", Attribute::text("latitude"))
                    .with_attribute("axis", Attribute::text("Y"))
                    .with_attribute("units", Attribute::text("degrees_north"))
                    .with_attribute("reference_datum", Attribute::text("WGS84"))
                    .with_attribute("valid_min", Attribute::double(valid_min))
                    .with_attribute("valid_max", Attribute::double(90.0)),
            )
            .build()
    }

    fn longitude(valid_min: f64, valid_max: f64) -> Dataset {
        DatasetBuilder::new("x.nc")
            .variable(
                Variable::new("LONGITUDE", NcType::Float)
                    .with_attribute("valid_min", Attribute::double(valid_min))
                    .with_attribute("valid_max", Attribute::double(valid_max)),
            )
            .build()
    }

    fn range_results(results: &[CheckResult]) -> Vec<&CheckResult> {
        results
            .iter()
            .filter(|r| r.name_contains("valid_min") || r.name_contains("valid_max"))
            .collect()
    }

    #[test]
    fn test_latitude_bundle() {
        let results = run(check_latitude_variable, &latitude(-90.0));
        assert_eq!(results.len(), 7);
        assert!(results.iter().all(|r| r.passed));

        let results = run(check_latitude_variable, &latitude(-91.0));
        let failed: Vec<_> = results.iter().filter(|r| !r.passed).collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].name_contains("valid_min"));
    }

    #[test]
    fn test_integer_valid_range_matches_by_value() {
        let ds = DatasetBuilder::new("x.nc")
            .variable(
                Variable::new("LATITUDE", NcType::Double)
                    .with_attribute("valid_min", Attribute::int(-90))
                    .with_attribute("valid_max", Attribute::int(90)),
            )
            .build();
        let results = run(check_latitude_variable, &ds);
        assert!(range_results(&results).iter().all(|r| r.passed));
    }

    #[test]
    fn test_longitude_dual_range() {
        for (min, max) in [(0.0, 360.0), (-180.0, 180.0)] {
            let results = run(check_longitude_variable, &longitude(min, max));
            let range = range_results(&results);
            assert_eq!(range.len(), 2);
            assert!(range.iter().all(|r| r.passed));
        }

        for (min, max) in [(-180.0, 360.0), (0.0, 180.0), (-90.0, 90.0)] {
            let results = run(check_longitude_variable, &longitude(min, max));
            let range = range_results(&results);
            assert_eq!(range.len(), 2);
            assert!(range.iter().all(|r| !r.passed));
        }
    }

    #[test]
    fn test_mismatched_pair_reason() {
        let results = run(check_longitude_variable, &longitude(-180.0, 360.0));
        let min = results.iter().find(|r| r.name_contains("valid_min")).unwrap();
        assert!(min.reasons[0].contains("does not pair with valid_max"));
    }

    #[test]
    fn test_time_variable() {
        assert!(run(check_time_variable, &good_dataset()).iter().all(|r| r.passed));
        assert!(run(check_time_variable, &empty_dataset()).is_empty());

        let ds = DatasetBuilder::new("x.nc")
            .variable(
                Variable::new("TIME", NcType::Float)
                    .with_attribute("standard_name", Attribute::text("date"))
                    .with_attribute("axis", Attribute::text("X"))
                    .with_attribute("units", Attribute::text("seconds since 1970-01-01"))
                    .with_attribute("calendar", Attribute::text("julian")),
            )
            .build();
        let results = run(check_time_variable, &ds);
        assert_eq!(results.len(), 7);
        assert!(results.iter().all(|r| !r.passed));
    }

    #[test]
    fn test_calendar_skipped_when_absent() {
        let ds = DatasetBuilder::new("x.nc")
            .variable(Variable::new("TIME", NcType::Double))
            .build();
        let results = run(check_time_variable, &ds);
        assert!(!results.iter().any(|r| r.name_contains("calendar")));
    }

    #[test]
    fn test_vertical_variable() {
        let results = run(check_vertical_variable, &good_dataset());
        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| r.passed));

        let ds = DatasetBuilder::new("x.nc")
            .variable(
                Variable::new("VERTICAL", NcType::Int)
                    .with_attribute("standard_name", Attribute::text("depth"))
                    .with_attribute("positive", Attribute::text("up"))
                    .with_attribute("units", Attribute::text("dbar")),
            )
            .build();
        let results = run(check_vertical_variable, &ds);
        assert!(results.iter().all(|r| !r.passed));
        assert!(run(check_vertical_variable, &empty_dataset()).is_empty());
    }

    fn height_dataset(positive: &str) -> Dataset {
        DatasetBuilder::new("x.nc")
            .variable(
                Variable::new("HEIGHT_ABOVE_SENSOR", NcType::Float)
                    .with_data(vec![1.0, 2.0])
                    .with_attribute("standard_name", Attribute::text("height"))
                    .with_attribute("positive", Attribute::text(positive))
                    .with_attribute("axis", Attribute::text("Z"))
                    .with_attribute("units", Attribute::text("m"))
                    .with_attribute("reference_datum", Attribute::text("sensor"))
                    .with_attribute("valid_min", Attribute::float(-10.0))
                    .with_attribute("valid_max", Attribute::float(100.0)),
            )
            .build()
    }

    #[test]
    fn test_vertical_height_up_pair() {
        let results = run(check_vertical_variable, &height_dataset("up"));
        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| r.passed), "{:?}", results);

        let results = run(check_vertical_variable, &height_dataset("down"));
        let pair: Vec<_> = results
            .iter()
            .filter(|r| r.name_contains("standard_name") || r.name_contains("positive"))
            .collect();
        assert_eq!(pair.len(), 2);
        assert!(pair.iter().all(|r| !r.passed));
        assert_eq!(results.iter().filter(|r| !r.passed).count(), 2);
    }

    #[test]
    fn test_single_axis_outcome_for_many_coordinates() {
        let ds = DatasetBuilder::new("x.nc")
            .dimension("TIME", 2)
            .dimension("DEPTH", 2)
            .variable(
                Variable::new("TIME", NcType::Double)
                    .with_dimensions(["TIME"])
                    .with_data(vec![1.0, 2.0]),
            )
            .variable(
                Variable::new("DEPTH", NcType::Float)
                    .with_dimensions(["DEPTH"])
                    .with_data(vec![5.0, 10.0]),
            )
            .build();
        let results = run(check_coordinate_variables, &ds);

        assert_eq!(results.len(), 5);
        let axis: Vec<_> = results.iter().filter(|r| r.name_contains("check_axis")).collect();
        assert_eq!(axis.len(), 1);
        assert!(axis[0].passed);
        assert_eq!(axis[0].display_name(), "var.coordinate_variables.check_axis");
    }

    #[test]
    fn test_coordinate_variables() {
        let results = run(check_coordinate_variables, &good_dataset());
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.passed));

        let ds = DatasetBuilder::new("x.nc")
            .dimension("station", 3)
            .variable(
                Variable::new("station", NcType::Char)
                    .with_dimensions(["station"])
                    .with_data(vec![3.0, 1.0, 2.0]),
            )
            .build();
        let results = run(check_coordinate_variables, &ds);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| !r.passed));
    }

    #[test]
    fn test_axis_by_positive_attribute() {
        let ds = DatasetBuilder::new("x.nc")
            .dimension("NOMINAL", 2)
            .variable(
                Variable::new("NOMINAL", NcType::Float)
                    .with_dimensions(["NOMINAL"])
                    .with_data(vec![1.0, 2.0])
                    .with_attribute("positive", Attribute::text("down")),
            )
            .build();
        let results = run(check_coordinate_variables, &ds);
        assert!(results.iter().all(|r| r.passed));
    }
}
