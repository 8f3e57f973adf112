//! Geospatial bounds against the coordinate data they summarize.

use crate::dataset::Variable;
use crate::validation::{Address, Check, ExpectedType, Operator, RuleOutcome};

use super::RuleContext;

/// The vertical coordinate: a variable named `VERTICAL`, else the first
/// variable in file order that looks vertical.
pub fn vertical_variable<'a>(ctx: &RuleContext<'a>) -> Option<&'a Variable> {
    ctx.dataset.variable("VERTICAL").or_else(|| {
        ctx.dataset
            .variables()
            .map(|(_, variable)| variable)
            .find(|variable| ctx.cf.is_vertical_coordinate(variable))
    })
}

/// Numeric type of each bound, and equality with the coordinate's data
/// range when the coordinate exists. Absent bounds are skipped.
fn check_bounds(
    ctx: &RuleContext<'_>,
    coordinate: Option<&Variable>,
    min_attribute: &str,
    max_attribute: &str,
) -> RuleOutcome {
    let mut results = Vec::new();

    for (attribute, is_min) in [(min_attribute, true), (max_attribute, false)] {
        let Some(bound) = ctx.dataset.global_attribute(attribute) else {
            continue;
        };

        results.extend(
            Check::global(attribute)
                .named(&["globalattr", attribute, "check_attribute_type"])
                .type_check(ctx.dataset, &ExpectedType::Numeric),
        );

        if let Some(variable) = coordinate {
            let (operator, kind) = if is_min {
                (Operator::Min(bound.value.clone()), "check_minimum_value")
            } else {
                (Operator::Max(bound.value.clone()), "check_maximum_value")
            };
            results.extend(
                Check::new(Address::Variable(&variable.name))
                    .named(&["globalattr", attribute, kind])
                    .value_check(ctx.dataset, &operator)?,
            );
        }
    }

    Ok(results)
}

/// Latitude bounds against LATITUDE.
pub fn check_geospatial_lat_min_max(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_bounds(
        ctx,
        ctx.dataset.variable("LATITUDE"),
        "geospatial_lat_min",
        "geospatial_lat_max",
    )
}

/// Longitude bounds against LONGITUDE.
pub fn check_geospatial_lon_min_max(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_bounds(
        ctx,
        ctx.dataset.variable("LONGITUDE"),
        "geospatial_lon_min",
        "geospatial_lon_max",
    )
}

/// Vertical bounds against the vertical coordinate.
pub fn check_geospatial_vertical_min_max(ctx: &RuleContext<'_>) -> RuleOutcome {
    check_bounds(
        ctx,
        vertical_variable(ctx),
        "geospatial_vertical_min",
        "geospatial_vertical_max",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cf::DefaultCfHelper;
    use crate::dataset::{Attribute, Dataset, DatasetBuilder, NcType};
    use crate::error::DatasetError;
    use crate::rules::fixtures::{empty_dataset, good_dataset};
    use crate::validation::CheckResult;

    fn run(
        rule: fn(&RuleContext<'_>) -> RuleOutcome,
        ds: &Dataset,
    ) -> Result<Vec<CheckResult>, DatasetError> {
        let ctx = RuleContext::new(ds, &DefaultCfHelper, &[]);
        rule(&ctx)
    }

    fn bad_dataset() -> Dataset {
        DatasetBuilder::new("bad.nc")
            .global_attribute("geospatial_lat_min", Attribute::double(-50.0))
            .global_attribute("geospatial_lat_max", Attribute::double(50.0))
            .global_attribute("geospatial_vertical_min", Attribute::text("0"))
            .variable(Variable::new("LATITUDE", NcType::Double).with_data(vec![-42.6, -42.5]))
            .variable(
                Variable::new("VERTICAL", NcType::Float)
                    .with_dimensions(["VERTICAL"])
                    .with_data(vec![0.0, 10.0]),
            )
            .build()
    }

    #[test]
    fn test_good_bounds_match_data() {
        let ds = good_dataset();
        for rule in [
            check_geospatial_lat_min_max,
            check_geospatial_lon_min_max,
            check_geospatial_vertical_min_max,
        ] {
            let results = run(rule, &ds).unwrap();
            assert_eq!(results.len(), 4);
            assert!(results.iter().all(|r| r.passed));
        }
    }

    #[test]
    fn test_mismatched_bounds_fail_value_but_not_type() {
        let results = run(check_geospatial_lat_min_max, &bad_dataset()).unwrap();
        for result in results {
            if result.name_contains("check_attribute_type") {
                assert!(result.passed);
            } else {
                assert!(!result.passed);
            }
        }
    }

    #[test]
    fn test_numeric_text_bound_fails_type_only() {
        let results = run(check_geospatial_vertical_min_max, &bad_dataset()).unwrap();
        assert_eq!(results.len(), 2);
        let type_check = results.iter().find(|r| r.name_contains("check_attribute_type")).unwrap();
        assert!(!type_check.passed);
        let value_check = results.iter().find(|r| !r.name_contains("check_attribute_type")).unwrap();
        assert!(value_check.passed, "{:?}", value_check.reasons);
    }

    #[test]
    fn test_absent_bounds_produce_nothing() {
        for rule in [
            check_geospatial_lat_min_max,
            check_geospatial_lon_min_max,
            check_geospatial_vertical_min_max,
        ] {
            assert!(run(rule, &empty_dataset()).unwrap().is_empty());
        }
    }

    #[test]
    fn test_bounds_without_coordinate_check_type_only() {
        let ds = DatasetBuilder::new("x.nc")
            .global_attribute("geospatial_lon_min", Attribute::double(100.0))
            .build();
        let results = run(check_geospatial_lon_min_max, &ds).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].passed);
    }

    #[test]
    fn test_empty_coordinate_is_dataset_error() {
        let ds = DatasetBuilder::new("x.nc")
            .global_attribute("geospatial_lat_min", Attribute::double(-40.0))
            .variable(Variable::new("LATITUDE", NcType::Double))
            .build();
        let err = run(check_geospatial_lat_min_max, &ds).unwrap_err();
        assert!(matches!(err, DatasetError::EmptyData { .. }));
    }

    #[test]
    fn test_vertical_variable_lookup() {
        let ds = good_dataset();
        let ctx = RuleContext::new(&ds, &DefaultCfHelper, &[]);
        assert_eq!(vertical_variable(&ctx).unwrap().name, "DEPTH");

        let ds = bad_dataset();
        let ctx = RuleContext::new(&ds, &DefaultCfHelper, &[]);
        assert_eq!(vertical_variable(&ctx).unwrap().name, "VERTICAL");
    }
}
