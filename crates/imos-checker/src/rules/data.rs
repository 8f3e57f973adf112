//! Rules over every variable and over data variables.

use crate::validation::{CheckResult, Check, ExpectedType, RuleOutcome};

use super::{RuleContext, collect};

/// Dimensions a data variable must span at least one of.
pub const DATA_DIMENSIONS: &[&str] = &["TIME", "LATITUDE", "LONGITUDE", "DEPTH"];

/// Attributes whose type must match their variable's element type.
const TYPED_ATTRIBUTES: &[&str] = &["_FillValue", "valid_min", "valid_max"];

/// Every variable has a text `long_name`.
pub fn check_variables_long_name(ctx: &RuleContext<'_>) -> RuleOutcome {
    Ok(collect(ctx.dataset.variables().map(|(_, variable)| {
        let name = variable.name.as_str();
        Check::variable_attribute(name, "long_name")
            .named(&["var", name, "long_name", "check_attribute_type"])
            .type_check(ctx.dataset, &ExpectedType::Text)
    })))
}

/// `_FillValue`, `valid_min` and `valid_max` share the variable's type.
pub fn check_variable_attribute_type(ctx: &RuleContext<'_>) -> RuleOutcome {
    let mut results = Vec::new();
    for (_, variable) in ctx.dataset.variables() {
        for &attribute in TYPED_ATTRIBUTES {
            let Some(attr) = variable.attribute(attribute) else {
                continue;
            };
            results.push(CheckResult::verdict(
                &["var", variable.name.as_str(), attribute, "check_attribute_type"],
                attr.nc_type == variable.nc_type,
                format!(
                    "Attribute type {} is not the variable type {}",
                    attr.nc_type, variable.nc_type
                ),
            ));
        }
    }
    Ok(results)
}

/// At least one data variable; each spans a known dimension and has a
/// `_FillValue`.
pub fn check_data_variables(ctx: &RuleContext<'_>) -> RuleOutcome {
    let classes = ctx.classes()?;
    if classes.data().is_empty() {
        return Ok(vec![CheckResult::fail(
            &["var", "data_variables", "check_data_variable_present"],
            "No data variable is present",
        )]);
    }

    let mut results = Vec::new();
    for (_, variable) in ctx.variables_in(classes.data()) {
        let name = variable.name.as_str();
        let spans_known = variable
            .dimensions
            .iter()
            .any(|dim| DATA_DIMENSIONS.contains(&dim.as_str()));
        results.push(CheckResult::verdict(
            &["var", name, "check_dimension"],
            spans_known,
            format!("Variable has none of the dimensions {}", DATA_DIMENSIONS.join(", ")),
        ));
        results.push(Check::variable_attribute(name, "_FillValue").presence_check(ctx.dataset));
    }
    Ok(results)
}
