//! Quality-control variable rules.

use crate::classify::referenced_variables;
use crate::dataset::{AttrValue, Variable};
use crate::error::DatasetError;
use crate::validation::{CheckResult, Check, Operator, RuleOutcome};

use super::RuleContext;

/// `quality_control_conventions` required for each quality-control set.
pub fn quality_control_convention(set: i64) -> Option<&'static str> {
    match set {
        1 => Some("IMOS standard set using the IODE flags"),
        2 => Some("ARGO quality control procedure"),
        3 => Some("BOM (SST and Air-Sea flux) quality control procedure"),
        4 => Some("WOCE quality control procedure"),
        _ => None,
    }
}

/// Each quality-control variable names a known set, on itself or globally,
/// and carries the conventions string of that set.
pub fn check_quality_control_conventions(ctx: &RuleContext<'_>) -> RuleOutcome {
    let classes = ctx.classes()?;
    let mut results = Vec::new();

    for (_, variable) in ctx.variables_in(classes.quality_control()) {
        let name = variable.name.as_str();
        let set = variable
            .attribute("quality_control_set")
            .or_else(|| ctx.dataset.global_attribute("quality_control_set"));

        let Some(set) = set else {
            results.push(CheckResult::fail(
                &["var", name, "quality_control_set", "check_attribute_present"],
                "Attribute is not present",
            ));
            continue;
        };

        let known = set
            .value
            .as_f64()
            .filter(|v| v.fract() == 0.0)
            .map(|v| v as i64)
            .and_then(quality_control_convention);
        results.push(CheckResult::verdict(
            &["var", name, "quality_control_set", "check_attribute_value"],
            known.is_some(),
            "Value is not in the expected range",
        ));

        if let Some(convention) = known {
            results.extend(
                Check::variable_attribute(name, "quality_control_conventions")
                    .named(&["var", name, "quality_control_conventions", "check_attribute_value"])
                    .value_check(ctx.dataset, &Operator::Equal(AttrValue::from(convention)))?,
            );
        }
    }

    Ok(results)
}

/// Each quality-control variable is listed in some `ancillary_variables`.
pub fn check_quality_control_variable_listed(ctx: &RuleContext<'_>) -> RuleOutcome {
    let classes = ctx.classes()?;
    Ok(classes
        .quality_control()
        .iter()
        .filter_map(|id| ctx.dataset.variable_by_id(*id).map(|v| (*id, v)))
        .map(|(id, variable)| {
            CheckResult::verdict(
                &["var", variable.name.as_str(), "check_ancillary_variable_listed"],
                classes.ancillary().contains(&id),
                "Quality control variable is not listed in any ancillary_variables attribute",
            )
        })
        .collect())
}

/// Every (data variable, quality-control variable) pair joined by the data
/// variable's `ancillary_variables`, in file order.
fn quality_control_pairs<'a>(
    ctx: &RuleContext<'a>,
) -> Result<Vec<(&'a Variable, &'a Variable)>, DatasetError> {
    let classes = ctx.classes()?;
    let mut pairs = Vec::new();

    for (_, data) in ctx.variables_in(classes.data()) {
        for id in referenced_variables(ctx.dataset, data, "ancillary_variables")? {
            if !classes.quality_control().contains(&id) {
                continue;
            }
            if let Some(qc) = ctx.dataset.variable_by_id(id) {
                pairs.push((data, qc));
            }
        }
    }

    Ok(pairs)
}

/// A quality-control variable spans the same dimensions as its data variable.
pub fn check_quality_variable_dimensions(ctx: &RuleContext<'_>) -> RuleOutcome {
    Ok(quality_control_pairs(ctx)?
        .into_iter()
        .map(|(data, qc)| {
            CheckResult::verdict(
                &["var", qc.name.as_str(), data.name.as_str(), "check_dimensions"],
                qc.dimensions == data.dimensions,
                format!(
                    "Dimensions ({}) differ from {} dimensions ({})",
                    qc.dimensions.join(", "),
                    data.name,
                    data.dimensions.join(", ")
                ),
            )
        })
        .collect())
}

/// A quality-control variable's standard_name is its data variable's
/// standard_name followed by ` status_flag`. Pairs whose data variable has
/// no standard_name are skipped.
pub fn check_quality_variable_standard_name(ctx: &RuleContext<'_>) -> RuleOutcome {
    let mut results = Vec::new();

    for (data, qc) in quality_control_pairs(ctx)? {
        let Some(standard_name) = data.text_attribute("standard_name") else {
            continue;
        };
        let expected = format!("{} status_flag", standard_name);
        results.extend(
            Check::variable_attribute(&qc.name, "standard_name")
                .named(&["var", qc.name.as_str(), data.name.as_str(), "standard_name", "check_attribute_value"])
                .value_check(ctx.dataset, &Operator::Equal(AttrValue::Text(expected)))?,
        );
    }

    Ok(results)
}
