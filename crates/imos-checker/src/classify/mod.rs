//! Variable role inference.
//!
//! netCDF files carry no schema saying which variable is data and which is
//! an axis or a flag array. Roles are inferred from attribute patterns:
//! dimension self-reference, `ancillary_variables` / `coordinates`
//! cross-references and flag-like naming. The result is computed once per
//! dataset and shared by every rule.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::cf::CfHelper;
use crate::dataset::{Dataset, VarId, Variable};
use crate::error::DatasetError;

/// Name suffix marking a quality-control variable.
pub const QC_SUFFIX: &str = "_quality_control";

/// Primary role of a variable, by precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Spans exactly the dimension it is named after.
    Coordinate,
    /// Named by another variable's `coordinates` attribute.
    AuxiliaryCoordinate,
    /// Holds quality-control flags.
    QualityControl,
    /// Named by another variable's `ancillary_variables` attribute.
    Ancillary,
    /// Dimensioned and in no other role.
    Data,
    /// Scalar and unreferenced.
    Unclassified,
}

/// Quality-control predicates in evaluation order. A variable is QC if any holds.
const QC_PREDICATES: &[fn(&Variable) -> bool] = &[
    has_qc_suffix,
    has_flag_standard_name,
    has_flag_long_name,
    has_flag_attributes,
];

fn has_qc_suffix(variable: &Variable) -> bool {
    variable.name.ends_with(QC_SUFFIX)
}

fn has_flag_standard_name(variable: &Variable) -> bool {
    variable
        .text_attribute("standard_name")
        .is_some_and(|s| s.ends_with("status_flag"))
}

fn has_flag_long_name(variable: &Variable) -> bool {
    variable
        .text_attribute("long_name")
        .is_some_and(|s| s.contains("status_flag") || s.contains("quality flag"))
}

fn has_flag_attributes(variable: &Variable) -> bool {
    variable.has_attribute("flag_values") || variable.has_attribute("flag_meanings")
}

/// Whether a variable encodes quality-control flags.
pub fn is_quality_control(variable: &Variable) -> bool {
    QC_PREDICATES.iter().any(|predicate| predicate(variable))
}

/// Resolve the space-separated variable names held in `attribute`.
///
/// Absent or non-text attributes resolve to nothing; a name with no matching
/// variable is a malformed dataset.
pub fn referenced_variables(
    dataset: &Dataset,
    variable: &Variable,
    attribute: &str,
) -> Result<Vec<VarId>, DatasetError> {
    let Some(names) = variable.text_attribute(attribute) else {
        return Ok(Vec::new());
    };

    names
        .split_whitespace()
        .map(|name| {
            dataset
                .variable_id(name)
                .ok_or_else(|| DatasetError::UnresolvedReference {
                    variable: variable.name.clone(),
                    attribute: attribute.to_string(),
                    target: name.to_string(),
                })
        })
        .collect()
}

/// Variable role sets for one dataset, keyed by [`VarId`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationContext {
    coordinates: BTreeSet<VarId>,
    auxiliary_coordinates: BTreeSet<VarId>,
    ancillary: BTreeSet<VarId>,
    quality_control: BTreeSet<VarId>,
    data: BTreeSet<VarId>,
}

impl ClassificationContext {
    /// Classify every variable of `dataset`.
    ///
    /// Fails only when an `ancillary_variables` or `coordinates` attribute
    /// names a variable the dataset does not have.
    pub fn classify(dataset: &Dataset, cf: &dyn CfHelper) -> Result<Self, DatasetError> {
        let coordinates = cf.find_coordinate_variables(dataset);

        let mut auxiliary_coordinates = BTreeSet::new();
        let mut ancillary = BTreeSet::new();
        for (_, variable) in dataset.variables() {
            auxiliary_coordinates.extend(referenced_variables(dataset, variable, "coordinates")?);
            ancillary.extend(referenced_variables(dataset, variable, "ancillary_variables")?);
        }

        let data = dataset
            .variables()
            .filter(|(id, variable)| {
                variable.has_dimensions()
                    && !coordinates.contains(id)
                    && !ancillary.contains(id)
                    && !auxiliary_coordinates.contains(id)
            })
            .map(|(id, _)| id)
            .collect();

        let quality_control = dataset
            .variables()
            .filter(|(_, variable)| is_quality_control(variable))
            .map(|(id, _)| id)
            .collect();

        let context = Self {
            coordinates,
            auxiliary_coordinates,
            ancillary,
            quality_control,
            data,
        };

        tracing::debug!(
            coordinates = context.coordinates.len(),
            auxiliary_coordinates = context.auxiliary_coordinates.len(),
            ancillary = context.ancillary.len(),
            quality_control = context.quality_control.len(),
            data = context.data.len(),
            "classified dataset variables"
        );

        Ok(context)
    }

    /// Coordinate variables.
    pub fn coordinates(&self) -> &BTreeSet<VarId> {
        &self.coordinates
    }

    /// Variables named by some `ancillary_variables` attribute.
    pub fn ancillary(&self) -> &BTreeSet<VarId> {
        &self.ancillary
    }

    /// Quality-control variables.
    pub fn quality_control(&self) -> &BTreeSet<VarId> {
        &self.quality_control
    }

    /// Data variables, in file order.
    pub fn data(&self) -> &BTreeSet<VarId> {
        &self.data
    }

    /// The primary role of a variable.
    ///
    /// A variable can sit in several sets (a QC variable is usually also
    /// ancillary); the first matching role in [`Role`] order wins.
    pub fn role(&self, id: VarId) -> Role {
        if self.coordinates.contains(&id) {
            Role::Coordinate
        } else if self.auxiliary_coordinates.contains(&id) {
            Role::AuxiliaryCoordinate
        } else if self.quality_control.contains(&id) {
            Role::QualityControl
        } else if self.ancillary.contains(&id) {
            Role::Ancillary
        } else if self.data.contains(&id) {
            Role::Data
        } else {
            Role::Unclassified
        }
    }
}
