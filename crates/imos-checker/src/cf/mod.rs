//! CF convention helpers the IMOS checks build on.
//!
//! The checker assumes general CF compliance is tested elsewhere. What it
//! needs from CF is narrow: which variables are coordinate variables, whether
//! two unit strings are compatible, and which names and units denote a
//! space/time axis. [`CfHelper`] is that seam; [`DefaultCfHelper`] is the
//! implementation used unless a host supplies its own.

mod units;

use std::collections::BTreeSet;

use crate::dataset::{Dataset, VarId, Variable};

pub use units::{Quantity, quantity_of, units_convertible};

/// Variable names (lower-cased) recognized as a space or time axis.
pub const AXIS_NAMES: &[&str] = &[
    "time",
    "t",
    "lat",
    "latitude",
    "y",
    "grid_latitude",
    "projection_y_coordinate",
    "lon",
    "longitude",
    "x",
    "grid_longitude",
    "projection_x_coordinate",
    "z",
    "depth",
    "height",
    "altitude",
    "pressure",
    "level",
];

/// Units strings recognized as a space axis.
pub const AXIS_UNITS: &[&str] = &[
    "degrees_north",
    "degree_north",
    "degrees_N",
    "degree_N",
    "degreesN",
    "degreeN",
    "degrees_east",
    "degree_east",
    "degrees_E",
    "degree_E",
    "degreesE",
    "degreeE",
    "level",
    "layer",
    "sigma_level",
];

/// Names and standard names (lower-cased) of vertical coordinates.
const VERTICAL_NAMES: &[&str] = &[
    "z",
    "vertical",
    "depth",
    "height",
    "altitude",
    "elevation",
    "pressure",
    "pres",
    "sea_water_pressure",
    "height_above_sea_floor",
];

/// CF operations the rule library consumes.
pub trait CfHelper: Send + Sync {
    /// Handles of the dataset's coordinate variables.
    fn find_coordinate_variables(&self, dataset: &Dataset) -> BTreeSet<VarId>;

    /// Whether `from` units can be converted to `to` units.
    fn units_convertible(&self, from: &str, to: &str) -> bool;

    /// Whether a variable name denotes a space/time axis.
    fn is_axis_name(&self, name: &str) -> bool {
        AXIS_NAMES.contains(&name.to_lowercase().as_str())
    }

    /// Whether a units string denotes a space/time axis.
    fn is_axis_units(&self, units: &str) -> bool {
        AXIS_UNITS.contains(&units) || quantity_of(units) == Some(Quantity::ReferenceTime)
    }

    /// Whether a variable looks like a vertical coordinate.
    fn is_vertical_coordinate(&self, variable: &Variable) -> bool {
        let named = VERTICAL_NAMES.contains(&variable.name.to_lowercase().as_str());
        let standard_named = variable
            .text_attribute("standard_name")
            .is_some_and(|s| VERTICAL_NAMES.contains(&s.to_lowercase().as_str()));
        let z_axis = variable
            .text_attribute("axis")
            .is_some_and(|axis| axis.eq_ignore_ascii_case("z"));
        let positive = variable
            .text_attribute("positive")
            .is_some_and(|p| p.eq_ignore_ascii_case("up") || p.eq_ignore_ascii_case("down"));

        named || standard_named || z_axis || positive
    }
}

/// Table-driven CF helper.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCfHelper;

impl CfHelper for DefaultCfHelper {
    /// A coordinate variable shares its name with a dimension and spans
    /// exactly that one dimension.
    fn find_coordinate_variables(&self, dataset: &Dataset) -> BTreeSet<VarId> {
        dataset
            .variables()
            .filter(|(_, variable)| {
                dataset.dimensions().contains_key(&variable.name)
                    && variable.dimensions.len() == 1
                    && variable.dimensions[0] == variable.name
            })
            .map(|(id, _)| id)
            .collect()
    }

    fn units_convertible(&self, from: &str, to: &str) -> bool {
        units_convertible(from, to)
    }
}
