//! Dataset container and JSON loading.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ImosError, Result};

use super::value::Attribute;
use super::variable::{VarId, Variable};

/// A netCDF dataset as seen by the checker.
///
/// Variables keep file order; a variable's [`VarId`] is its position in that
/// order and never changes for the lifetime of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DatasetRepr", into = "DatasetRepr")]
pub struct Dataset {
    source_location: String,
    dimensions: IndexMap<String, usize>,
    attributes: IndexMap<String, Attribute>,
    variables: IndexMap<String, Variable>,
}

#[derive(Serialize, Deserialize)]
struct DatasetRepr {
    #[serde(default)]
    source_location: String,
    #[serde(default)]
    dimensions: IndexMap<String, usize>,
    #[serde(default)]
    attributes: IndexMap<String, Attribute>,
    #[serde(default)]
    variables: Vec<Variable>,
}

impl TryFrom<DatasetRepr> for Dataset {
    type Error = String;

    fn try_from(repr: DatasetRepr) -> std::result::Result<Self, Self::Error> {
        let mut variables = IndexMap::with_capacity(repr.variables.len());
        for variable in repr.variables {
            if variables.contains_key(&variable.name) {
                return Err(format!("duplicate variable '{}'", variable.name));
            }
            variables.insert(variable.name.clone(), variable);
        }

        let mut dimensions = repr.dimensions;
        declare_missing_dimensions(&mut dimensions, &variables);

        Ok(Self {
            source_location: repr.source_location,
            dimensions,
            attributes: repr.attributes,
            variables,
        })
    }
}

/// Every dimension a variable spans exists in a netCDF file. A dimension
/// used but not declared is added after the declared ones, sized by the
/// data of the variable that spans only it, or 0 when there is none.
fn declare_missing_dimensions(
    dimensions: &mut IndexMap<String, usize>,
    variables: &IndexMap<String, Variable>,
) {
    for variable in variables.values() {
        for name in &variable.dimensions {
            if dimensions.contains_key(name) {
                continue;
            }
            let length = variables
                .values()
                .find(|v| v.dimensions.len() == 1 && &v.dimensions[0] == name)
                .map_or(0, |v| v.data.len());
            tracing::debug!(dimension = %name, length, "declaring undeclared dimension");
            dimensions.insert(name.clone(), length);
        }
    }
}

impl From<Dataset> for DatasetRepr {
    fn from(dataset: Dataset) -> Self {
        Self {
            source_location: dataset.source_location,
            dimensions: dataset.dimensions,
            attributes: dataset.attributes,
            variables: dataset.variables.into_values().collect(),
        }
    }
}

impl Dataset {
    /// Parse a dataset from its JSON dump.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a dataset from a JSON dump on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ImosError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Path or name of the file this dataset was read from.
    pub fn source_location(&self) -> &str {
        &self.source_location
    }

    /// Dimension names and lengths, in file order.
    pub fn dimensions(&self) -> &IndexMap<String, usize> {
        &self.dimensions
    }

    /// Global attributes.
    pub fn global_attributes(&self) -> &IndexMap<String, Attribute> {
        &self.attributes
    }

    /// Look up a global attribute.
    pub fn global_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Handle of the named variable.
    pub fn variable_id(&self, name: &str) -> Option<VarId> {
        self.variables.get_index_of(name).map(VarId)
    }

    /// Variable behind a handle.
    pub fn variable_by_id(&self, id: VarId) -> Option<&Variable> {
        self.variables.get_index(id.0).map(|(_, variable)| variable)
    }

    /// All variables with their handles, in file order.
    pub fn variables(&self) -> impl Iterator<Item = (VarId, &Variable)> {
        self.variables
            .values()
            .enumerate()
            .map(|(index, variable)| (VarId(index), variable))
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }
}

/// Builds a [`Dataset`] in code, typically from a host's netCDF reader.
#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    source_location: String,
    dimensions: IndexMap<String, usize>,
    attributes: IndexMap<String, Attribute>,
    variables: IndexMap<String, Variable>,
}

impl DatasetBuilder {
    /// Start a dataset read from `source_location`.
    pub fn new(source_location: impl Into<String>) -> Self {
        Self {
            source_location: source_location.into(),
            ..Self::default()
        }
    }

    /// Declare a dimension.
    pub fn dimension(mut self, name: impl Into<String>, length: usize) -> Self {
        self.dimensions.insert(name.into(), length);
        self
    }

    /// Add or replace a global attribute.
    pub fn global_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// Add a variable. A variable with the same name is replaced in place.
    pub fn variable(mut self, variable: Variable) -> Self {
        self.variables.insert(variable.name.clone(), variable);
        self
    }

    /// Finish the dataset. Dimensions spanned by a variable but never
    /// declared are declared here.
    pub fn build(mut self) -> Dataset {
        declare_missing_dimensions(&mut self.dimensions, &self.variables);
        Dataset {
            source_location: self.source_location,
            dimensions: self.dimensions,
            attributes: self.attributes,
            variables: self.variables,
        }
    }
}
