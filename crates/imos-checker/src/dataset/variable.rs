//! netCDF variables and their identity handles.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::value::{Attribute, NcType};

/// Stable handle for a variable within one dataset.
///
/// Handles are assigned in file order when the dataset is built and are the
/// only identity the checker uses when it asks "is this the same variable".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VarId(pub usize);

/// A netCDF variable: dimensions, attributes, element type and data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(rename = "type")]
    pub nc_type: NcType,
    #[serde(default)]
    pub attributes: IndexMap<String, Attribute>,
    /// Values flattened in storage order.
    #[serde(default)]
    pub data: Vec<f64>,
}

impl Variable {
    /// Create a variable with no dimensions, attributes or data.
    pub fn new(name: impl Into<String>, nc_type: NcType) -> Self {
        Self {
            name: name.into(),
            dimensions: Vec::new(),
            nc_type,
            attributes: IndexMap::new(),
            data: Vec::new(),
        }
    }

    /// Set the dimension names.
    pub fn with_dimensions<I, S>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions = dimensions.into_iter().map(Into::into).collect();
        self
    }

    /// Add or replace an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// Set the data values.
    pub fn with_data(mut self, data: Vec<f64>) -> Self {
        self.data = data;
        self
    }

    /// Look up an attribute.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Whether the attribute is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Text content of an attribute; `None` when absent or not textual.
    pub fn text_attribute(&self, name: &str) -> Option<&str> {
        self.attribute(name).and_then(Attribute::as_text)
    }

    /// Whether the variable spans any dimension.
    pub fn has_dimensions(&self) -> bool {
        !self.dimensions.is_empty()
    }
}
