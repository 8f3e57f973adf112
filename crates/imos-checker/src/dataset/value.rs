//! Attribute values and netCDF element types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// netCDF element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NcType {
    /// NC_BYTE: signed 8-bit integer
    Byte,
    /// NC_UBYTE: unsigned 8-bit integer
    UByte,
    /// NC_SHORT: signed 16-bit integer
    Short,
    /// NC_USHORT: unsigned 16-bit integer
    UShort,
    /// NC_INT: signed 32-bit integer
    Int,
    /// NC_UINT: unsigned 32-bit integer
    UInt,
    /// NC_INT64: signed 64-bit integer
    Int64,
    /// NC_UINT64: unsigned 64-bit integer
    UInt64,
    /// NC_FLOAT: 32-bit floating point
    Float,
    /// NC_DOUBLE: 64-bit floating point
    Double,
    /// NC_CHAR: fixed-length character data
    Char,
    /// NC_STRING: variable-length string
    String,
}

impl NcType {
    /// Integer and floating-point types.
    pub fn is_numeric(&self) -> bool {
        !self.is_text()
    }

    /// NC_FLOAT and NC_DOUBLE.
    pub fn is_floating(&self) -> bool {
        matches!(self, NcType::Float | NcType::Double)
    }

    /// NC_CHAR and NC_STRING.
    pub fn is_text(&self) -> bool {
        matches!(self, NcType::Char | NcType::String)
    }
}

impl fmt::Display for NcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NcType::Byte => write!(f, "NC_BYTE"),
            NcType::UByte => write!(f, "NC_UBYTE"),
            NcType::Short => write!(f, "NC_SHORT"),
            NcType::UShort => write!(f, "NC_USHORT"),
            NcType::Int => write!(f, "NC_INT"),
            NcType::UInt => write!(f, "NC_UINT"),
            NcType::Int64 => write!(f, "NC_INT64"),
            NcType::UInt64 => write!(f, "NC_UINT64"),
            NcType::Float => write!(f, "NC_FLOAT"),
            NcType::Double => write!(f, "NC_DOUBLE"),
            NcType::Char => write!(f, "NC_CHAR"),
            NcType::String => write!(f, "NC_STRING"),
        }
    }
}

/// The value held by a global or variable attribute.
///
/// Scalars and short sequences only; absence of an attribute is `None` at
/// the lookup site, never a variant here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Integer(i64),
    Float(f64),
    IntArray(Vec<i64>),
    FloatArray(Vec<f64>),
}

impl AttrValue {
    /// The string content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// A single number, if this is a numeric scalar or a one-element sequence.
    pub fn as_f64(&self) -> Option<f64> {
        match self.numbers()?.as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    /// All numbers held by this value; `None` for text.
    pub fn numbers(&self) -> Option<Vec<f64>> {
        match self {
            AttrValue::Text(_) => None,
            AttrValue::Integer(v) => Some(vec![*v as f64]),
            AttrValue::Float(v) => Some(vec![*v]),
            AttrValue::IntArray(values) => Some(values.iter().map(|v| *v as f64).collect()),
            AttrValue::FloatArray(values) => Some(values.clone()),
        }
    }

    /// Equality as netCDF attribute comparison sees it.
    ///
    /// Numbers compare by value whatever their storage (`-90` equals `-90.0`),
    /// text compares exactly, and text never equals a number.
    pub fn matches(&self, other: &AttrValue) -> bool {
        match (self, other) {
            (AttrValue::Text(a), AttrValue::Text(b)) => a == b,
            (AttrValue::Text(_), _) | (_, AttrValue::Text(_)) => false,
            _ => self.numbers() == other.numbers(),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(s) => write!(f, "{}", s),
            AttrValue::Integer(v) => write!(f, "{}", v),
            AttrValue::Float(v) => write!(f, "{}", v),
            AttrValue::IntArray(values) => write!(f, "{:?}", values),
            AttrValue::FloatArray(values) => write!(f, "{:?}", values),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Integer(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

/// A typed attribute: the declared netCDF type plus its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AttributeRepr")]
pub struct Attribute {
    #[serde(rename = "type")]
    pub nc_type: NcType,
    pub value: AttrValue,
}

#[derive(Deserialize)]
struct AttributeRepr {
    #[serde(rename = "type")]
    nc_type: NcType,
    value: AttrValue,
}

impl From<AttributeRepr> for Attribute {
    fn from(repr: AttributeRepr) -> Self {
        Attribute::new(repr.nc_type, repr.value)
    }
}

impl Attribute {
    /// Create an attribute, storing whole numbers of a floating type as floats.
    pub fn new(nc_type: NcType, value: AttrValue) -> Self {
        let value = match (nc_type.is_floating(), value) {
            (true, AttrValue::Integer(v)) => AttrValue::Float(v as f64),
            (true, AttrValue::IntArray(values)) => {
                AttrValue::FloatArray(values.into_iter().map(|v| v as f64).collect())
            }
            (_, value) => value,
        };
        Self { nc_type, value }
    }

    /// NC_CHAR text attribute.
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NcType::Char, AttrValue::Text(value.into()))
    }

    /// NC_DOUBLE scalar.
    pub fn double(value: f64) -> Self {
        Self::new(NcType::Double, AttrValue::Float(value))
    }

    /// NC_FLOAT scalar.
    pub fn float(value: f32) -> Self {
        Self::new(NcType::Float, AttrValue::Float(f64::from(value)))
    }

    /// NC_INT scalar.
    pub fn int(value: i32) -> Self {
        Self::new(NcType::Int, AttrValue::Integer(i64::from(value)))
    }

    /// NC_BYTE scalar.
    pub fn byte(value: i8) -> Self {
        Self::new(NcType::Byte, AttrValue::Integer(i64::from(value)))
    }

    /// NC_BYTE sequence, as used by `flag_values`.
    pub fn bytes(values: Vec<i8>) -> Self {
        Self::new(
            NcType::Byte,
            AttrValue::IntArray(values.into_iter().map(i64::from).collect()),
        )
    }

    /// Text content, if the attribute is textual.
    pub fn as_text(&self) -> Option<&str> {
        self.value.as_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_match_ignores_storage() {
        assert!(AttrValue::Integer(-90).matches(&AttrValue::Float(-90.0)));
        assert!(AttrValue::FloatArray(vec![5.0]).matches(&AttrValue::Integer(5)));
        assert!(!AttrValue::Float(-90.0).matches(&AttrValue::Float(-91.0)));
    }

    #[test]
    fn test_text_never_matches_number() {
        assert!(!AttrValue::from("5").matches(&AttrValue::Integer(5)));
        assert!(!AttrValue::Integer(5).matches(&AttrValue::from("5")));
        assert!(AttrValue::from("5").matches(&AttrValue::from("5")));
    }

    #[test]
    fn test_floating_attribute_normalizes_integers() {
        let attr = Attribute::new(NcType::Double, AttrValue::Integer(90));
        assert_eq!(attr.value, AttrValue::Float(90.0));

        let attr = Attribute::new(NcType::Int, AttrValue::Integer(90));
        assert_eq!(attr.value, AttrValue::Integer(90));
    }

    #[test]
    fn test_attribute_json_shape() {
        let attr: Attribute = serde_json::from_str(r#"{"type": "double", "value": -90}"#).unwrap();
        assert_eq!(attr.nc_type, NcType::Double);
        assert_eq!(attr.value, AttrValue::Float(-90.0));

        let attr: Attribute =
            serde_json::from_str(r#"{"type": "char", "value": "latitude"}"#).unwrap();
        assert_eq!(attr.as_text(), Some("latitude"));
    }

    #[test]
    fn test_type_predicates() {
        assert!(NcType::Float.is_floating());
        assert!(NcType::Short.is_numeric());
        assert!(!NcType::Char.is_numeric());
        assert!(NcType::String.is_text());
        assert_eq!(NcType::Double.to_string(), "NC_DOUBLE");
    }
}
