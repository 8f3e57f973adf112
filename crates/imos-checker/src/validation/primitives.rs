//! Presence, value and type checks shared by every rule.
//!
//! All three address an entity the same way: a global attribute, a
//! variable, or an attribute of a variable. A [`Check`] carries the address
//! plus how to report, and each primitive returns at most one
//! [`CheckResult`]; `None` means the check was skipped.

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::cf::CfHelper;
use crate::dataset::{AttrValue, Dataset, NcType, Variable};
use crate::error::DatasetError;

use super::result::{CheckResult, Priority};

/// Timestamp layout required for date attributes.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.+@(\[?)[a-zA-Z0-9\-.]+\.([a-zA-Z]{2,3}|[0-9]{1,3})(\]?)$")
        .unwrap()
});

/// Syntactic email check. Deliberately permissive.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Whether consecutive differences are all `>= 0` or all `<= 0`.
///
/// Fill values are not masked and any NaN breaks monotonicity. Arrays with
/// fewer than two values are monotonic.
pub fn is_monotonic(values: &[f64]) -> bool {
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    diffs.iter().all(|d| *d <= 0.0) || diffs.iter().all(|d| *d >= 0.0)
}

/// Smallest value; NaN if any value is NaN.
fn array_min(values: &[f64]) -> Option<f64> {
    reduce(values, f64::min)
}

/// Largest value; NaN if any value is NaN.
fn array_max(values: &[f64]) -> Option<f64> {
    reduce(values, f64::max)
}

fn reduce(values: &[f64], pick: fn(f64, f64) -> f64) -> Option<f64> {
    let (first, rest) = values.split_first()?;
    if values.iter().any(|v| v.is_nan()) {
        return Some(f64::NAN);
    }
    Some(rest.iter().copied().fold(*first, pick))
}

/// What a check looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address<'a> {
    /// A global attribute.
    GlobalAttribute(&'a str),
    /// A variable (its data, for value checks).
    Variable(&'a str),
    /// An attribute of a variable: `(variable, attribute)`.
    VariableAttribute(&'a str, &'a str),
}

impl Address<'_> {
    fn default_name(&self) -> Vec<String> {
        let parts: Vec<&str> = match *self {
            Address::GlobalAttribute(attr) => vec!["globalattr", attr, "check_attribute_present"],
            Address::Variable(var) => vec!["var", var, "check_variable_present"],
            Address::VariableAttribute(var, attr) => {
                vec!["var", var, attr, "check_variable_attribute_present"]
            }
        };
        parts.into_iter().map(String::from).collect()
    }
}

impl fmt::Display for Address<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Address::GlobalAttribute(attr) => write!(f, ":{}", attr),
            Address::Variable(var) => write!(f, "{}", var),
            Address::VariableAttribute(var, attr) => write!(f, "{}:{}", var, attr),
        }
    }
}

/// Comparison applied by [`Check::value_check`], with its expected value.
pub enum Operator<'a> {
    /// Equal to the value; numbers compare by value, text never equals a number.
    Equal(AttrValue),
    /// The minimum of the actual values equals this number.
    Min(AttrValue),
    /// The maximum of the actual values equals this number.
    Max(AttrValue),
    /// One of these values.
    Within(Vec<AttrValue>),
    /// Text that parses with this strftime layout.
    DateFormat(&'a str),
    /// Text containing this substring.
    SubString(&'a str),
    /// Text matching this pattern.
    Matches(&'a Regex),
    /// Units convertible to these units.
    Convertible { units: &'a str, cf: &'a dyn CfHelper },
    /// A syntactically valid email address.
    Email,
}

/// Type requirement for [`Check::type_check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedType {
    /// NC_CHAR or NC_STRING holding text.
    Text,
    /// Any integer or floating-point type.
    Numeric,
    /// NC_FLOAT or NC_DOUBLE.
    Floating,
    /// Exactly this type.
    Exactly(NcType),
    /// Any of these types.
    OneOf(Vec<NcType>),
}

impl ExpectedType {
    fn accepts(&self, nc_type: NcType, value: Option<&AttrValue>) -> bool {
        let holds_text = value.map(|v| v.as_text().is_some());
        match self {
            ExpectedType::Text => nc_type.is_text() && holds_text != Some(false),
            ExpectedType::Numeric => nc_type.is_numeric() && holds_text != Some(true),
            ExpectedType::Floating => nc_type.is_floating() && holds_text != Some(true),
            ExpectedType::Exactly(expected) => nc_type == *expected,
            ExpectedType::OneOf(types) => types.contains(&nc_type),
        }
    }
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedType::Text => write!(f, "str"),
            ExpectedType::Numeric => write!(f, "numeric"),
            ExpectedType::Floating => write!(f, "floating point"),
            ExpectedType::Exactly(t) => write!(f, "{}", t),
            ExpectedType::OneOf(types) => {
                let names: Vec<String> = types.iter().map(ToString::to_string).collect();
                write!(f, "one of {}", names.join(", "))
            }
        }
    }
}

/// The resolved thing a check compares.
enum Actual<'d> {
    Attribute { nc_type: NcType, value: &'d AttrValue },
    Data(&'d Variable),
}

impl Actual<'_> {
    fn value(&self) -> Cow<'_, AttrValue> {
        match self {
            Actual::Attribute { value, .. } => Cow::Borrowed(*value),
            Actual::Data(variable) => Cow::Owned(AttrValue::FloatArray(variable.data.clone())),
        }
    }

    fn numbers(&self) -> Option<Vec<f64>> {
        match self {
            Actual::Attribute { value, .. } => value.numbers(),
            Actual::Data(variable) => Some(variable.data.clone()),
        }
    }

    fn text(&self) -> Option<&str> {
        match self {
            Actual::Attribute { value, .. } => value.as_text(),
            Actual::Data(_) => None,
        }
    }

    fn nc_type(&self) -> NcType {
        match self {
            Actual::Attribute { nc_type, .. } => *nc_type,
            Actual::Data(variable) => variable.nc_type,
        }
    }
}

/// One addressed check and how to report it. Results carry high priority.
#[derive(Debug, Clone)]
pub struct Check<'a> {
    address: Address<'a>,
    name: Option<Vec<String>>,
    reason: Option<String>,
    skip_if_absent: bool,
}

impl<'a> Check<'a> {
    /// Check a global attribute.
    pub fn global(attribute: &'a str) -> Self {
        Self::new(Address::GlobalAttribute(attribute))
    }

    /// Check a variable.
    pub fn variable(variable: &'a str) -> Self {
        Self::new(Address::Variable(variable))
    }

    /// Check an attribute of a variable.
    pub fn variable_attribute(variable: &'a str, attribute: &'a str) -> Self {
        Self::new(Address::VariableAttribute(variable, attribute))
    }

    /// Check the entity at `address`.
    pub fn new(address: Address<'a>) -> Self {
        Self {
            address,
            name: None,
            reason: None,
            skip_if_absent: false,
        }
    }

    /// Report under this hierarchical name.
    pub fn named(mut self, name: &[&str]) -> Self {
        self.name = Some(name.iter().map(|part| part.to_string()).collect());
        self
    }

    /// Replace the default failure reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Produce no result when the entity is absent.
    pub fn skip_if_absent(mut self) -> Self {
        self.skip_if_absent = true;
        self
    }

    /// Whether the addressed entity exists.
    pub fn presence_check(&self, dataset: &Dataset) -> CheckResult {
        match self.resolve(dataset) {
            Ok(_) => self.result(None),
            Err(reason) => self.result(Some(reason.to_string())),
        }
    }

    /// Compare the addressed entity with `operator`.
    ///
    /// Absent entities fail, or are skipped with [`Check::skip_if_absent`].
    /// Errors only for a min/max over a variable with no values.
    pub fn value_check(
        &self,
        dataset: &Dataset,
        operator: &Operator<'_>,
    ) -> Result<Option<CheckResult>, DatasetError> {
        let actual = match self.resolve(dataset) {
            Ok(actual) => actual,
            Err(reason) => return Ok(self.absent(reason)),
        };

        let failure = self.compare(&actual, operator)?;
        Ok(Some(self.result(failure)))
    }

    /// Compare the declared type of the addressed entity with `expected`.
    pub fn type_check(&self, dataset: &Dataset, expected: &ExpectedType) -> Option<CheckResult> {
        let actual = match self.resolve(dataset) {
            Ok(actual) => actual,
            Err(reason) => return self.absent(reason),
        };

        let value = match &actual {
            Actual::Attribute { value, .. } => Some(*value),
            Actual::Data(_) => None,
        };
        let failure = (!expected.accepts(actual.nc_type(), value))
            .then(|| format!("Attribute type is not equal to {}", expected));
        Some(self.result(failure))
    }

    fn resolve<'d>(&self, dataset: &'d Dataset) -> Result<Actual<'d>, &'static str> {
        match self.address {
            Address::GlobalAttribute(attr) => dataset
                .global_attribute(attr)
                .map(|a| Actual::Attribute { nc_type: a.nc_type, value: &a.value })
                .ok_or("Attribute is not present"),
            Address::Variable(var) => dataset
                .variable(var)
                .map(Actual::Data)
                .ok_or("Variable is not present"),
            Address::VariableAttribute(var, attr) => {
                let variable = dataset.variable(var).ok_or("Variable is not present")?;
                variable
                    .attribute(attr)
                    .map(|a| Actual::Attribute { nc_type: a.nc_type, value: &a.value })
                    .ok_or("Variable attribute is not present")
            }
        }
    }

    /// `Ok(None)` when the comparison holds, otherwise the default reason.
    fn compare(
        &self,
        actual: &Actual<'_>,
        operator: &Operator<'_>,
    ) -> Result<Option<String>, DatasetError> {
        let failure = match operator {
            Operator::Equal(expected) => (!actual.value().matches(expected))
                .then(|| format!("Attribute value is not equal to {}", expected)),
            Operator::Min(expected) => {
                return self.compare_extreme(actual, expected, array_min, "Minimum");
            }
            Operator::Max(expected) => {
                return self.compare_extreme(actual, expected, array_max, "Maximum");
            }
            Operator::Within(allowed) => {
                let value = actual.value();
                (!allowed.iter().any(|candidate| value.matches(candidate)))
                    .then(|| "Value is not in the expected range".to_string())
            }
            Operator::DateFormat(layout) => {
                let parses = actual
                    .text()
                    .is_some_and(|text| NaiveDateTime::parse_from_str(text, layout).is_ok());
                (!parses).then(|| "Datetime format is not correct".to_string())
            }
            Operator::SubString(needle) => {
                let contains = actual.text().is_some_and(|text| text.contains(needle));
                (!contains).then(|| "Required substring is not contained".to_string())
            }
            Operator::Matches(pattern) => {
                let matches = actual.text().is_some_and(|text| pattern.is_match(text));
                (!matches).then(|| "Value does not match the required text".to_string())
            }
            Operator::Convertible { units, cf } => {
                let convertible = actual
                    .text()
                    .is_some_and(|text| cf.units_convertible(text, units));
                (!convertible).then(|| "Value is not convertible".to_string())
            }
            Operator::Email => {
                let valid = actual.text().is_some_and(is_valid_email);
                (!valid).then(|| "Value is not a valid email".to_string())
            }
        };
        Ok(failure)
    }

    fn compare_extreme(
        &self,
        actual: &Actual<'_>,
        expected: &AttrValue,
        extreme: fn(&[f64]) -> Option<f64>,
        label: &str,
    ) -> Result<Option<String>, DatasetError> {
        let parsed = expected
            .as_f64()
            .or_else(|| expected.as_text().and_then(|text| text.trim().parse::<f64>().ok()));
        let Some(expected) = parsed else {
            return Ok(Some(format!("Expected value {} is not numeric", expected)));
        };
        let Some(values) = actual.numbers() else {
            return Ok(Some(format!("{} value cannot be computed from text", label)));
        };
        let found = extreme(&values).ok_or_else(|| DatasetError::EmptyData {
            variable: self.address.to_string(),
        })?;

        Ok((found != expected)
            .then(|| format!("{} value is not same as the attribute value", label)))
    }

    fn absent(&self, reason: &str) -> Option<CheckResult> {
        if self.skip_if_absent {
            None
        } else {
            Some(self.result(Some(reason.to_string())))
        }
    }

    fn result(&self, failure: Option<String>) -> CheckResult {
        let name = self.name.clone().unwrap_or_else(|| self.address.default_name());
        let mut result = CheckResult {
            priority: Priority::High,
            passed: failure.is_none(),
            name,
            reasons: Vec::new(),
        };
        if let Some(default_reason) = failure {
            result.reasons.push(self.reason.clone().unwrap_or(default_reason));
        }
        result
    }
}
