//! imos-checker: IMOS metadata conventions checker for netCDF datasets.
//!
//! The checker tests a dataset's attributes, variables and file name against
//! the IMOS netCDF conventions and reports every individual check with a
//! priority, a pass/fail flag and human-readable reasons.
//!
//! # Structure
//!
//! - [`dataset`]: the in-memory dataset a host fills from its netCDF reader
//! - [`classify`]: which variables are coordinates, flags or data
//! - [`validation`]: check primitives, results and the suite engine
//! - [`rules`]: the IMOS attribute and variable rules
//! - [`file_name`]: the IMOS file naming rules
//!
//! # Example
//!
//! ```no_run
//! use imos_checker::ImosChecker;
//!
//! let checker = ImosChecker::new();
//! let report = checker.check_file("dataset.json").unwrap();
//!
//! println!("Passed: {}", report.summary.passed);
//! println!("Failed: {}", report.summary.failed);
//! ```

pub mod cf;
pub mod classify;
pub mod dataset;
pub mod error;
pub mod file_name;
pub mod rules;
pub mod validation;

mod checker;

pub use crate::checker::{CheckerConfig, DEFAULT_CONVENTIONS, ImosChecker};
pub use cf::{CfHelper, DefaultCfHelper};
pub use classify::{ClassificationContext, Role};
pub use dataset::{AttrValue, Attribute, Dataset, DatasetBuilder, NcType, VarId, Variable};
pub use error::{DatasetError, ImosError, Result};
pub use file_name::{FileName, FileNameValidator};
pub use rules::ImosValidator;
pub use validation::{CheckResult, Priority, Report, ReportSummary, RuleReport, ValidationEngine, Validator};
