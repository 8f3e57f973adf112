//! Check primitives, results and the engine that runs rule suites.

mod engine;
mod primitives;
mod report;
mod result;

pub use engine::{Rule, RuleOutcome, ValidationEngine, Validator};
pub(crate) use engine::{evaluate, run_rules};
pub use primitives::{
    Address, Check, DATE_FORMAT, ExpectedType, Operator, is_monotonic, is_valid_email,
};
pub use report::{Report, ReportSummary, RuleReport};
pub use result::{CheckResult, Priority};
