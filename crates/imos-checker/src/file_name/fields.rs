//! One rule per part of the file name. Fields the name does not have are
//! not checked.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::validation::{CheckResult, DATE_FORMAT, Priority, RuleOutcome};

use super::{EXTENSION, FIELD_COUNT, FileNameContext};

/// Characters allowed in the data code field.
pub const DATA_CODES: &str = "ABCEFGIKMOPRSTUVWZ";

/// Accepted file versions.
pub const FILE_VERSIONS: &[&str] = &["FV00", "FV01", "FV02"];

/// Compact timestamp used inside the name.
const COMPACT_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

static FACILITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]+(-[A-Z0-9]+)?$").unwrap());
static PLATFORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9-]+$").unwrap());
static PRODUCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9-]*$").unwrap());
static PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"^PART\d+$").unwrap());

fn is_timestamp(text: &str) -> bool {
    [COMPACT_DATE_FORMAT, DATE_FORMAT]
        .iter()
        .any(|layout| NaiveDateTime::parse_from_str(text, layout).is_ok())
}

fn is_compact_timestamp(text: &str) -> bool {
    NaiveDateTime::parse_from_str(text, COMPACT_DATE_FORMAT).is_ok()
}

fn field_result(field: &str, value: &str, passed: bool, reason: &str) -> CheckResult {
    let kind = format!("check_file_name_{}", field);
    CheckResult::verdict(
        &["file_name", field, kind.as_str()],
        passed,
        format!("{} '{}' {}", field, value, reason),
    )
}

/// Check field `n` with `predicate`, or nothing when the name is shorter.
fn check_field(
    ctx: &FileNameContext<'_>,
    n: usize,
    predicate: impl Fn(&str) -> bool,
    reason: &str,
) -> RuleOutcome {
    let field = format!("field{}", n);
    Ok(ctx
        .file_name
        .field(n)
        .map(|value| field_result(&field, value, predicate(value), reason))
        .into_iter()
        .collect())
}

/// The extension is `nc`.
pub fn check_extension_name(ctx: &FileNameContext<'_>) -> RuleOutcome {
    let extension = &ctx.file_name.extension;
    Ok(vec![CheckResult::verdict(
        &["file_name", "extension", "check_extension_name"],
        extension == EXTENSION,
        format!("File extension '{}' is not '{}'", extension, EXTENSION),
    )])
}

/// The name has 6 to 10 underscore-separated fields.
pub fn check_file_name(ctx: &FileNameContext<'_>) -> RuleOutcome {
    let count = ctx.file_name.fields.len();
    Ok(vec![CheckResult::verdict(
        &["file_name", "fields", "check_file_name"],
        FIELD_COUNT.contains(&count),
        format!(
            "File name has {} fields, expected {} to {}",
            count,
            FIELD_COUNT.start(),
            FIELD_COUNT.end()
        ),
    )])
}

/// Field 1 is `IMOS`.
pub fn check_file_name_field1(ctx: &FileNameContext<'_>) -> RuleOutcome {
    check_field(ctx, 1, |value| value == "IMOS", "is not IMOS")
}

/// Field 2 is a facility code.
pub fn check_file_name_field2(ctx: &FileNameContext<'_>) -> RuleOutcome {
    check_field(ctx, 2, |value| FACILITY.is_match(value), "is not a facility code")
}

/// Field 3 uses only [`DATA_CODES`].
pub fn check_file_name_field3(ctx: &FileNameContext<'_>) -> RuleOutcome {
    check_field(
        ctx,
        3,
        |value| !value.is_empty() && value.chars().all(|c| DATA_CODES.contains(c)),
        "contains characters outside the data codes",
    )
}

/// Field 4 is the start date.
pub fn check_file_name_field4(ctx: &FileNameContext<'_>) -> RuleOutcome {
    check_field(ctx, 4, is_timestamp, "is not a start date")
}

/// Field 5 is a platform code.
pub fn check_file_name_field5(ctx: &FileNameContext<'_>) -> RuleOutcome {
    check_field(ctx, 5, |value| PLATFORM.is_match(value), "is not a platform code")
}

/// The version field agrees with the `file_version` attribute.
///
/// Only checked when `file_version` has at least two tokens split on
/// single spaces; the last character of the field must equal the second token,
/// so `"Level 1 - Quality Controlled data"` expects `FV01`.
pub fn check_file_name_field6(ctx: &FileNameContext<'_>) -> RuleOutcome {
    let Some(field6) = ctx.file_name.field(6) else {
        return Ok(Vec::new());
    };
    let Some(file_version) = ctx
        .dataset
        .global_attribute("file_version")
        .and_then(|attr| attr.as_text())
    else {
        return Ok(Vec::new());
    };
    // single spaces only: "Level  1" has an empty second token
    let Some(level) = file_version.split(' ').nth(1) else {
        return Ok(Vec::new());
    };

    let mut reasons = Vec::new();
    if field6.chars().count() != 4 {
        reasons.push(format!("field6 '{}' is not 4 characters", field6));
    }
    if !FILE_VERSIONS.contains(&field6) {
        reasons.push(format!("field6 '{}' is not one of {}", field6, FILE_VERSIONS.join(", ")));
    }
    let last = field6.chars().last().map(String::from).unwrap_or_default();
    if last != level {
        reasons.push(format!(
            "field6 '{}' does not match file_version '{}'",
            field6, file_version
        ));
    }

    let mut result = CheckResult::new(
        Priority::High,
        reasons.is_empty(),
        &["file_name", "field6", "check_file_name_field6"],
    );
    result.reasons = reasons;
    Ok(vec![result])
}

fn is_optional_field(value: &str) -> bool {
    if let Some(date) = value.strip_prefix("END-") {
        return is_compact_timestamp(date);
    }
    if let Some(date) = value.strip_prefix("C-") {
        return is_compact_timestamp(date);
    }
    PART.is_match(value) || PRODUCT.is_match(value)
}

/// Each of fields 7 to 10 is a product code, `END-<date>`, `C-<date>` or
/// `PART<n>`.
pub fn check_file_name_field7_to_field10(ctx: &FileNameContext<'_>) -> RuleOutcome {
    let mut results = Vec::new();
    for n in 7..=10 {
        results.extend(check_field(
            ctx,
            n,
            is_optional_field,
            "is not a product code, end date, creation date or part number",
        )?);
    }
    Ok(results)
}
