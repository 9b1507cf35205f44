//! Row validation and type coercion — pure logic, no I/O.
//!
//! [`validate_row`] turns one raw row into either a fully coerced value
//! vector (aligned with rule order) or a list of field errors. Field
//! outcomes are independent: a failing field never stops its siblings
//! from being checked, and each field contributes at most one error.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::schema::{ColumnRule, ColumnRuleSet, NumericTarget, RuleKind};

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A single validation failure tied to one row and column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    /// 1-based sheet row number; 0 marks a job-level failure.
    pub row: u32,
    /// Column header label, or empty for job-level failures.
    pub column: String,
    pub message: String,
}

/// A typed, coerced cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Optional field left blank; no coercion was attempted.
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
}

/// Outcome of validating one raw row: a complete value vector or a
/// non-empty error list, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// One value per rule, in rule-set order.
    Valid(Vec<CellValue>),
    Invalid(Vec<FieldError>),
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a raw row against the rule set.
///
/// `cells` is indexed by 0-based column (`cells[rule.column - 1]`);
/// missing trailing cells read as empty. `row` is the 1-based sheet row
/// used in error reporting.
pub fn validate_row(rules: &ColumnRuleSet, cells: &[String], row: u32) -> RowOutcome {
    let mut values = Vec::with_capacity(rules.rules().len());
    let mut errors = Vec::new();

    for rule in rules.rules() {
        let raw = cells
            .get(rule.column as usize - 1)
            .map(|s| s.trim())
            .unwrap_or("");

        match validate_field(rule, raw, row) {
            Ok(value) => values.push(value),
            Err(error) => errors.push(error),
        }
    }

    if errors.is_empty() {
        RowOutcome::Valid(values)
    } else {
        RowOutcome::Invalid(errors)
    }
}

fn validate_field(rule: &ColumnRule, raw: &str, row: u32) -> Result<CellValue, FieldError> {
    if raw.is_empty() {
        if rule.required {
            return Err(field_error(rule, row, || format!("{} is required.", rule.header)));
        }
        // Blank optional fields skip coercion entirely.
        return Ok(match rule.kind {
            RuleKind::Text => CellValue::Text(String::new()),
            _ => CellValue::Empty,
        });
    }

    if let RuleKind::Enumeration { allowed } = &rule.kind {
        if !allowed.iter().any(|v| v.eq_ignore_ascii_case(raw)) {
            return Err(field_error(rule, row, || {
                format!("{} must be one of: {}.", rule.header, allowed.join(", "))
            }));
        }
    }

    match &rule.kind {
        RuleKind::Number { min, max, target } => coerce_number(rule, raw, row, *min, *max, *target),
        RuleKind::Boolean { true_tokens, false_tokens } => {
            coerce_boolean(rule, raw, row, true_tokens, false_tokens)
        }
        RuleKind::Date { format, format_name, min_year, max_year } => {
            coerce_date(rule, raw, row, format, format_name, *min_year, *max_year)
        }
        RuleKind::Text | RuleKind::Enumeration { .. } => Ok(CellValue::Text(raw.to_string())),
    }
}

/// Build a field error, preferring the rule's custom message.
fn field_error(rule: &ColumnRule, row: u32, default: impl FnOnce() -> String) -> FieldError {
    FieldError {
        row,
        column: rule.header.clone(),
        message: rule.message.clone().unwrap_or_else(default),
    }
}

fn coerce_number(
    rule: &ColumnRule,
    raw: &str,
    row: u32,
    min: Option<f64>,
    max: Option<f64>,
    target: NumericTarget,
) -> Result<CellValue, FieldError> {
    let number: f64 = match raw.parse() {
        Ok(n) => n,
        Err(_) => {
            return Err(field_error(rule, row, || {
                format!("{} must be a numeric value.", rule.header)
            }));
        }
    };

    if min.is_some_and(|m| number < m) || max.is_some_and(|m| number > m) {
        return Err(field_error(rule, row, || {
            format!(
                "{} must be between {} and {}.",
                rule.header,
                min.map(|v| v.to_string()).unwrap_or_default(),
                max.map(|v| v.to_string()).unwrap_or_default(),
            )
        }));
    }

    Ok(match target {
        NumericTarget::Integer => CellValue::Int((number as i32).into()),
        NumericTarget::Long => CellValue::Int(number as i64),
        NumericTarget::Float => CellValue::Float(number),
    })
}

fn coerce_boolean(
    rule: &ColumnRule,
    raw: &str,
    row: u32,
    true_tokens: &[String],
    false_tokens: &[String],
) -> Result<CellValue, FieldError> {
    let normalized = raw.to_lowercase();

    if true_tokens.iter().any(|t| t.eq_ignore_ascii_case(&normalized)) {
        Ok(CellValue::Bool(true))
    } else if false_tokens.iter().any(|t| t.eq_ignore_ascii_case(&normalized)) {
        Ok(CellValue::Bool(false))
    } else {
        Err(field_error(rule, row, || {
            format!("{} must be a valid boolean value.", rule.header)
        }))
    }
}

fn coerce_date(
    rule: &ColumnRule,
    raw: &str,
    row: u32,
    format: &str,
    format_name: &str,
    min_year: i32,
    max_year: i32,
) -> Result<CellValue, FieldError> {
    // Exact format only, no fallback formats.
    let date = match NaiveDate::parse_from_str(raw, format) {
        Ok(d) => d,
        Err(_) => {
            return Err(field_error(rule, row, || {
                format!("{} must be a valid date in format {}.", rule.header, format_name)
            }));
        }
    };

    let year = date.year();
    if (min_year > 0 && year < min_year) || (max_year > 0 && year > max_year) {
        return Err(field_error(rule, row, || {
            format!("{} must be between years {min_year} and {max_year}.", rule.header)
        }));
    }

    Ok(CellValue::Date(date))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
