// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field-level constraints and the validators that enforce them.
//!
//! Each [`Constraint`] takes the raw JSON value found in a payload (or its
//! absence) and yields either a normalized [`FieldValue`] or a violation
//! reason. JSON `null` is treated the same as an absent key.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use intake_core::types::DATE_FORMAT;
use intake_core::FieldValue;
use serde_json::Value;

/// Reason reported when a required field is absent, null, or empty.
pub const REASON_REQUIRED: &str = "is required";
/// Reason reported when a value cannot be converted to text.
pub const REASON_NOT_TEXT: &str = "must be text";
/// Reason reported when a value is not a finite real number.
pub const REASON_NOT_NUMBER: &str = "must be a number";
/// Reason reported when a value does not denote a real calendar date.
pub const REASON_NOT_DATE: &str = "must be a valid date";

/// Naive date-time layouts accepted in addition to `YYYY-MM-DD` and RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// A declared rule for one schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Non-empty text. With `trim`, surrounding whitespace is stripped first
    /// and the trimmed value is stored.
    RequiredText { trim: bool },
    /// A finite real number, given as a JSON number or numeric string.
    RequiredNumber,
    /// Exactly one of the literal set (case-sensitive, no normalization).
    Enumerated { allowed: &'static [&'static str] },
    /// Like `Enumerated`, but absence yields null.
    OptionalEnumerated { allowed: &'static [&'static str] },
    /// A real calendar date.
    RequiredDate,
    /// Free text; absence yields `default`.
    OptionalText { default: &'static str, trim: bool },
    /// Assigned from the submission time; any submitted value is ignored.
    SystemTimestamp,
}

impl Constraint {
    /// Short human-readable description, used by `intake forms`.
    pub fn describe(&self) -> String {
        match self {
            Constraint::RequiredText { trim: false } => "text, required".to_string(),
            Constraint::RequiredText { trim: true } => "text, required, trimmed".to_string(),
            Constraint::RequiredNumber => "number, required".to_string(),
            Constraint::Enumerated { allowed } => {
                format!("one of [{}], required", allowed.join(", "))
            }
            Constraint::OptionalEnumerated { allowed } => {
                format!("one of [{}], optional", allowed.join(", "))
            }
            Constraint::RequiredDate => "date, required".to_string(),
            Constraint::OptionalText { default, trim } => {
                let mut desc = format!("text, optional (default {default:?})");
                if *trim {
                    desc.push_str(", trimmed");
                }
                desc
            }
            Constraint::SystemTimestamp => "timestamp, system-assigned".to_string(),
        }
    }

    /// Whether a submission must supply this field.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Constraint::RequiredText { .. }
                | Constraint::RequiredNumber
                | Constraint::Enumerated { .. }
                | Constraint::RequiredDate
        )
    }

    /// Check a raw payload value against this constraint.
    pub fn check(
        &self,
        raw: Option<&Value>,
        received_at: DateTime<Utc>,
    ) -> Result<FieldValue, String> {
        let raw = raw.filter(|v| !v.is_null());

        match *self {
            Constraint::RequiredText { trim } => {
                let value = raw.ok_or(REASON_REQUIRED)?;
                let text = scalar_text(value).ok_or(REASON_NOT_TEXT)?;
                let text = if trim { text.trim().to_string() } else { text };
                if text.is_empty() {
                    return Err(REASON_REQUIRED.to_string());
                }
                Ok(FieldValue::Text(text))
            }
            Constraint::RequiredNumber => {
                let value = raw.ok_or(REASON_REQUIRED)?;
                parse_number(value).map(FieldValue::Number)
            }
            Constraint::Enumerated { allowed } => {
                let value = raw.ok_or(REASON_REQUIRED)?;
                check_enum(value, allowed).map(FieldValue::Text)
            }
            Constraint::OptionalEnumerated { allowed } => match raw {
                None => Ok(FieldValue::Null),
                Some(value) => check_enum(value, allowed).map(FieldValue::Text),
            },
            Constraint::RequiredDate => {
                let value = raw.ok_or(REASON_REQUIRED)?;
                match value {
                    Value::String(s) if s.trim().is_empty() => Err(REASON_REQUIRED.to_string()),
                    Value::String(s) => parse_date(s)
                        .map(FieldValue::Date)
                        .ok_or_else(|| REASON_NOT_DATE.to_string()),
                    _ => Err(REASON_NOT_DATE.to_string()),
                }
            }
            Constraint::OptionalText { default, trim } => match raw {
                None => Ok(FieldValue::Text(default.to_string())),
                Some(value) => {
                    let text = scalar_text(value).ok_or(REASON_NOT_TEXT)?;
                    let text = if trim { text.trim().to_string() } else { text };
                    Ok(FieldValue::Text(text))
                }
            },
            Constraint::SystemTimestamp => Ok(FieldValue::Timestamp(received_at)),
        }
    }
}

/// Convert a scalar JSON value to text. Arrays and objects are not convertible.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_number(value: &Value) -> Result<f64, String> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(REASON_REQUIRED.to_string());
            }
            s.parse::<f64>().ok()
        }
        _ => None,
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| REASON_NOT_NUMBER.to_string())
}

fn check_enum(value: &Value, allowed: &[&str]) -> Result<String, String> {
    match scalar_text(value) {
        Some(text) if allowed.contains(&text.as_str()) => Ok(text),
        _ => Err(format!("must be one of: {}", allowed.join(", "))),
    }
}

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 date-times (normalized to their UTC date),
/// and naive date-times (taken as UTC). Impossible dates such as `2024-02-30`
/// are rejected.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
}
