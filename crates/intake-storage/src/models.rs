// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Column encoding for normalized field values.
//!
//! Each field is stored as a `(kind, value)` pair. Numbers are stored as
//! REAL, dates as `YYYY-MM-DD` text, timestamps as RFC 3339 text with
//! millisecond precision, and null as SQL NULL.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use intake_core::types::{format_timestamp, DATE_FORMAT};
use intake_core::{FieldKind, FieldValue};
use rusqlite::types::{Type, Value};

/// Encode a field value into its stored kind tag and SQL value.
pub fn encode_field(value: &FieldValue) -> (String, Value) {
    let sql = match value {
        FieldValue::Text(s) => Value::Text(s.clone()),
        FieldValue::Number(n) => Value::Real(*n),
        FieldValue::Date(d) => Value::Text(d.format(DATE_FORMAT).to_string()),
        FieldValue::Timestamp(ts) => Value::Text(format_timestamp(ts)),
        FieldValue::Null => Value::Null,
    };
    (value.kind().to_string(), sql)
}

fn conversion_error(column: usize, ty: Type, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, ty, message.into())
}

/// Decode a stored `(kind, value)` pair. `column` is the index of the
/// value column, used in error reports.
pub fn decode_field(
    kind: &str,
    value: Value,
    column: usize,
) -> Result<FieldValue, rusqlite::Error> {
    let kind = FieldKind::from_str(kind).map_err(|_| {
        conversion_error(column, Type::Text, format!("unknown field kind `{kind}`"))
    })?;

    match (kind, value) {
        (FieldKind::Null, Value::Null) => Ok(FieldValue::Null),
        (FieldKind::Text, Value::Text(s)) => Ok(FieldValue::Text(s)),
        (FieldKind::Number, Value::Real(n)) => Ok(FieldValue::Number(n)),
        (FieldKind::Number, Value::Integer(n)) => Ok(FieldValue::Number(n as f64)),
        (FieldKind::Date, Value::Text(s)) => NaiveDate::parse_from_str(&s, DATE_FORMAT)
            .map(FieldValue::Date)
            .map_err(|e| conversion_error(column, Type::Text, format!("bad date `{s}`: {e}"))),
        (FieldKind::Timestamp, Value::Text(s)) => DateTime::parse_from_rfc3339(&s)
            .map(|ts| FieldValue::Timestamp(ts.with_timezone(&Utc)))
            .map_err(|e| conversion_error(column, Type::Text, format!("bad timestamp `{s}`: {e}"))),
        (kind, value) => Err(conversion_error(
            column,
            value.data_type(),
            format!("value does not match field kind `{kind}`"),
        )),
    }
}
