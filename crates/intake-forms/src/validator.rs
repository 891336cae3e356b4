// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submission validation: raw JSON payload in, normalized record out.

use chrono::{DateTime, Utc};
use intake_core::types::now_millis;
use intake_core::{NormalizedRecord, Violation};
use serde_json::Value;
use thiserror::Error;

use crate::schema::FormSchema;

/// Why a payload was not accepted by its schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The payload is not a key/value object at all.
    #[error("payload must be a JSON object, got {found}")]
    MalformedPayload { found: &'static str },

    /// One or more fields broke their rules. Never empty.
    #[error("validation failed: {}", join_violations(.0))]
    Violations(Vec<Violation>),
}

pub(crate) fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate a payload against a schema using the current time for system fields.
pub fn validate(schema: &FormSchema, payload: &Value) -> Result<NormalizedRecord, ValidationError> {
    validate_at(schema, payload, now_millis())
}

/// Validate a payload against a schema.
///
/// Every declared field is checked and every violation collected. Keys the
/// schema does not declare are dropped.
pub fn validate_at(
    schema: &FormSchema,
    payload: &Value,
    received_at: DateTime<Utc>,
) -> Result<NormalizedRecord, ValidationError> {
    let object = payload
        .as_object()
        .ok_or_else(|| ValidationError::MalformedPayload {
            found: json_type_name(payload),
        })?;

    let mut record = NormalizedRecord::new(schema.form_type);
    let mut violations = Vec::new();

    for spec in schema.fields {
        match spec.constraint.check(object.get(spec.name), received_at) {
            Ok(value) => record.push(spec.name, value),
            Err(reason) => violations.push(Violation::new(spec.name, reason)),
        }
    }

    if violations.is_empty() {
        Ok(record)
    } else {
        Err(ValidationError::Violations(violations))
    }
}
