// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the intake pipeline.

use std::fmt;

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use strum::{Display, EnumString};

/// Calendar date format used for normalized date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// System-assigned identifier of a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Generate a fresh UUID v4 identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is not operational.
    Unhealthy(String),
}

/// The kind of a normalized field value, as recorded by storage backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Timestamp,
    Null,
}

/// A field value after validation and coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// Always finite.
    Number(f64),
    Date(NaiveDate),
    /// Millisecond precision, UTC.
    Timestamp(DateTime<Utc>),
    /// An optional field that was not supplied and has no default.
    Null,
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Date(_) => FieldKind::Date,
            FieldValue::Timestamp(_) => FieldKind::Timestamp,
            FieldValue::Null => FieldKind::Null,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Render the value as plain JSON (dates as `YYYY-MM-DD`, timestamps as RFC 3339).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Text(s) => serde_json::Value::String(s.clone()),
            FieldValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Date(d) => serde_json::Value::String(d.format(DATE_FORMAT).to_string()),
            FieldValue::Timestamp(ts) => serde_json::Value::String(format_timestamp(ts)),
            FieldValue::Null => serde_json::Value::Null,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Date(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
            FieldValue::Timestamp(ts) => serializer.serialize_str(&format_timestamp(ts)),
            FieldValue::Null => serializer.serialize_none(),
        }
    }
}

/// Format a timestamp the way it is stored and returned: RFC 3339, milliseconds, `Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time truncated to the millisecond precision timestamps are stored with.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// A submission that passed validation: exactly the schema's fields, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    form_type: String,
    fields: Vec<(String, FieldValue)>,
}

impl NormalizedRecord {
    pub fn new(form_type: impl Into<String>) -> Self {
        Self {
            form_type: form_type.into(),
            fields: Vec::new(),
        }
    }

    pub fn from_fields(form_type: impl Into<String>, fields: Vec<(String, FieldValue)>) -> Self {
        Self {
            form_type: form_type.into(),
            fields,
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.push((name.into(), value));
    }

    /// Identifier of the form type this record was validated against.
    pub fn form_type(&self) -> &str {
        &self.form_type
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the fields as a JSON object.
    pub fn to_json(&self) -> serde_json::Map<String, serde_json::Value> {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect()
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A record accepted by a persistence backend.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: RecordId,
    /// Collection the record was appended to.
    pub collection: String,
    pub stored_at: DateTime<Utc>,
    pub record: NormalizedRecord,
}

impl StoredRecord {
    /// Assign a fresh identifier and persistence timestamp to a record.
    pub fn assign(collection: impl Into<String>, record: NormalizedRecord) -> Self {
        Self {
            id: RecordId::generate(),
            collection: collection.into(),
            stored_at: now_millis(),
            record,
        }
    }
}

/// Serializes as `{id, collection, form_type, stored_at, <fields...>}`.
impl Serialize for StoredRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.record.len() + 4))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("collection", &self.collection)?;
        map.serialize_entry("form_type", self.record.form_type())?;
        map.serialize_entry("stored_at", &format_timestamp(&self.stored_at))?;
        for (name, value) in self.record.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub reason: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_record() -> NormalizedRecord {
        let mut record = NormalizedRecord::new("sales");
        record.push("company_name", FieldValue::Text("Acme".into()));
        record.push("transaction_amount", FieldValue::Number(1250.5));
        record.push(
            "date_of_transaction",
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
        );
        record
    }

    #[test]
    fn field_kind_display_and_parse() {
        for kind in [
            FieldKind::Text,
            FieldKind::Number,
            FieldKind::Date,
            FieldKind::Timestamp,
            FieldKind::Null,
        ] {
            let s = kind.to_string();
            assert_eq!(FieldKind::from_str(&s).unwrap(), kind);
        }
        assert_eq!(FieldKind::Timestamp.to_string(), "timestamp");
    }

    #[test]
    fn field_value_serializes_as_plain_json() {
        let date = FieldValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2024-03-01\"");
        assert_eq!(serde_json::to_string(&FieldValue::Null).unwrap(), "null");
        assert_eq!(
            serde_json::to_string(&FieldValue::Number(12.5)).unwrap(),
            "12.5"
        );
        assert_eq!(date.to_json(), serde_json::json!("2024-03-01"));
    }

    #[test]
    fn normalized_record_preserves_field_order() {
        let record = sample_record();
        let names: Vec<&str> = record.field_names().collect();
        assert_eq!(
            names,
            vec!["company_name", "transaction_amount", "date_of_transaction"]
        );
        assert_eq!(record.get("company_name").and_then(FieldValue::as_text), Some("Acme"));
        assert!(record.get("missing").is_none());
    }

    #[test]
    fn stored_record_flattens_fields() {
        let stored = StoredRecord::assign("form.sales", sample_record());
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["id"], serde_json::json!(stored.id.as_str()));
        assert_eq!(json["collection"], "form.sales");
        assert_eq!(json["form_type"], "sales");
        assert_eq!(json["company_name"], "Acme");
        assert_eq!(json["date_of_transaction"], "2024-03-01");
        assert!(json["stored_at"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn assigned_ids_are_distinct() {
        let a = StoredRecord::assign("form.sales", sample_record());
        let b = StoredRecord::assign("form.sales", sample_record());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn timestamps_have_millisecond_precision() {
        let ts = now_millis();
        assert_eq!(ts.timestamp_subsec_nanos() % 1_000_000, 0);
        let formatted = format_timestamp(&ts);
        let parsed = DateTime::parse_from_rfc3339(&formatted)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parsed, ts);
    }

    #[test]
    fn violation_display() {
        let v = Violation::new("urgency", "must be one of: 1 day, 1 week, 1 month");
        assert_eq!(v.to_string(), "urgency: must be one of: 1 day, 1 week, 1 month");
    }
}
