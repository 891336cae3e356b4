// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record persistence and readback.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use intake_core::types::format_timestamp;
use intake_core::{IntakeError, NormalizedRecord, RecordId, StoredRecord};
use rusqlite::types::{Type, Value};
use rusqlite::{params, OptionalExtension};

use crate::database::{map_tr_err, Database};
use crate::models::{decode_field, encode_field};

/// Insert a record and all of its fields in one transaction.
///
/// Either the whole record is visible afterwards or none of it is.
pub async fn insert_record(db: &Database, stored: &StoredRecord) -> Result<(), IntakeError> {
    let id = stored.id.as_str().to_string();
    let collection = stored.collection.clone();
    let form_type = stored.record.form_type().to_string();
    let stored_at = format_timestamp(&stored.stored_at);
    let fields: Vec<(String, String, Value)> = stored
        .record
        .fields()
        .iter()
        .map(|(name, value)| {
            let (kind, sql) = encode_field(value);
            (name.clone(), kind, sql)
        })
        .collect();

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO records (id, collection, form_type, stored_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![id, collection, form_type, stored_at],
            )?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO record_fields (record_id, position, name, kind, value)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;
                for (position, (name, kind, value)) in fields.iter().enumerate() {
                    stmt.execute(params![id, position as i64, name, kind, value])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

struct RecordRow {
    id: String,
    form_type: String,
    stored_at: String,
}

fn parse_stored_at(raw: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))
}

fn load_fields(
    conn: &rusqlite::Connection,
    record_id: &str,
) -> Result<Vec<(String, intake_core::FieldValue)>, rusqlite::Error> {
    let mut stmt = conn.prepare_cached(
        "SELECT name, kind, value FROM record_fields
         WHERE record_id = ?1 ORDER BY position ASC",
    )?;
    let rows = stmt.query_map(params![record_id], |row| {
        let name: String = row.get(0)?;
        let kind: String = row.get(1)?;
        let value: Value = row.get(2)?;
        Ok((name, decode_field(&kind, value, 2)?))
    })?;
    rows.collect()
}

fn assemble(
    conn: &rusqlite::Connection,
    collection: &str,
    row: RecordRow,
) -> Result<StoredRecord, rusqlite::Error> {
    let fields = load_fields(conn, &row.id)?;
    Ok(StoredRecord {
        id: RecordId(row.id),
        collection: collection.to_string(),
        stored_at: parse_stored_at(&row.stored_at)?,
        record: NormalizedRecord::from_fields(row.form_type, fields),
    })
}

/// Get a record from a collection by ID.
pub async fn get_record(
    db: &Database,
    collection: &str,
    id: &RecordId,
) -> Result<Option<StoredRecord>, IntakeError> {
    let collection = collection.to_string();
    let id = id.as_str().to_string();
    db.connection()
        .call(move |conn| {
            let row = conn
                .query_row(
                    "SELECT id, form_type, stored_at FROM records
                     WHERE collection = ?1 AND id = ?2",
                    params![collection, id],
                    |row| {
                        Ok(RecordRow {
                            id: row.get(0)?,
                            form_type: row.get(1)?,
                            stored_at: row.get(2)?,
                        })
                    },
                )
                .optional()?;
            row.map(|row| assemble(conn, &collection, row)).transpose()
        })
        .await
        .map_err(map_tr_err)
}

/// List every record of a collection in insertion order.
pub async fn list_records(
    db: &Database,
    collection: &str,
) -> Result<Vec<StoredRecord>, IntakeError> {
    let collection = collection.to_string();
    db.connection()
        .call(move |conn| {
            let rows: Vec<RecordRow> = {
                let mut stmt = conn.prepare(
                    "SELECT id, form_type, stored_at FROM records
                     WHERE collection = ?1 ORDER BY rowid ASC",
                )?;
                let rows = stmt.query_map(params![collection], |row| {
                    Ok(RecordRow {
                        id: row.get(0)?,
                        form_type: row.get(1)?,
                        stored_at: row.get(2)?,
                    })
                })?;
                rows.collect::<Result<_, _>>()?
            };
            rows.into_iter()
                .map(|row| assemble(conn, &collection, row))
                .collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Count the records in a collection.
pub async fn count_records(db: &Database, collection: &str) -> Result<u64, IntakeError> {
    let collection = collection.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM records WHERE collection = ?1",
                params![collection],
                |row| row.get::<_, i64>(0),
            )
        })
        .await
        .map(|n| n as u64)
        .map_err(map_tr_err)
}

/// Record counts for every non-empty collection.
pub async fn collection_counts(db: &Database) -> Result<HashMap<String, u64>, IntakeError> {
    db.connection()
        .call(|conn| {
            let mut stmt =
                conn.prepare("SELECT collection, COUNT(*) FROM records GROUP BY collection")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
