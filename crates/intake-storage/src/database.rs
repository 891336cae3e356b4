// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! The [`Database`] handle is the single writer: query modules take `&Database`
//! and go through [`Database::connection`]. Do NOT open additional
//! connections for writes.

use std::path::Path;

use intake_core::IntakeError;
use tracing::debug;

use crate::migrations::run_migrations;

/// Convert a tokio-rusqlite error into `IntakeError::Storage`.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> IntakeError {
    IntakeError::Storage {
        source: Box::new(e),
    }
}

/// An open, migrated SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run migrations.
    ///
    /// The parent directory is created if missing.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, IntakeError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| IntakeError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| IntakeError::Storage {
                source: Box::new(e),
            })?;

        let journal_mode = if wal_mode { "WAL" } else { "DELETE" };
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            conn.pragma_update_and_check(None, "journal_mode", journal_mode, |row| {
                row.get::<_, String>(0)
            })?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| run_migrations(conn))
            .await
            .map_err(|e| IntakeError::Storage {
                source: Box::new(e),
            })?;

        debug!(path, wal_mode, "database opened and migrated");
        Ok(Self { conn })
    }

    /// The underlying single-writer connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Truncate the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), IntakeError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn pragma(db: &Database, name: &'static str) -> String {
        db.connection()
            .call(move |conn| {
                conn.query_row(&format!("PRAGMA {name}"), [], |row| {
                    let value: rusqlite::types::Value = row.get(0)?;
                    Ok(match value {
                        rusqlite::types::Value::Text(s) => s,
                        rusqlite::types::Value::Integer(i) => i.to_string(),
                        other => format!("{other:?}"),
                    })
                })
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn open_creates_parent_dirs_and_file() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("intake.db");
        Database::open(db_path.to_str().unwrap(), true).await.unwrap();
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn pragmas_are_applied() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("pragmas.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();

        assert_eq!(pragma(&db, "journal_mode").await.to_lowercase(), "wal");
        assert_eq!(pragma(&db, "foreign_keys").await, "1");
        assert_eq!(pragma(&db, "busy_timeout").await, "5000");
    }

    #[tokio::test]
    async fn wal_can_be_disabled() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("rollback.db");
        let db = Database::open(db_path.to_str().unwrap(), false).await.unwrap();
        assert_eq!(pragma(&db, "journal_mode").await.to_lowercase(), "delete");
    }

    #[tokio::test]
    async fn migrations_create_record_tables() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("migrated.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();

        let tables: Vec<String> = db
            .connection()
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                rows.collect::<Result<Vec<String>, _>>()
            })
            .await
            .unwrap();
        assert!(tables.contains(&"records".to_string()));
        assert!(tables.contains(&"record_fields".to_string()));
    }

    #[tokio::test]
    async fn reopening_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");
        let path = db_path.to_str().unwrap();
        let db = Database::open(path, true).await.unwrap();
        db.checkpoint().await.unwrap();
        drop(db);
        Database::open(path, true).await.unwrap();
    }
}
