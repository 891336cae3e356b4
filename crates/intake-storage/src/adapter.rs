// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use intake_config::model::StorageConfig;
use intake_core::{
    HealthStatus, IntakeError, NormalizedRecord, PluginAdapter, RecordId, StorageAdapter,
    StoredRecord,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates to the query modules. The
/// database is opened by [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// The database is not opened until [`initialize`](StorageAdapter::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, IntakeError> {
        self.db.get().ok_or_else(|| {
            IntakeError::storage("storage not initialized -- call initialize() first")
        })
    }

    /// Record counts for every non-empty collection.
    pub async fn collection_counts(&self) -> Result<HashMap<String, u64>, IntakeError> {
        queries::records::collection_counts(self.db()?).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn health_check(&self) -> Result<HealthStatus, IntakeError> {
        let Some(db) = self.db.get() else {
            return Ok(HealthStatus::Unhealthy("storage not initialized".into()));
        };
        let ping = db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await;
        Ok(match ping {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), IntakeError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| IntakeError::storage("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), IntakeError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn persist(
        &self,
        collection: &str,
        record: NormalizedRecord,
    ) -> Result<StoredRecord, IntakeError> {
        let stored = StoredRecord::assign(collection, record);
        queries::records::insert_record(self.db()?, &stored).await?;
        Ok(stored)
    }

    async fn get_record(
        &self,
        collection: &str,
        id: &RecordId,
    ) -> Result<Option<StoredRecord>, IntakeError> {
        queries::records::get_record(self.db()?, collection, id).await
    }

    async fn list_records(&self, collection: &str) -> Result<Vec<StoredRecord>, IntakeError> {
        queries::records::list_records(self.db()?, collection).await
    }

    async fn count_records(&self, collection: &str) -> Result<u64, IntakeError> {
        queries::records::count_records(self.db()?, collection).await
    }
}
