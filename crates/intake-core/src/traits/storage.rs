// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence gateway trait for storage backends (SQLite, in-memory).

use async_trait::async_trait;

use crate::error::IntakeError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{NormalizedRecord, RecordId, StoredRecord};

/// Adapter for durable record storage.
///
/// Implementations trust that records are already normalized; they perform
/// no validation. Every `persist` call is an independent append that assigns
/// a fresh identifier, so retried calls create distinct records.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), IntakeError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), IntakeError>;

    /// Append a record to the named collection.
    async fn persist(
        &self,
        collection: &str,
        record: NormalizedRecord,
    ) -> Result<StoredRecord, IntakeError>;

    /// Read back a single record by identifier.
    async fn get_record(
        &self,
        collection: &str,
        id: &RecordId,
    ) -> Result<Option<StoredRecord>, IntakeError>;

    /// List every record of a collection, oldest first.
    async fn list_records(&self, collection: &str) -> Result<Vec<StoredRecord>, IntakeError>;

    /// Number of records stored in a collection.
    async fn count_records(&self, collection: &str) -> Result<u64, IntakeError>;
}
