// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage adapter for deterministic testing.
//!
//! `MockStorage` implements `StorageAdapter` over a map of collections,
//! with switches to make writes or health checks fail on demand.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use intake_core::traits::adapter::PluginAdapter;
use intake_core::traits::storage::StorageAdapter;
use intake_core::types::{HealthStatus, NormalizedRecord, RecordId, StoredRecord};
use intake_core::IntakeError;

/// A storage adapter that keeps records in memory.
///
/// Records are appended per collection in arrival order. Nothing survives
/// the value being dropped.
#[derive(Debug, Default)]
pub struct MockStorage {
    collections: DashMap<String, Vec<StoredRecord>>,
    fail_next: AtomicBool,
    failing: AtomicBool,
    unhealthy: AtomicBool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make only the next `persist` call fail.
    pub fn fail_next_persist(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Make every `persist` call fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Report `Unhealthy` from `health_check` until switched back.
    pub fn set_unhealthy(&self, unhealthy: bool) {
        self.unhealthy.store(unhealthy, Ordering::SeqCst);
    }

    /// Number of records across all collections.
    pub fn total_records(&self) -> usize {
        self.collections.iter().map(|entry| entry.value().len()).sum()
    }

    /// Names of the collections that hold at least one record.
    pub fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .collections
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }
}

#[async_trait]
impl PluginAdapter for MockStorage {
    fn name(&self) -> &str {
        "mock-storage"
    }

    async fn health_check(&self) -> Result<HealthStatus, IntakeError> {
        if self.unhealthy.load(Ordering::SeqCst) {
            return Ok(HealthStatus::Unhealthy("mock storage marked unhealthy".into()));
        }
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl StorageAdapter for MockStorage {
    async fn initialize(&self) -> Result<(), IntakeError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), IntakeError> {
        Ok(())
    }

    async fn persist(
        &self,
        collection: &str,
        record: NormalizedRecord,
    ) -> Result<StoredRecord, IntakeError> {
        if self.fail_next.swap(false, Ordering::SeqCst) || self.failing.load(Ordering::SeqCst) {
            return Err(IntakeError::storage("injected write failure"));
        }
        let stored = StoredRecord::assign(collection, record);
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn get_record(
        &self,
        collection: &str,
        id: &RecordId,
    ) -> Result<Option<StoredRecord>, IntakeError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|records| records.iter().find(|r| &r.id == id).cloned()))
    }

    async fn list_records(&self, collection: &str) -> Result<Vec<StoredRecord>, IntakeError> {
        Ok(self
            .collections
            .get(collection)
            .map(|records| records.clone())
            .unwrap_or_default())
    }

    async fn count_records(&self, collection: &str) -> Result<u64, IntakeError> {
        Ok(self
            .collections
            .get(collection)
            .map_or(0, |records| records.len() as u64))
    }
}
