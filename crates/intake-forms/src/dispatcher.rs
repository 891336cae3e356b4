// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The intake dispatcher: form type + raw payload in, stored record out.
//!
//! Each call moves through `Validating -> {Persisted | Rejected}` exactly
//! once. The dispatcher holds no schema-specific logic; it routes over the
//! `{schema, collection}` pairs held by the [`FormRegistry`].

use std::sync::Arc;

use intake_core::{IntakeError, StorageAdapter, StoredRecord, Violation};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::registry::FormRegistry;
use crate::schema::FormSchema;
use crate::validator::{join_violations, validate, ValidationError};

/// Every way a submission can fail. None of them is fatal to the process.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The payload is not a key/value mapping.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// No schema is registered under the requested form type.
    #[error("unknown form type `{0}`")]
    UnknownFormType(String),

    /// One or more fields violate the schema; nothing was written.
    #[error("validation failed: {}", join_violations(.0))]
    ValidationFailed(Vec<Violation>),

    /// The storage backend could not durably write the record.
    #[error("storage failed: {0}")]
    StorageFailed(#[source] IntakeError),
}

impl SubmissionError {
    /// Stable machine-readable code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            SubmissionError::MalformedPayload(_) => "malformed_payload",
            SubmissionError::UnknownFormType(_) => "unknown_form_type",
            SubmissionError::ValidationFailed(_) => "validation_failed",
            SubmissionError::StorageFailed(_) => "storage_failed",
        }
    }
}

impl From<ValidationError> for SubmissionError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MalformedPayload { .. } => {
                SubmissionError::MalformedPayload(err.to_string())
            }
            ValidationError::Violations(violations) => {
                SubmissionError::ValidationFailed(violations)
            }
        }
    }
}

/// Routes submissions to their schema and persists accepted records.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<FormRegistry>,
    storage: Arc<dyn StorageAdapter>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("forms", &self.registry.len())
            .field("storage", &self.storage.name())
            .finish()
    }
}

impl Dispatcher {
    pub fn new(registry: Arc<FormRegistry>, storage: Arc<dyn StorageAdapter>) -> Self {
        Self { registry, storage }
    }

    pub fn registry(&self) -> &FormRegistry {
        &self.registry
    }

    pub fn storage(&self) -> &Arc<dyn StorageAdapter> {
        &self.storage
    }

    /// Resolve a form type (or alias) to its schema.
    pub fn resolve(&self, form_type: &str) -> Result<&'static FormSchema, SubmissionError> {
        self.registry.resolve(form_type).ok_or_else(|| {
            warn!(form_type, "submission for unknown form type");
            SubmissionError::UnknownFormType(form_type.to_string())
        })
    }

    /// Validate and persist a submission for the named form type.
    pub async fn submit(
        &self,
        form_type: &str,
        payload: &Value,
    ) -> Result<StoredRecord, SubmissionError> {
        let schema = self.resolve(form_type)?;
        self.submit_to(schema, payload).await
    }

    /// Validate and persist a submission against an already resolved schema.
    pub async fn submit_to(
        &self,
        schema: &'static FormSchema,
        payload: &Value,
    ) -> Result<StoredRecord, SubmissionError> {
        debug!(form_type = schema.form_type, "validating submission");

        let record = validate(schema, payload).map_err(|err| {
            let err = SubmissionError::from(err);
            warn!(form_type = schema.form_type, error = %err, "submission rejected");
            err
        })?;

        let stored = self
            .storage
            .persist(schema.collection, record)
            .await
            .map_err(|err| {
                error!(
                    form_type = schema.form_type,
                    collection = schema.collection,
                    error = %err,
                    "failed to persist submission"
                );
                SubmissionError::StorageFailed(err)
            })?;

        info!(
            form_type = schema.form_type,
            collection = %stored.collection,
            record_id = %stored.id,
            "submission persisted"
        );
        Ok(stored)
    }
}
