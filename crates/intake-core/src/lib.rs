// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Intake form service.
//!
//! This crate provides the adapter traits, the infrastructure error type, and
//! the record types (normalized records, stored records, violations) shared by
//! the validation pipeline, the storage backends, and the HTTP gateway.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::IntakeError;
pub use traits::{PluginAdapter, StorageAdapter};
pub use types::{
    FieldKind, FieldValue, HealthStatus, NormalizedRecord, RecordId, StoredRecord, Violation,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intake_error_variants_render() {
        let config = IntakeError::Config("bad port".into());
        assert_eq!(config.to_string(), "configuration error: bad port");

        let storage = IntakeError::storage("disk full");
        assert_eq!(storage.to_string(), "storage error: disk full");

        let server = IntakeError::Server {
            message: "bind failed".into(),
            source: None,
        };
        assert_eq!(server.to_string(), "server error: bind failed");

        let internal = IntakeError::Internal("oops".into());
        assert_eq!(internal.to_string(), "internal error: oops");
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn storage_adapter_is_object_safe() {
        fn _assert_dyn(_: &dyn StorageAdapter) {}
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
    }

    struct NullBackend;

    #[async_trait::async_trait]
    impl PluginAdapter for NullBackend {
        fn name(&self) -> &str {
            "null"
        }

        async fn health_check(&self) -> Result<HealthStatus, IntakeError> {
            Ok(HealthStatus::Unhealthy("no backend".into()))
        }
    }

    #[test]
    fn plugin_adapter_needs_only_identity_and_health() {
        let adapter: Box<dyn PluginAdapter> = Box::new(NullBackend);
        assert_eq!(adapter.name(), "null");
    }
}
