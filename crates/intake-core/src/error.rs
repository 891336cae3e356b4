// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Intake form service.

use thiserror::Error;

/// The infrastructure error type shared by adapters, the HTTP server, and the binary.
///
/// Submission outcomes (unknown form, validation failure) are not errors of
/// this kind; they live with the dispatcher in `intake-forms`.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, row decoding).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// HTTP server errors (bind failure, serve loop failure).
    #[error("server error: {message}")]
    Server {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntakeError {
    /// Build a storage error from a plain message.
    pub fn storage(message: impl Into<String>) -> Self {
        let message: String = message.into();
        IntakeError::Storage {
            source: message.into(),
        }
    }
}
