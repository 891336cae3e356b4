// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `intake serve` command implementation.
//!
//! Opens SQLite storage, builds the form registry and dispatcher, and serves
//! the HTTP routes until SIGINT/SIGTERM. Storage is checkpointed and closed
//! after the server has drained.

use std::sync::Arc;

use intake_config::IntakeConfig;
use intake_core::{IntakeError, StorageAdapter};
use intake_forms::{Dispatcher, FormRegistry};
use intake_gateway::{start_server, GatewayState, HealthState, ServerConfig};
use intake_storage::SqliteStorage;
use tracing::{error, info};

use crate::shutdown;

/// Runs the `intake serve` command.
pub async fn run_serve(config: IntakeConfig) -> Result<(), IntakeError> {
    init_tracing(&config.service.log_level);

    info!(service = %config.service.name, "starting intake serve");

    let registry = FormRegistry::builtin()
        .map_err(|e| IntakeError::Internal(format!("failed to build form registry: {e}")))?;
    info!(forms = registry.len(), "form registry built");

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage initialized");

    let state = GatewayState {
        dispatcher: Dispatcher::new(Arc::new(registry), storage.clone()),
        health: HealthState::new(config.service.name.clone()),
    };

    let shutdown = shutdown::install_signal_handler();
    let served = start_server(&server_config(&config), state, shutdown.clone()).await;
    // Stop the signal task if the server exited on its own.
    shutdown.cancel();

    if let Err(e) = storage.close().await {
        error!(error = %e, "failed to close storage cleanly");
    }
    info!("intake stopped");
    served
}

fn server_config(config: &IntakeConfig) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        cors_allowed_origins: config.server.cors_allowed_origins.clone(),
        max_body_bytes: config.server.max_body_bytes,
    }
}

/// Initialize the tracing subscriber; `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("intake={log_level},tower_http={log_level},warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
