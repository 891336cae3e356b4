// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the intake service.
//!
//! A thin axum layer over [`intake_forms::Dispatcher`]: it extracts the form
//! type and raw body, delegates, and maps each submission outcome to a
//! distinct status code.

pub mod handlers;
pub mod server;

pub use server::{build_router, start_server, GatewayState, HealthState, ServerConfig};
