// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for intake integration tests.
//!
//! Provides an in-memory storage adapter and canned payloads for fast,
//! deterministic tests without a database on disk.
//!
//! # Components
//!
//! - [`MockStorage`] - In-memory `StorageAdapter` with failure injection
//! - [`fixtures`] - Valid submission payloads for each built-in form

pub mod fixtures;
pub mod mock_storage;

pub use mock_storage::MockStorage;
