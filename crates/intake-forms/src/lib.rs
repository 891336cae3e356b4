// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Form schemas, validation, and submission dispatch for the intake service.
//!
//! The flow is `registry -> validator -> storage`: a form type resolves to a
//! declarative [`FormSchema`], the payload is checked against it to produce a
//! [`NormalizedRecord`](intake_core::NormalizedRecord), and the dispatcher
//! hands accepted records to a [`StorageAdapter`](intake_core::StorageAdapter).

pub mod dispatcher;
pub mod field;
pub mod records;
pub mod registry;
pub mod schema;
pub mod validator;

pub use dispatcher::{Dispatcher, SubmissionError};
pub use field::{parse_date, Constraint};
pub use records::{FormRecord, TypedRecordError};
pub use registry::{FormRegistry, FormRegistryBuilder, RegistryError};
pub use schema::{FieldSpec, FormSchema, FormType};
pub use validator::{validate, validate_at, ValidationError};
