// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Form registry: the process-wide lookup from form-type identifier to schema.
//!
//! Schemas are registered through [`FormRegistryBuilder`] at startup. The
//! built [`FormRegistry`] has no mutators, so it can be shared behind an
//! `Arc` without locking.

use std::collections::HashMap;

use strum::IntoEnumIterator;
use thiserror::Error;

use crate::schema::{FormSchema, FormType};

/// Registration conflicts detected while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("form type or alias `{0}` is already registered")]
    DuplicateName(String),

    #[error("collection `{collection}` is already used by form type `{owner}`")]
    DuplicateCollection { collection: String, owner: String },

    #[error("form type `{0}` declares no fields")]
    EmptySchema(String),
}

/// Append-only builder for a [`FormRegistry`].
#[derive(Debug, Default)]
pub struct FormRegistryBuilder {
    schemas: Vec<&'static FormSchema>,
    by_name: HashMap<&'static str, usize>,
}

impl FormRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its form type and aliases.
    pub fn register(mut self, schema: &'static FormSchema) -> Result<Self, RegistryError> {
        if schema.fields.is_empty() {
            return Err(RegistryError::EmptySchema(schema.form_type.to_string()));
        }

        if let Some(owner) = self
            .schemas
            .iter()
            .find(|s| s.collection == schema.collection)
        {
            return Err(RegistryError::DuplicateCollection {
                collection: schema.collection.to_string(),
                owner: owner.form_type.to_string(),
            });
        }

        let index = self.schemas.len();
        let names = std::iter::once(schema.form_type).chain(schema.aliases.iter().copied());
        let mut pending = Vec::new();
        for name in names {
            if self.by_name.contains_key(name) || pending.contains(&name) {
                return Err(RegistryError::DuplicateName(name.to_string()));
            }
            pending.push(name);
        }

        for name in pending {
            self.by_name.insert(name, index);
        }
        self.schemas.push(schema);
        Ok(self)
    }

    pub fn build(self) -> FormRegistry {
        FormRegistry {
            schemas: self.schemas,
            by_name: self.by_name,
        }
    }
}

/// Read-only mapping from form-type identifier (or alias) to schema.
#[derive(Debug)]
pub struct FormRegistry {
    schemas: Vec<&'static FormSchema>,
    by_name: HashMap<&'static str, usize>,
}

impl FormRegistry {
    pub fn builder() -> FormRegistryBuilder {
        FormRegistryBuilder::new()
    }

    /// Registry holding the four built-in forms.
    pub fn builtin() -> Result<Self, RegistryError> {
        FormType::iter()
            .try_fold(Self::builder(), |builder, form_type| {
                builder.register(form_type.schema())
            })
            .map(FormRegistryBuilder::build)
    }

    /// Look up a schema by canonical identifier or alias (exact match).
    pub fn resolve(&self, form_type: &str) -> Option<&'static FormSchema> {
        self.by_name.get(form_type).map(|&index| self.schemas[index])
    }

    /// Registered schemas in registration order.
    pub fn schemas(&self) -> impl Iterator<Item = &'static FormSchema> + '_ {
        self.schemas.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
