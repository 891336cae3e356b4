// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `intake forms` command implementation.

use std::collections::HashMap;

use intake_config::IntakeConfig;
use intake_core::{IntakeError, StorageAdapter};
use intake_forms::FormRegistry;
use intake_storage::SqliteStorage;

/// Print every registered form, optionally with per-collection record counts.
pub async fn run_forms(config: &IntakeConfig, counts: bool) -> Result<(), IntakeError> {
    let registry = FormRegistry::builtin()
        .map_err(|e| IntakeError::Internal(format!("failed to build form registry: {e}")))?;

    let counts = if counts {
        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        let counts = storage.collection_counts().await?;
        storage.close().await?;
        Some(counts)
    } else {
        None
    };

    print!("{}", render_forms(&registry, counts.as_ref()));
    Ok(())
}

/// Render the registry as a plain-text listing.
pub fn render_forms(registry: &FormRegistry, counts: Option<&HashMap<String, u64>>) -> String {
    let mut out = String::new();
    for schema in registry.schemas() {
        out.push_str(&format!("{} ({})", schema.form_type, schema.label));
        if !schema.aliases.is_empty() {
            out.push_str(&format!("  aliases: {}", schema.aliases.join(", ")));
        }
        out.push('\n');

        out.push_str(&format!("  collection: {}", schema.collection));
        if let Some(counts) = counts {
            let n = counts.get(schema.collection).copied().unwrap_or(0);
            out.push_str(&format!(" ({n} records)"));
        }
        out.push('\n');

        let width = schema.fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
        for field in schema.fields {
            out.push_str(&format!(
                "    {:width$}  {}\n",
                field.name,
                field.constraint.describe()
            ));
        }
        out.push('\n');
    }
    out
}
