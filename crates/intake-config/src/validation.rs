// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the semantic constraints serde cannot express: a bindable host, a
//! usable database path, well-formed CORS origins, a known log level and a
//! non-zero body limit.

use crate::diagnostic::ConfigError;
use crate::model::IntakeConfig;

/// Log levels accepted by `service.log_level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure rather than stopping at the first.
pub fn validate_config(config: &IntakeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::invalid("server.host", "must not be empty"));
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::invalid(
                "server.host",
                format!("`{host}` is not a valid IP address or hostname"),
            ));
        }
    }

    if config.server.max_body_bytes == 0 {
        errors.push(ConfigError::invalid_with_help(
            "server.max_body_bytes",
            "must be greater than zero",
            "the default is 65536",
        ));
    }

    for origin in &config.server.cors_allowed_origins {
        if !is_http_origin(origin) {
            errors.push(ConfigError::invalid_with_help(
                "server.cors_allowed_origins",
                format!("`{origin}` is not an http(s) origin"),
                "origins look like `https://forms.example.com` (scheme and host, no path)",
            ));
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::invalid("storage.database_path", "must not be empty"));
    }

    let level = config.service.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::invalid_with_help(
            "service.log_level",
            format!("unknown log level `{}`", config.service.log_level),
            format!("use one of: {}", LOG_LEVELS.join(", ")),
        ));
    }

    if config.service.name.trim().is_empty() {
        errors.push(ConfigError::invalid("service.name", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `scheme://host[:port]` with an http or https scheme and no path.
fn is_http_origin(origin: &str) -> bool {
    let Some(rest) = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"))
    else {
        return false;
    };
    !rest.is_empty() && !rest.contains('/') && !rest.chars().any(char::is_whitespace)
}
