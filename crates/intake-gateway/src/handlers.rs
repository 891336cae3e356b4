// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the intake routes.
//!
//! Handles GET /, GET /health, and POST /api/{form_type}.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use intake_core::{HealthStatus, StoredRecord, Violation};
use intake_forms::SubmissionError;

use crate::server::GatewayState;

/// Response body for a stored submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: String,
    /// The stored record: identifier, collection, timestamps and fields.
    pub data: StoredRecord,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, `degraded` or `unavailable`.
    pub status: String,
    pub service: String,
    /// Binary version.
    pub version: String,
    pub uptime_secs: u64,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    pub message: String,
    /// Field-level failures, present for validation errors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
}

impl From<SubmissionError> for ErrorResponse {
    fn from(err: SubmissionError) -> Self {
        let error = err.code().to_string();
        match err {
            SubmissionError::ValidationFailed(violations) => ErrorResponse {
                error,
                message: "submission failed validation".to_string(),
                violations: Some(violations),
            },
            // The storage cause is logged by the dispatcher, never echoed.
            SubmissionError::StorageFailed(_) => ErrorResponse {
                error,
                message: "failed to save submission".to_string(),
                violations: None,
            },
            other => ErrorResponse {
                error,
                message: other.to_string(),
                violations: None,
            },
        }
    }
}

/// HTTP status for each submission failure.
pub fn status_for(err: &SubmissionError) -> StatusCode {
    match err {
        SubmissionError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
        SubmissionError::UnknownFormType(_) => StatusCode::NOT_FOUND,
        SubmissionError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionError::StorageFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: SubmissionError) -> Response {
    let status = status_for(&err);
    (status, Json(ErrorResponse::from(err))).into_response()
}

/// GET /
pub async fn hello() -> &'static str {
    "Hello World!"
}

/// GET /health
///
/// Reports 503 when the storage backend is unhealthy or its health check errors.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let storage = state.dispatcher.storage();
    let (code, status) = match storage.health_check().await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "ok"),
        Ok(HealthStatus::Unhealthy(reason)) => {
            warn!(storage = storage.name(), %reason, "storage unhealthy");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
        Err(e) => {
            warn!(storage = storage.name(), error = %e, "storage health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    let body = HealthResponse {
        status: status.to_string(),
        service: state.health.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
    };
    (code, Json(body)).into_response()
}

/// POST /api/{form_type}
///
/// The form type is resolved before the body is looked at, and the body is
/// taken as raw bytes so a non-JSON body becomes a `malformed_payload`
/// error rather than axum's default rejection.
pub async fn submit_form(
    State(state): State<GatewayState>,
    Path(form_type): Path<String>,
    body: Bytes,
) -> Response {
    let schema = match state.dispatcher.resolve(&form_type) {
        Ok(schema) => schema,
        Err(err) => return error_response(err),
    };

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(form_type = schema.form_type, error = %e, "request body is not JSON");
            return error_response(SubmissionError::MalformedPayload(format!(
                "request body is not valid JSON: {e}"
            )));
        }
    };

    match state.dispatcher.submit_to(schema, &payload).await {
        Ok(stored) => {
            let response = SubmitResponse {
                message: format!("{} data saved successfully", schema.label),
                data: stored,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(err) => error_response(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::IntakeError;

    #[test]
    fn each_failure_has_a_distinct_status() {
        let errors = [
            SubmissionError::MalformedPayload("x".into()),
            SubmissionError::UnknownFormType("survey".into()),
            SubmissionError::ValidationFailed(vec![Violation::new("city", "is required")]),
            SubmissionError::StorageFailed(IntakeError::storage("disk full")),
        ];
        let statuses: Vec<u16> = errors.iter().map(|e| status_for(e).as_u16()).collect();
        assert_eq!(statuses, vec![400, 404, 422, 500]);
    }

    #[test]
    fn validation_error_body_lists_violations() {
        let body = ErrorResponse::from(SubmissionError::ValidationFailed(vec![Violation::new(
            "urgency",
            "must be one of: 1 day, 1 week, 1 month",
        )]));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "validation_failed");
        assert_eq!(json["violations"][0]["field"], "urgency");
    }

    #[test]
    fn storage_error_body_hides_cause() {
        let body = ErrorResponse::from(SubmissionError::StorageFailed(IntakeError::storage(
            "SQLITE_FULL at /var/lib/intake/intake.db",
        )));
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("SQLITE_FULL"));
        assert!(!json.contains("violations"));
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            service: "intake".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"uptime_secs\":42"));
    }
}
