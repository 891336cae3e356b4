// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router-level tests driving the intake routes in-process.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use intake_core::StorageAdapter;
use intake_forms::{Dispatcher, FormRegistry};
use intake_gateway::{build_router, GatewayState, HealthState, ServerConfig};
use intake_test_utils::{fixtures, MockStorage};

const MAX_BODY: usize = 4096;

fn app(storage: Arc<MockStorage>) -> Router {
    let registry = Arc::new(FormRegistry::builtin().unwrap());
    let state = GatewayState {
        dispatcher: Dispatcher::new(registry, storage),
        health: HealthState::new("intake-test"),
    };
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        max_body_bytes: MAX_BODY,
    };
    build_router(&config, state)
}

fn post(path: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn root_says_hello() {
    let response = app(Arc::new(MockStorage::new()))
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Hello World!");
}

#[tokio::test]
async fn health_reports_ok_and_unavailable() {
    let storage = Arc::new(MockStorage::new());
    let (status, body) = send(
        app(storage.clone()),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "intake-test");

    storage.set_unhealthy(true);
    let (status, body) = send(
        app(storage),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unavailable");
}

#[tokio::test]
async fn valid_sales_submission_is_created() {
    let storage = Arc::new(MockStorage::new());
    let payload = fixtures::valid_payload("sales").to_string();
    let (status, body) = send(app(storage.clone()), post("/api/sales", payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Sales data saved successfully");
    assert_eq!(body["data"]["collection"], "form.sales");
    assert_eq!(body["data"]["form_type"], "sales");
    assert_eq!(body["data"]["transaction_amount"], 15000.0);
    assert_eq!(body["data"]["date_of_transaction"], "2024-03-01");
    assert!(body["data"]["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(storage.count_records("form.sales").await.unwrap(), 1);
}

#[tokio::test]
async fn legacy_job_opening_route_is_an_alias() {
    let storage = Arc::new(MockStorage::new());
    let payload = fixtures::valid_payload("job_opening").to_string();
    let (status, body) = send(app(storage.clone()), post("/api/jobopeningform", payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["collection"], "form.jobopeningform");
    assert_eq!(body["data"]["job_type"], "full_time");
    assert!(body["data"]["created_at"].is_string());
}

#[tokio::test]
async fn unknown_form_type_is_not_found_even_with_bad_body() {
    let storage = Arc::new(MockStorage::new());
    let (status, body) = send(app(storage.clone()), post("/api/survey", "not json")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "unknown_form_type");
    assert_eq!(storage.total_records(), 0);
}

#[tokio::test]
async fn non_json_and_non_object_bodies_are_bad_requests() {
    for raw in ["not json", "", "[1, 2, 3]"] {
        let (status, body) = send(app(Arc::new(MockStorage::new())), post("/api/buyer", raw)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {raw:?}");
        assert_eq!(body["error"], "malformed_payload");
    }
}

#[tokio::test]
async fn violations_are_unprocessable_with_field_list() {
    let storage = Arc::new(MockStorage::new());
    let mut payload = fixtures::valid_payload("requirement");
    payload["urgency"] = json!("2 weeks");
    payload.as_object_mut().unwrap().remove("name");

    let request = post("/api/requirement", payload.to_string());
    let (status, body) = send(app(storage.clone()), request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_failed");
    let fields: Vec<&str> = body["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "urgency"]);
    assert_eq!(storage.total_records(), 0);
}

#[tokio::test]
async fn storage_failure_is_internal_error_without_cause() {
    let storage = Arc::new(MockStorage::new());
    storage.set_failing(true);
    let payload = fixtures::valid_payload("buyer").to_string();
    let (status, body) = send(app(storage), post("/api/buyer", payload)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "storage_failed");
    assert!(!body.to_string().contains("injected"));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let mut payload = fixtures::valid_payload("sales");
    payload["remarks"] = json!("x".repeat(MAX_BODY * 2));
    let response = app(Arc::new(MockStorage::new()))
        .oneshot(post("/api/sales", payload.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin_only() {
    let preflight = |origin: &str| {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/sales")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap()
    };

    let response = app(Arc::new(MockStorage::new()))
        .oneshot(preflight("http://localhost:3000"))
        .await
        .unwrap();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );

    let response = app(Arc::new(MockStorage::new()))
        .oneshot(preflight("http://evil.example"))
        .await
        .unwrap();
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
