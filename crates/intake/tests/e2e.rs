// SPDX-FileCopyrightText: 2026 Intake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: dispatcher, HTTP routes and SQLite storage wired
//! together the way `intake serve` wires them.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use intake_config::model::StorageConfig;
use intake_core::{RecordId, StorageAdapter};
use intake_forms::{Dispatcher, FormRecord, FormRegistry, SubmissionError};
use intake_gateway::{build_router, GatewayState, HealthState, ServerConfig};
use intake_storage::SqliteStorage;
use intake_test_utils::fixtures;

const FORM_TYPES: [&str; 4] = ["sales", "buyer", "requirement", "job_opening"];

fn storage_config(dir: &TempDir) -> StorageConfig {
    StorageConfig {
        database_path: dir.path().join("intake.db").to_string_lossy().into_owned(),
        wal_mode: true,
    }
}

async fn open_storage(dir: &TempDir) -> Arc<SqliteStorage> {
    let storage = Arc::new(SqliteStorage::new(storage_config(dir)));
    storage.initialize().await.unwrap();
    storage
}

fn dispatcher(storage: Arc<SqliteStorage>) -> Dispatcher {
    Dispatcher::new(Arc::new(FormRegistry::builtin().unwrap()), storage)
}

#[tokio::test]
async fn every_form_reads_back_field_for_field() {
    let dir = TempDir::new().unwrap();
    let storage = open_storage(&dir).await;
    let dispatcher = dispatcher(storage.clone());

    for form_type in FORM_TYPES {
        let stored = dispatcher
            .submit(form_type, &fixtures::valid_payload(form_type))
            .await
            .unwrap();
        let schema = dispatcher.resolve(form_type).unwrap();

        let read = storage
            .get_record(schema.collection, &stored.id)
            .await
            .unwrap()
            .unwrap_or_else(|| panic!("{form_type} record missing"));
        assert_eq!(read, stored, "{form_type} changed on readback");

        let typed = FormRecord::from_normalized(&read.record).unwrap();
        assert_eq!(typed.form_type().to_string(), schema.form_type);
    }

    storage.close().await.unwrap();
}

#[tokio::test]
async fn concurrent_submissions_land_in_their_collections() {
    let dir = TempDir::new().unwrap();
    let storage = open_storage(&dir).await;
    let dispatcher = dispatcher(storage.clone());

    let tasks = (0..40).map(|i| {
        let dispatcher = dispatcher.clone();
        let form_type = FORM_TYPES[i % FORM_TYPES.len()];
        tokio::spawn(async move {
            let mut payload = fixtures::valid_payload(form_type);
            payload["city"] = json!(format!("city-{i}"));
            dispatcher.submit(form_type, &payload).await
        })
    });
    let results = futures::future::join_all(tasks).await;

    let mut ids: Vec<RecordId> = results
        .into_iter()
        .map(|r| r.unwrap().unwrap().id)
        .collect();
    ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    ids.dedup();
    assert_eq!(ids.len(), 40, "identifiers must be unique");

    for collection in ["form.sales", "form.buyer", "form.requirement", "form.jobopeningform"] {
        assert_eq!(storage.count_records(collection).await.unwrap(), 10, "{collection}");
    }
    let counts = storage.collection_counts().await.unwrap();
    assert_eq!(counts.values().sum::<u64>(), 40);

    storage.close().await.unwrap();
}

#[tokio::test]
async fn rejected_submissions_write_nothing() {
    let dir = TempDir::new().unwrap();
    let storage = open_storage(&dir).await;
    let dispatcher = dispatcher(storage.clone());

    let mut payload = fixtures::valid_payload("sales");
    payload["transaction_amount"] = json!("a lot");
    let err = dispatcher.submit("sales", &payload).await.unwrap_err();
    assert!(matches!(err, SubmissionError::ValidationFailed(ref v) if v.len() == 1));

    let err = dispatcher
        .submit("survey", &fixtures::valid_payload("sales"))
        .await
        .unwrap_err();
    assert!(matches!(err, SubmissionError::UnknownFormType(_)));

    assert!(storage.collection_counts().await.unwrap().is_empty());
    storage.close().await.unwrap();
}

#[tokio::test]
async fn records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let stored = {
        let storage = open_storage(&dir).await;
        let stored = dispatcher(storage.clone())
            .submit("requirement", &fixtures::valid_payload("requirement"))
            .await
            .unwrap();
        storage.close().await.unwrap();
        stored
    };

    let storage = open_storage(&dir).await;
    let listed = storage.list_records("form.requirement").await.unwrap();
    assert_eq!(listed, vec![stored]);
    storage.close().await.unwrap();
}

#[tokio::test]
async fn http_submission_is_readable_by_returned_id() {
    let dir = TempDir::new().unwrap();
    let storage = open_storage(&dir).await;
    let state = GatewayState {
        dispatcher: dispatcher(storage.clone()),
        health: HealthState::new("intake-e2e"),
    };
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        max_body_bytes: 65_536,
    };
    let app = build_router(&config, state);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/buyer")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(fixtures::valid_payload("buyer").to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    let id = RecordId(body["data"]["id"].as_str().unwrap().to_string());
    let read = storage.get_record("form.buyer", &id).await.unwrap().unwrap();
    assert_eq!(serde_json::to_value(&read).unwrap(), body["data"]);
    assert_eq!(read.record.get("seller_name").and_then(|v| v.as_text()), Some("Ledger Co"));

    let health = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    storage.close().await.unwrap();
}
