//! Audit middleware integration tests
//!
//! Drive a router wrapped in the audit layer and observe what reaches the
//! store. The store is swapped for in-memory and failing implementations,
//! so these tests assert the middleware contract directly: every response
//! is recorded, the bearer token never is, and a broken store never shows
//! up in the client's response.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

use quill_server::audit::{
    AuditLayer, AuditRecorder, AuditStore, NewAuditRecord, MASKED_HEADER_VALUE,
};
use quill_server::config::AuditConfig;

#[derive(Clone, Default)]
struct MemoryStore {
    records: Arc<Mutex<Vec<NewAuditRecord>>>,
}

impl MemoryStore {
    fn records(&self) -> Vec<NewAuditRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append(&self, record: NewAuditRecord) -> Result<(), sqlx::Error> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}

struct FailingStore;

#[async_trait]
impl AuditStore for FailingStore {
    async fn append(&self, _record: NewAuditRecord) -> Result<(), sqlx::Error> {
        Err(sqlx::Error::PoolClosed)
    }
}

fn audit_config() -> AuditConfig {
    AuditConfig {
        queue_capacity: 64,
        workers: 2,
    }
}

async fn create_handler(Json(payload): Json<JsonValue>) -> impl IntoResponse {
    (StatusCode::CREATED, Json(json!({ "received": payload })))
}

async fn text_handler() -> impl IntoResponse {
    "plain text response"
}

fn test_router(store: Arc<dyn AuditStore>) -> Router {
    let recorder = AuditRecorder::spawn(store, &audit_config());
    Router::new()
        .route("/notes", post(create_handler))
        .route("/plain", get(text_handler))
        .layer(AuditLayer::new(recorder))
}

/// Wait for the background writers to drain the queue
async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

#[tokio::test]
async fn successful_requests_are_recorded_with_masked_authorization() {
    let store = MemoryStore::default();
    let app = test_router(Arc::new(store.clone()));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/notes")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, "Bearer very-secret-token")
                .body(Body::from(r#"{"title":"Groceries"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: JsonValue = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["received"]["title"], "Groceries");

    settle().await;
    let records = store.records();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.method, "POST");
    assert_eq!(record.endpoint, "/notes");
    assert_eq!(record.status_code, 201);
    assert_eq!(record.request_headers["authorization"], MASKED_HEADER_VALUE);
    assert!(!record.request_headers.to_string().contains("very-secret-token"));
    assert_eq!(record.request_body.as_ref().unwrap()["title"], "Groceries");
    assert_eq!(
        record.response_body.as_ref().unwrap()["received"]["title"],
        "Groceries"
    );
}

#[tokio::test]
async fn failed_requests_are_recorded_too() {
    let store = MemoryStore::default();
    let app = test_router(Arc::new(store.clone()));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/missing")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    settle().await;
    let records = store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status_code, 404);
    assert_eq!(records[0].endpoint, "/missing");
    assert_eq!(records[0].request_body, None);
}

#[tokio::test]
async fn non_json_bodies_are_wrapped_not_rejected() {
    let store = MemoryStore::default();
    let app = test_router(Arc::new(store.clone()));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/plain")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"plain text response");

    settle().await;
    let records = store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].response_body,
        Some(JsonValue::String("plain text response".to_string()))
    );
}

#[tokio::test]
async fn store_failure_never_touches_the_response() {
    let app = test_router(Arc::new(FailingStore));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/notes")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"title":"still fine"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: JsonValue = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["received"]["title"], "still fine");
}

#[tokio::test]
async fn concurrent_requests_each_get_a_record() {
    let store = MemoryStore::default();
    let recorder = AuditRecorder::spawn(Arc::new(store.clone()), &audit_config());
    let app = Router::new()
        .route("/plain", get(text_handler))
        .layer(AuditLayer::new(recorder));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            app.oneshot(
                Request::builder()
                    .uri("/plain")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().status(), StatusCode::OK);
    }

    settle().await;
    assert_eq!(store.records().len(), 8);
}
