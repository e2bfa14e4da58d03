//! Full-stack router tests
//!
//! Build the real feature router (auth middleware, handlers, audit layer)
//! over a lazy pool that never connects. Every path exercised here is an
//! authentication rejection or a validation failure, and all of them must
//! short-circuit before any statement executes; a 500 instead of the
//! expected status would mean the request reached the unreachable pool.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value as JsonValue;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use quill_server::audit::{
    AuditLayer, AuditRecorder, AuditStore, NewAuditRecord, MASKED_HEADER_VALUE,
};
use quill_server::auth::TokenCodec;
use quill_server::config::{AuditConfig, UploadsConfig};
use quill_server::features::{self, FeatureState};

const SECRET: &str = "router-test-secret";

#[derive(Clone, Default)]
struct MemoryStore {
    records: Arc<Mutex<Vec<NewAuditRecord>>>,
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append(&self, record: NewAuditRecord) -> Result<(), sqlx::Error> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}

fn test_app(store: MemoryStore) -> (Router, Arc<TokenCodec>) {
    // Lazy pool: valid URL, no connection is ever made in these tests.
    let pool = PgPoolOptions::new()
        .connect_lazy("postgresql://localhost:1/unreachable")
        .unwrap();

    let codec = Arc::new(TokenCodec::with_secret(SECRET, 3600));
    let state = FeatureState {
        db: pool,
        codec: Arc::clone(&codec),
        uploads: UploadsConfig {
            dir: "uploads".to_string(),
            base_url: "http://localhost:8080".to_string(),
        },
    };

    let recorder = AuditRecorder::spawn(
        Arc::new(store),
        &AuditConfig {
            queue_capacity: 64,
            workers: 1,
        },
    );

    let app = features::router(state).layer(AuditLayer::new(recorder));
    (app, codec)
}

async fn read_json(response: axum::response::Response) -> (StatusCode, JsonValue) {
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn protected_route_without_token_is_rejected_and_audited() {
    let store = MemoryStore::default();
    let (app, _codec) = test_app(store.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/notes")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "MISSING_HEADER");

    tokio::time::sleep(Duration::from_millis(100)).await;
    let records = store.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status_code, 401);
    assert_eq!(records[0].endpoint, "/notes");
}

#[tokio::test]
async fn rejected_bearer_token_is_never_stored_verbatim() {
    let store = MemoryStore::default();
    let (app, _codec) = test_app(store.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/notes")
                .header(header::AUTHORIZATION, "Bearer forged-token-value")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_OR_EXPIRED_TOKEN");

    tokio::time::sleep(Duration::from_millis(100)).await;
    let records = store.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].request_headers["authorization"], MASKED_HEADER_VALUE);
    assert!(!records[0]
        .request_headers
        .to_string()
        .contains("forged-token-value"));
}

#[tokio::test]
async fn update_without_fields_fails_before_any_statement() {
    let store = MemoryStore::default();
    let (app, codec) = test_app(store);
    let token = codec.issue(7).unwrap();

    // The pool is unreachable, so reaching the store would error with 500;
    // a 400 proves the request never got that far.
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::PATCH)
                .uri("/notes/5")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "No fields to update");
}

#[tokio::test]
async fn invalid_category_filter_fails_before_any_statement() {
    let store = MemoryStore::default();
    let (app, codec) = test_app(store);
    let token = codec.issue(7).unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/notes?category_id=garden")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn registration_validation_fails_before_any_statement() {
    let store = MemoryStore::default();
    let (app, _codec) = test_app(store);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"username":"ada","email":"ada@example.com","password":"short"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}
