//! Router assembly and top-level handlers

pub mod response;

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use tower_http::services::ServeDir;

use crate::audit::{AuditLayer, AuditRecorder};
use crate::auth::token::TokenCodec;
use crate::config::Config;
use crate::{db, features, middleware};

/// Create the application router with all routes and middleware
///
/// The audit layer is outermost so it observes every request, including
/// static files, public routes, and authentication rejections.
pub fn create_router(
    pool: PgPool,
    codec: Arc<TokenCodec>,
    recorder: AuditRecorder,
    config: &Config,
) -> Router {
    let feature_state = features::FeatureState {
        db: pool.clone(),
        codec,
        uploads: config.uploads.clone(),
    };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .with_state(pool)
        .merge(features::router(feature_state))
        .nest_service("/uploads", ServeDir::new(&config.uploads.dir))
        // Apply layers from innermost to outermost
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
        .layer(AuditLayer::new(recorder))
}

/// Service identity handler
async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Quill Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// Health check handler
async fn health_check(State(pool): State<PgPool>) -> Result<Response, StatusCode> {
    match db::health_check(&pool).await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected"
            })),
        )
            .into_response()),
        Err(error) => {
            tracing::error!("Database health check failed: {:?}", error);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
