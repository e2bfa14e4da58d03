//! Request log API routes
//!
//! - `GET /logs` - Most recent request logs, newest first (fixed limit)
//!
//! Plain list-only viewer; no filtering or pagination.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sqlx::PgPool;

use crate::api::response::{ApiResponse, ErrorResponse};

use super::queries::list::{self, ListLogsError};

/// Creates the logs router
pub fn logs_routes() -> Router<PgPool> {
    Router::new().route("/", get(list_logs))
}

#[tracing::instrument(skip(pool))]
async fn list_logs(State(pool): State<PgPool>) -> Result<Response, LogApiError> {
    let logs = list::handle(pool).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(logs))).into_response())
}

/// Unified error type for log API endpoints
#[derive(Debug)]
enum LogApiError {
    List(ListLogsError),
}

impl From<ListLogsError> for LogApiError {
    fn from(err: ListLogsError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for LogApiError {
    fn into_response(self) -> Response {
        match self {
            LogApiError::List(ListLogsError::Database(err)) => {
                tracing::error!("Database error in logs API: {}", err);
                let error = ErrorResponse::new("INTERNAL_ERROR", "Failed to fetch logs");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
        }
    }
}
