//! Account API routes
//!
//! - `POST /register` - Create an account
//! - `POST /login` - Exchange credentials for a bearer token
//!
//! Both routes are public; they are where bearer tokens come from.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use sqlx::PgPool;

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::auth::token::TokenCodec;

use super::commands::{
    login::{self, LoginCommand, LoginError},
    register::{self, RegisterCommand, RegisterError},
};

/// State for account routes
#[derive(Clone)]
pub struct AuthState {
    pub db: PgPool,
    pub codec: Arc<TokenCodec>,
}

/// Creates the account router
pub fn auth_routes() -> Router<AuthState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
}

#[tracing::instrument(skip(state, command))]
async fn register_user(
    State(state): State<AuthState>,
    Json(command): Json<RegisterCommand>,
) -> Result<Response, AuthApiError> {
    let response = register::handle(state.db, command).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state, command))]
async fn login_user(
    State(state): State<AuthState>,
    Json(command): Json<LoginCommand>,
) -> Result<Response, AuthApiError> {
    let response = login::handle(state.db, &state.codec, command).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// Unified error type for account API endpoints
#[derive(Debug)]
enum AuthApiError {
    Register(RegisterError),
    Login(LoginError),
}

impl From<RegisterError> for AuthApiError {
    fn from(err: RegisterError) -> Self {
        Self::Register(err)
    }
}

impl From<LoginError> for AuthApiError {
    fn from(err: LoginError) -> Self {
        Self::Login(err)
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        match self {
            AuthApiError::Register(RegisterError::UsernameRequired)
            | AuthApiError::Register(RegisterError::EmailRequired)
            | AuthApiError::Register(RegisterError::PasswordTooShort) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", self.message());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            }
            AuthApiError::Register(RegisterError::AlreadyTaken) => {
                let error = ErrorResponse::new("CONFLICT", self.message());
                (StatusCode::CONFLICT, Json(error)).into_response()
            }
            AuthApiError::Login(LoginError::InvalidCredentials) => {
                let error = ErrorResponse::new("INVALID_CREDENTIALS", self.message());
                (StatusCode::UNAUTHORIZED, Json(error)).into_response()
            }
            AuthApiError::Register(RegisterError::Hash(_))
            | AuthApiError::Login(LoginError::Token(_)) => {
                tracing::error!("Credential processing failed: {}", self.message());
                let error = ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
            AuthApiError::Register(RegisterError::Database(_))
            | AuthApiError::Login(LoginError::Database(_)) => {
                tracing::error!("Database error in account API: {}", self.message());
                let error = ErrorResponse::new("INTERNAL_ERROR", "A database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            }
        }
    }
}

impl AuthApiError {
    fn message(&self) -> String {
        match self {
            AuthApiError::Register(err) => err.to_string(),
            AuthApiError::Login(err) => err.to_string(),
        }
    }
}
