//! Authentication middleware
//!
//! Gates protected routes on a valid, unexpired bearer token. The request
//! walks a short state machine: header present -> scheme is `Bearer` with a
//! single token segment -> token decodes. Any failure short-circuits with a
//! 401 before the handler runs; on success the authenticated user id is
//! inserted into request extensions exactly once.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::token::TokenCodec;
use crate::api::response::ErrorResponse;

/// The authenticated identity for the current request
///
/// Inserted by [`require_auth`]; handlers read it via `Extension<CurrentUser>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
}

/// Reasons a request failed authentication
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Invalid Authorization format")]
    MalformedHeader,

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,
}

impl AuthFailure {
    /// Machine-readable error kind for the response envelope
    pub fn code(&self) -> &'static str {
        match self {
            AuthFailure::MissingHeader => "MISSING_HEADER",
            AuthFailure::MalformedHeader => "MALFORMED_HEADER",
            AuthFailure::InvalidOrExpiredToken => "INVALID_OR_EXPIRED_TOKEN",
        }
    }
}

impl IntoResponse for AuthFailure {
    fn into_response(self) -> Response {
        let error = ErrorResponse::new(self.code(), self.to_string());
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

/// Middleware gating protected routes on a bearer token
///
/// On success, sets [`CurrentUser`] in request extensions and continues the
/// chain. On failure, responds 401 with one of the [`AuthFailure`] kinds;
/// the audit layer still observes the resulting response.
pub async fn require_auth(
    State(codec): State<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = match authenticate(&codec, &request) {
        Ok(user) => user,
        Err(failure) => {
            tracing::debug!(code = failure.code(), "Request rejected by auth middleware");
            return failure.into_response();
        }
    };

    request.extensions_mut().insert(user);
    next.run(request).await
}

fn authenticate(codec: &TokenCodec, request: &Request) -> Result<CurrentUser, AuthFailure> {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::MissingHeader)?
        .to_str()
        .map_err(|_| AuthFailure::MalformedHeader)?;

    let mut segments = header_value.split_whitespace();
    let token = match (segments.next(), segments.next(), segments.next()) {
        (Some("Bearer"), Some(token), None) => token,
        _ => return Err(AuthFailure::MalformedHeader),
    };

    let claim = codec
        .decode(token)
        .map_err(|_| AuthFailure::InvalidOrExpiredToken)?;

    Ok(CurrentUser { id: claim.user_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn codec() -> TokenCodec {
        TokenCodec::with_secret("middleware-test-secret", 3600)
    }

    fn request_with_header(value: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/notes");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn missing_header_is_rejected() {
        let result = authenticate(&codec(), &request_with_header(None));
        assert_eq!(result, Err(AuthFailure::MissingHeader));
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let result = authenticate(&codec(), &request_with_header(Some("Token abc")));
        assert_eq!(result, Err(AuthFailure::MalformedHeader));
    }

    #[test]
    fn extra_segments_are_rejected() {
        let result = authenticate(&codec(), &request_with_header(Some("Bearer one two")));
        assert_eq!(result, Err(AuthFailure::MalformedHeader));
    }

    #[test]
    fn undecodable_token_is_rejected() {
        let result = authenticate(&codec(), &request_with_header(Some("Bearer garbage")));
        assert_eq!(result, Err(AuthFailure::InvalidOrExpiredToken));
    }

    #[test]
    fn valid_token_yields_the_user() {
        let codec = codec();
        let token = codec.issue(99).unwrap();
        let request = request_with_header(Some(&format!("Bearer {}", token)));
        assert_eq!(authenticate(&codec, &request), Ok(CurrentUser { id: 99 }));
    }
}
