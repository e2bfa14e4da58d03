//! Audit logging middleware
//!
//! Wraps every route, public and protected alike, and records one
//! structured observation per request/response pair regardless of outcome:
//! method, path, redacted headers, both bodies, and the status code.
//!
//! The request body is buffered and the request reconstructed so downstream
//! extractors see it untouched; the response body is buffered the same way
//! and forwarded byte-for-byte, so the client sees no behavioral
//! difference. Persistence goes through the [`AuditRecorder`] queue and is
//! never awaited by the response path.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    response::Response,
};
use chrono::Utc;
use http_body_util::BodyExt;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};
use tower::{Layer, Service};
use tracing::warn;

use super::models::{body_to_json, redacted_headers, NewAuditRecord};
use super::recorder::AuditRecorder;

/// Audit logging layer
#[derive(Clone)]
pub struct AuditLayer {
    recorder: AuditRecorder,
}

impl AuditLayer {
    /// Create a new audit layer backed by a recorder queue
    pub fn new(recorder: AuditRecorder) -> Self {
        Self { recorder }
    }
}

impl<S> Layer<S> for AuditLayer {
    type Service = AuditMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuditMiddleware {
            inner,
            recorder: self.recorder.clone(),
        }
    }
}

/// Audit middleware service
#[derive(Clone)]
pub struct AuditMiddleware<S> {
    inner: S,
    recorder: AuditRecorder,
}

impl<S> Service<Request> for AuditMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let mut inner = self.inner.clone();
        let recorder = self.recorder.clone();

        Box::pin(async move {
            let started = Instant::now();
            let method = request.method().clone();
            let endpoint = request.uri().path().to_string();
            let request_headers = redacted_headers(request.headers());

            // Buffer the body so the real handler can still read it.
            let (parts, body) = request.into_parts();
            let request_bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(error) => {
                    warn!(
                        method = %method,
                        endpoint = %endpoint,
                        error = %error,
                        "Failed to capture request body"
                    );
                    Bytes::new()
                }
            };
            let request = Request::from_parts(parts, Body::from(request_bytes.clone()));

            let response = inner.call(request).await?;

            let status = response.status();
            let (parts, body) = response.into_parts();
            let response_bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(error) => {
                    warn!(
                        method = %method,
                        endpoint = %endpoint,
                        error = %error,
                        "Failed to capture response body"
                    );
                    Bytes::new()
                }
            };
            let response = Response::from_parts(parts, Body::from(response_bytes.clone()));

            let elapsed = started.elapsed();
            tracing::info!(
                method = %method,
                endpoint = %endpoint,
                status = status.as_u16(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Request completed"
            );

            // Fire-and-forget: a slow or failed log write never touches the
            // client-visible response.
            recorder.record(NewAuditRecord {
                method: method.to_string(),
                endpoint,
                request_headers,
                request_body: body_to_json(&request_bytes),
                response_body: body_to_json(&response_bytes),
                status_code: status.as_u16() as i32,
                created_at: Utc::now(),
            });

            Ok(response)
        })
    }
}
