//! Request audit logging
//!
//! Every request/response pair is observed by [`AuditLayer`] and persisted
//! as one row in `request_logs`. Logging is strictly best-effort: records
//! flow through a bounded queue ([`AuditRecorder`]) into background writer
//! tasks, a persistence failure is only visible in operational logs, and
//! nothing on this path can delay or alter the client's response.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use axum::Router;
//! use quill_server::audit::{AuditLayer, AuditRecorder, PgAuditStore};
//! use quill_server::config::AuditConfig;
//! use sqlx::PgPool;
//!
//! # fn example(pool: PgPool, config: AuditConfig) {
//! let recorder = AuditRecorder::spawn(Arc::new(PgAuditStore::new(pool)), &config);
//! let app: Router = Router::new().layer(AuditLayer::new(recorder));
//! # }
//! ```

mod middleware;
mod models;
mod queries;
mod recorder;

pub use middleware::AuditLayer;
pub use models::{
    body_to_json, redacted_headers, AuditRecord, NewAuditRecord, LOG_VIEW_LIMIT,
    MASKED_HEADER_VALUE,
};
pub use queries::{append_log, recent_logs};
pub use recorder::{AuditRecorder, AuditStore, PgAuditStore};
