//! Quill Server Library
//!
//! Multi-tenant note-taking backend.
//!
//! # Overview
//!
//! The server exposes authenticated CRUD over notes, categories, and
//! note-attached images, backed by PostgreSQL:
//!
//! - **Identity**: signed, expiring bearer tokens; every protected route is
//!   gated by the auth middleware, which injects the caller's user id into
//!   the request
//! - **Auditing**: every request/response pair is recorded asynchronously
//!   through a bounded queue of background writers; logging can never fail
//!   or delay a response
//! - **Ownership scoping**: updates, deletes, and listings are built by a
//!   statement layer that always binds the authenticated user id, so one
//!   tenant cannot see or touch another tenant's rows; a missing row and
//!   a foreign row are indistinguishable
//!
//! # Framework Stack
//!
//! - **Axum**: web framework and routing
//! - **SQLx**: PostgreSQL pool and parameterized statement execution
//! - **Tower**: middleware and service abstractions
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use quill_server::{api, audit, auth::token::TokenCodec, config::Config, db};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     let codec = Arc::new(TokenCodec::new(&config.auth));
//!     let store = Arc::new(audit::PgAuditStore::new(pool.clone()));
//!     let recorder = audit::AuditRecorder::spawn(store, &config.audit);
//!     let app = api::create_router(pool, codec, recorder, &config);
//!     # let _ = app;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod config;
pub mod db;
pub mod features;
pub mod middleware;
