//! Feature modules implementing the Quill API
//!
//! Each feature is a vertical slice with its own commands, queries, and
//! routes:
//!
//! - **auth**: registration and login (token issuance)
//! - **notes**: owner-scoped note CRUD and filtered listing
//! - **categories**: owner-scoped note categories
//! - **images**: files attached to notes, gated on note ownership
//! - **logs**: public read-only request log viewer
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (create, update, delete)
//! - `queries/` - Read operations (get, list)
//! - `routes.rs` - HTTP route definitions
//! - `types.rs` - Shared types (if needed)
//!
//! Protected routes are layered with the authentication middleware here, so
//! no handler below can run without a `CurrentUser` in its extensions.

pub mod auth;
pub mod categories;
pub mod images;
pub mod logs;
pub mod notes;

use std::sync::Arc;

use axum::Router;

use crate::auth::middleware::require_auth;
use crate::auth::token::TokenCodec;
use crate::config::UploadsConfig;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// PostgreSQL connection pool
    pub db: sqlx::PgPool,
    /// Token codec used for login and the auth middleware
    pub codec: Arc<TokenCodec>,
    /// Uploaded-file storage settings
    pub uploads: UploadsConfig,
}

/// Creates the main API router with all feature routes mounted
///
/// Public surface: `/register`, `/login`, `/logs`. Everything under
/// `/notes` and `/categories` requires a bearer token.
pub fn router(state: FeatureState) -> Router {
    let auth_state = auth::AuthState {
        db: state.db.clone(),
        codec: Arc::clone(&state.codec),
    };
    let images_state = images::ImagesState {
        db: state.db.clone(),
        uploads: state.uploads.clone(),
    };

    // Image routes live under /notes/:id/images, so they share the nest.
    let notes_router = notes::notes_routes()
        .with_state(state.db.clone())
        .merge(images::images_routes().with_state(images_state));

    let protected = Router::new()
        .nest("/notes", notes_router)
        .nest(
            "/categories",
            categories::categories_routes().with_state(state.db.clone()),
        )
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state.codec),
            require_auth,
        ));

    Router::new()
        .merge(auth::auth_routes().with_state(auth_state))
        .nest("/logs", logs::logs_routes().with_state(state.db.clone()))
        .merge(protected)
}
