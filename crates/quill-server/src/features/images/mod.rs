//! Images feature
//!
//! Images attach to notes. Every operation first checks that the parent
//! note exists, is not deleted, and belongs to the caller; the check cannot
//! tell a missing note from someone else's note. Files live in a local
//! uploads directory served statically; the database stores their public
//! URLs.

use sqlx::PgPool;

use crate::config::UploadsConfig;

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::images_routes;

/// State shared by image route handlers
#[derive(Clone)]
pub struct ImagesState {
    pub db: PgPool,
    pub uploads: UploadsConfig,
}

/// Whether `note_id` is a live note owned by `user_id`
pub(crate) async fn note_owned(
    pool: &PgPool,
    note_id: i64,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM notes WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL)",
    )
    .bind(note_id)
    .bind(user_id)
    .fetch_one(pool)
    .await
}
