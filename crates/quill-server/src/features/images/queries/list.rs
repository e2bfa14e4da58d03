//! List images query

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::features::images::note_owned;

/// One image attached to a note
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Image {
    pub id: i64,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when listing images
#[derive(Debug, thiserror::Error)]
pub enum ListImagesError {
    #[error("Note not found or not owned by user")]
    NoteNotFoundOrNotOwned,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// List the images attached to one owned note, newest first
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    user_id: i64,
    note_id: i64,
) -> Result<Vec<Image>, ListImagesError> {
    if !note_owned(&pool, note_id, user_id).await? {
        return Err(ListImagesError::NoteNotFoundOrNotOwned);
    }

    let images = sqlx::query_as::<_, Image>(
        "SELECT id, url, created_at FROM images WHERE note_id = $1 ORDER BY created_at DESC",
    )
    .bind(note_id)
    .fetch_all(&pool)
    .await?;

    Ok(images)
}
