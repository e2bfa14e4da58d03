//! Delete image command
//!
//! Removes the database row first, then the stored file. A file that
//! cannot be removed leaves only a warning; the record is already gone.

use serde::Serialize;
use sqlx::PgPool;
use std::path::Path;

use crate::config::UploadsConfig;
use crate::features::images::note_owned;

/// Response from deleting an image
#[derive(Debug, Clone, Serialize)]
pub struct DeleteImageResponse {
    pub image_id: i64,
}

/// Errors that can occur when deleting an image
#[derive(Debug, thiserror::Error)]
pub enum DeleteImageError {
    #[error("Note not found or not owned by user")]
    NoteNotFoundOrNotOwned,
    #[error("Image not found")]
    ImageNotFound,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Delete one image attached to an owned note
#[tracing::instrument(skip(pool, uploads))]
pub async fn handle(
    pool: PgPool,
    uploads: UploadsConfig,
    user_id: i64,
    note_id: i64,
    image_id: i64,
) -> Result<DeleteImageResponse, DeleteImageError> {
    if !note_owned(&pool, note_id, user_id).await? {
        return Err(DeleteImageError::NoteNotFoundOrNotOwned);
    }

    let url: String =
        sqlx::query_scalar("SELECT url FROM images WHERE id = $1 AND note_id = $2")
            .bind(image_id)
            .bind(note_id)
            .fetch_optional(&pool)
            .await?
            .ok_or(DeleteImageError::ImageNotFound)?;

    sqlx::query("DELETE FROM images WHERE id = $1 AND note_id = $2")
        .bind(image_id)
        .bind(note_id)
        .execute(&pool)
        .await?;

    // The stored file name is the last URL segment.
    if let Some(stored_name) = url.rsplit('/').next() {
        let path = Path::new(&uploads.dir).join(stored_name);
        if let Err(error) = tokio::fs::remove_file(&path).await {
            tracing::warn!(
                image_id,
                path = %path.display(),
                error = %error,
                "Image record deleted, but file could not be removed"
            );
        }
    }

    tracing::info!(image_id, note_id, user_id, "Image deleted");

    Ok(DeleteImageResponse { image_id })
}
