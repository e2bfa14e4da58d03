//! Delete note command
//!
//! Notes are soft-deleted: the row keeps its data but gains a `deleted_at`
//! stamp and disappears from every owner-scoped read.

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;

use crate::db::statement;

/// Response from deleting a note
#[derive(Debug, Clone, Serialize)]
pub struct DeleteNoteResponse {
    pub note_id: i64,
}

/// Errors that can occur when deleting a note
#[derive(Debug, thiserror::Error)]
pub enum DeleteNoteError {
    #[error("Note not found or not owned by user")]
    NotFoundOrNotOwned,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Soft-delete one owned note
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    user_id: i64,
    note_id: i64,
) -> Result<DeleteNoteResponse, DeleteNoteError> {
    let statement = statement::note_soft_delete(note_id, user_id, Utc::now());

    let rows_affected = statement.execute(&pool).await?;

    if rows_affected == 0 {
        return Err(DeleteNoteError::NotFoundOrNotOwned);
    }

    tracing::info!(note_id, user_id, "Note deleted");

    Ok(DeleteNoteResponse { note_id })
}
