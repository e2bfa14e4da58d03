//! Get note query

use sqlx::PgPool;

use crate::db::statement::NOTE_COLUMNS;
use crate::features::notes::types::Note;

/// Errors that can occur when fetching a note
#[derive(Debug, thiserror::Error)]
pub enum GetNoteError {
    #[error("Note not found or not owned by user")]
    NotFoundOrNotOwned,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Fetch one owned note by id
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, user_id: i64, note_id: i64) -> Result<Note, GetNoteError> {
    let sql = format!(
        "SELECT {} FROM notes WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL",
        NOTE_COLUMNS
    );

    sqlx::query_as::<_, Note>(&sql)
        .bind(note_id)
        .bind(user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetNoteError::NotFoundOrNotOwned)
}
