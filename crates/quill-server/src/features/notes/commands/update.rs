//! Update note command
//!
//! Partially updates one owned note. Each field is independently optional;
//! only the fields that were supplied become assignments in the generated
//! statement. A JSON `null` is treated the same as an absent field.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::db::statement::{self, NoteChange};
use crate::features::notes::types::Visibility;

/// Command to partially update an owned note
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNoteCommand {
    pub title: Option<String>,
    pub body: Option<String>,
    pub category_id: Option<i64>,
    pub is_favorite: Option<bool>,
    pub visibility: Option<Visibility>,
}

/// Response from updating a note
#[derive(Debug, Clone, Serialize)]
pub struct UpdateNoteResponse {
    pub note_id: i64,
}

/// Errors that can occur when updating a note
#[derive(Debug, thiserror::Error)]
pub enum UpdateNoteError {
    /// No field was supplied; nothing reaches the store
    #[error("No fields to update")]
    NoFieldsToUpdate,
    /// The note does not exist or belongs to someone else; the two cases
    /// are indistinguishable on purpose
    #[error("Note not found or not owned by user")]
    NotFoundOrNotOwned,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UpdateNoteCommand {
    /// Collect the supplied fields as statement changes, in field order
    pub fn into_changes(self) -> Vec<NoteChange> {
        let mut changes = Vec::new();
        if let Some(title) = self.title {
            changes.push(NoteChange::Title(title));
        }
        if let Some(body) = self.body {
            changes.push(NoteChange::Body(body));
        }
        if let Some(category_id) = self.category_id {
            changes.push(NoteChange::Category(category_id));
        }
        if let Some(is_favorite) = self.is_favorite {
            changes.push(NoteChange::Favorite(is_favorite));
        }
        if let Some(visibility) = self.visibility {
            changes.push(NoteChange::Visibility(visibility));
        }
        changes
    }
}

/// Apply a partial update to one owned note
#[tracing::instrument(skip(pool, command))]
pub async fn handle(
    pool: PgPool,
    user_id: i64,
    note_id: i64,
    command: UpdateNoteCommand,
) -> Result<UpdateNoteResponse, UpdateNoteError> {
    let statement = statement::note_update(note_id, user_id, command.into_changes(), Utc::now())
        .map_err(|_| UpdateNoteError::NoFieldsToUpdate)?;

    let rows_affected = statement.execute(&pool).await?;

    if rows_affected == 0 {
        return Err(UpdateNoteError::NotFoundOrNotOwned);
    }

    tracing::info!(note_id, user_id, "Note updated");

    Ok(UpdateNoteResponse { note_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::statement::StatementError;

    #[test]
    fn changes_follow_field_order() {
        let command = UpdateNoteCommand {
            title: Some("New title".to_string()),
            body: None,
            category_id: Some(4),
            is_favorite: Some(true),
            visibility: None,
        };

        let changes = command.into_changes();
        assert_eq!(
            changes,
            vec![
                NoteChange::Title("New title".to_string()),
                NoteChange::Category(4),
                NoteChange::Favorite(true),
            ]
        );
    }

    #[test]
    fn empty_command_produces_no_changes() {
        let command = UpdateNoteCommand::default();
        assert!(command.into_changes().is_empty());

        let result =
            statement::note_update(1, 2, UpdateNoteCommand::default().into_changes(), Utc::now());
        assert_eq!(result.unwrap_err(), StatementError::NoFieldsToUpdate);
    }

    #[test]
    fn null_fields_deserialize_as_absent() {
        let command: UpdateNoteCommand =
            serde_json::from_str(r#"{"title": null, "is_favorite": true}"#).unwrap();
        let changes = command.into_changes();
        assert_eq!(changes, vec![NoteChange::Favorite(true)]);
    }
}
