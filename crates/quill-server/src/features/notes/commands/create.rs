//! Create note command

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::features::notes::types::Visibility;

/// Command to create a new note
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoteCommand {
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub is_favorite: bool,
    pub visibility: Option<Visibility>,
}

/// Response from creating a note
#[derive(Debug, Clone, Serialize)]
pub struct CreateNoteResponse {
    pub note_id: i64,
}

/// Errors that can occur when creating a note
#[derive(Debug, thiserror::Error)]
pub enum CreateNoteError {
    #[error("Title is required and cannot be empty")]
    TitleRequired,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateNoteCommand {
    pub fn validate(&self) -> Result<(), CreateNoteError> {
        if self.title.trim().is_empty() {
            return Err(CreateNoteError::TitleRequired);
        }
        Ok(())
    }
}

/// Insert a new note owned by `user_id`
#[tracing::instrument(skip(pool, command))]
pub async fn handle(
    pool: PgPool,
    user_id: i64,
    command: CreateNoteCommand,
) -> Result<CreateNoteResponse, CreateNoteError> {
    command.validate()?;

    let visibility = command.visibility.unwrap_or_default();
    let now = Utc::now();

    let note_id: i64 = sqlx::query_scalar(
        "INSERT INTO notes \
         (user_id, title, body, category_id, is_favorite, visibility, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING id",
    )
    .bind(user_id)
    .bind(&command.title)
    .bind(&command.body)
    .bind(command.category_id)
    .bind(command.is_favorite)
    .bind(visibility.as_str())
    .bind(now)
    .bind(now)
    .fetch_one(&pool)
    .await?;

    tracing::info!(note_id, user_id, "Note created");

    Ok(CreateNoteResponse { note_id })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_success() {
        let command = CreateNoteCommand {
            title: "Groceries".to_string(),
            body: String::new(),
            category_id: None,
            is_favorite: false,
            visibility: None,
        };
        assert!(command.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_title() {
        let command = CreateNoteCommand {
            title: "   ".to_string(),
            body: String::new(),
            category_id: None,
            is_favorite: false,
            visibility: None,
        };
        assert!(matches!(
            command.validate(),
            Err(CreateNoteError::TitleRequired)
        ));
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let command: CreateNoteCommand =
            serde_json::from_str(r#"{"title": "Just a title"}"#).unwrap();
        assert_eq!(command.title, "Just a title");
        assert_eq!(command.body, "");
        assert!(!command.is_favorite);
        assert!(command.category_id.is_none());
        assert!(command.visibility.is_none());
    }
}
