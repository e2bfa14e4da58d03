//! Upload image command

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::path::Path;
use uuid::Uuid;

use crate::config::UploadsConfig;
use crate::features::images::note_owned;

/// Command to attach an image to a note
#[derive(Debug, Clone, Deserialize)]
pub struct UploadImageCommand {
    pub filename: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

/// Response from uploading an image
#[derive(Debug, Clone, Serialize)]
pub struct UploadImageResponse {
    pub image_id: i64,
    pub url: String,
}

/// Errors that can occur when uploading an image
#[derive(Debug, thiserror::Error)]
pub enum UploadImageError {
    #[error("Note not found or not owned by user")]
    NoteNotFoundOrNotOwned,
    #[error("Image file is required")]
    FileRequired,
    #[error("Failed to store image: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl UploadImageCommand {
    pub fn validate(&self) -> Result<(), UploadImageError> {
        if self.content.is_empty() {
            return Err(UploadImageError::FileRequired);
        }
        Ok(())
    }
}

/// Keep only the final path component and characters safe for a filename
fn sanitize_filename(raw: &str) -> String {
    let name = Path::new(raw)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");

    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Store the file and record its URL against the note
#[tracing::instrument(skip(pool, uploads, command), fields(filename = %command.filename))]
pub async fn handle(
    pool: PgPool,
    uploads: UploadsConfig,
    user_id: i64,
    note_id: i64,
    command: UploadImageCommand,
) -> Result<UploadImageResponse, UploadImageError> {
    command.validate()?;

    if !note_owned(&pool, note_id, user_id).await? {
        return Err(UploadImageError::NoteNotFoundOrNotOwned);
    }

    let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(&command.filename));
    let path = Path::new(&uploads.dir).join(&stored_name);

    tokio::fs::create_dir_all(&uploads.dir).await?;
    tokio::fs::write(&path, &command.content).await?;

    let url = format!(
        "{}/uploads/{}",
        uploads.base_url.trim_end_matches('/'),
        stored_name
    );

    let image_id: i64 = sqlx::query_scalar(
        "INSERT INTO images (note_id, url, created_at) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(note_id)
    .bind(&url)
    .bind(Utc::now())
    .fetch_one(&pool)
    .await?;

    tracing::info!(image_id, note_id, user_id, "Image uploaded");

    Ok(UploadImageResponse { image_id, url })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_empty_content() {
        let command = UploadImageCommand {
            filename: "photo.png".to_string(),
            content: Vec::new(),
        };
        assert!(matches!(
            command.validate(),
            Err(UploadImageError::FileRequired)
        ));
    }

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("photo of cat.png"), "photo_of_cat.png");
        assert_eq!(sanitize_filename(""), "upload");
    }
}
