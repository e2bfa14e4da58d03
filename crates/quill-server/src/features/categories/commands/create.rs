//! Create category command

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Command to create a category
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategoryCommand {
    pub name: String,
}

/// Response from creating a category
#[derive(Debug, Clone, Serialize)]
pub struct CreateCategoryResponse {
    pub id: i64,
    pub name: String,
}

/// Errors that can occur when creating a category
#[derive(Debug, thiserror::Error)]
pub enum CreateCategoryError {
    #[error("Name is required and cannot be empty")]
    NameRequired,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CreateCategoryCommand {
    pub fn validate(&self) -> Result<(), CreateCategoryError> {
        if self.name.trim().is_empty() {
            return Err(CreateCategoryError::NameRequired);
        }
        Ok(())
    }
}

/// Insert a category owned by `user_id`
#[tracing::instrument(skip(pool, command))]
pub async fn handle(
    pool: PgPool,
    user_id: i64,
    command: CreateCategoryCommand,
) -> Result<CreateCategoryResponse, CreateCategoryError> {
    command.validate()?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO categories (user_id, name) VALUES ($1, $2) RETURNING id",
    )
    .bind(user_id)
    .bind(&command.name)
    .fetch_one(&pool)
    .await?;

    tracing::info!(category_id = id, user_id, "Category created");

    Ok(CreateCategoryResponse {
        id,
        name: command.name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_success() {
        let command = CreateCategoryCommand {
            name: "Work".to_string(),
        };
        assert!(command.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_name() {
        let command = CreateCategoryCommand {
            name: " ".to_string(),
        };
        assert!(matches!(
            command.validate(),
            Err(CreateCategoryError::NameRequired)
        ));
    }
}
