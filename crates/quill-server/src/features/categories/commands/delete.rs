//! Delete category command
//!
//! Deleting a category first unlinks the owner's notes from it, then
//! removes the row. Two single-statement operations, no transaction; each
//! statement is individually atomic and both are owner-scoped.

use serde::Serialize;
use sqlx::PgPool;

/// Response from deleting a category
#[derive(Debug, Clone, Serialize)]
pub struct DeleteCategoryResponse {
    pub id: i64,
}

/// Errors that can occur when deleting a category
#[derive(Debug, thiserror::Error)]
pub enum DeleteCategoryError {
    #[error("Category not found or not owned by user")]
    NotFoundOrNotOwned,
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Unlink and delete one owned category
#[tracing::instrument(skip(pool))]
pub async fn handle(
    pool: PgPool,
    user_id: i64,
    category_id: i64,
) -> Result<DeleteCategoryResponse, DeleteCategoryError> {
    sqlx::query("UPDATE notes SET category_id = NULL WHERE category_id = $1 AND user_id = $2")
        .bind(category_id)
        .bind(user_id)
        .execute(&pool)
        .await?;

    let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
        .bind(category_id)
        .bind(user_id)
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteCategoryError::NotFoundOrNotOwned);
    }

    tracing::info!(category_id, user_id, "Category deleted");

    Ok(DeleteCategoryResponse { id: category_id })
}
