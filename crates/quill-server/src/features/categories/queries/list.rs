//! List categories query

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// One category owned by the caller
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Errors that can occur when listing categories
#[derive(Debug, thiserror::Error)]
pub enum ListCategoriesError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// List the caller's categories
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool, user_id: i64) -> Result<Vec<Category>, ListCategoriesError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, name, created_at FROM categories WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    Ok(categories)
}
