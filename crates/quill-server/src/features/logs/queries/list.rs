//! List request logs query

use sqlx::PgPool;

use crate::audit::{recent_logs, AuditRecord, LOG_VIEW_LIMIT};

/// Errors that can occur when listing request logs
#[derive(Debug, thiserror::Error)]
pub enum ListLogsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Fetch the most recent request logs
#[tracing::instrument(skip(pool))]
pub async fn handle(pool: PgPool) -> Result<Vec<AuditRecord>, ListLogsError> {
    let logs = recent_logs(&pool, LOG_VIEW_LIMIT).await?;
    Ok(logs)
}
