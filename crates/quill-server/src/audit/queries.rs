//! Audit log persistence

use sqlx::PgPool;

use super::models::{AuditRecord, NewAuditRecord};

/// Append one record to the log table
pub async fn append_log(pool: &PgPool, record: NewAuditRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO request_logs \
         (method, endpoint, request_headers, request_body, response_body, status_code, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&record.method)
    .bind(&record.endpoint)
    .bind(&record.request_headers)
    .bind(&record.request_body)
    .bind(&record.response_body)
    .bind(record.status_code)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch the most recent records, newest first
pub async fn recent_logs(pool: &PgPool, limit: i64) -> Result<Vec<AuditRecord>, sqlx::Error> {
    sqlx::query_as::<_, AuditRecord>(
        "SELECT id, method, endpoint, request_headers, request_body, response_body, \
         status_code, created_at \
         FROM request_logs \
         ORDER BY created_at DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}
