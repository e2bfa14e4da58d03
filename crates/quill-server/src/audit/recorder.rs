//! Audit record queue and background writers
//!
//! Persistence is detached from the request path: the middleware enqueues
//! records onto a bounded channel and a fixed pool of worker tasks drains
//! them into an [`AuditStore`]. A full queue drops the incoming record with
//! a warning rather than blocking or failing the response. Once enqueued, a
//! write runs to completion or fails silently (surfaced only to operational
//! logs, never to the caller).

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::{mpsc, Mutex};

use super::models::NewAuditRecord;
use super::queries;
use crate::config::AuditConfig;

/// Append-only sink for audit records
///
/// A trait seam so tests can observe or fail persistence without a
/// database.
#[async_trait]
pub trait AuditStore: Send + Sync + 'static {
    async fn append(&self, record: NewAuditRecord) -> Result<(), sqlx::Error>;
}

/// Postgres-backed audit store
pub struct PgAuditStore {
    pool: PgPool,
}

impl PgAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn append(&self, record: NewAuditRecord) -> Result<(), sqlx::Error> {
        queries::append_log(&self.pool, record).await
    }
}

/// Handle used by the middleware to enqueue records
#[derive(Clone)]
pub struct AuditRecorder {
    tx: mpsc::Sender<NewAuditRecord>,
}

impl AuditRecorder {
    /// Start the worker pool and return the enqueue handle
    pub fn spawn(store: Arc<dyn AuditStore>, config: &AuditConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.queue_capacity);
        let rx = Arc::new(Mutex::new(rx));

        for worker in 0..config.workers {
            let rx = Arc::clone(&rx);
            let store = Arc::clone(&store);
            tokio::spawn(worker_loop(worker, rx, store));
        }

        tracing::debug!(
            workers = config.workers,
            queue_capacity = config.queue_capacity,
            "Audit recorder started"
        );

        Self { tx }
    }

    /// Enqueue a record without blocking
    ///
    /// Drop-newest policy: when the queue is full the incoming record is
    /// discarded and a warning is logged. The response path never waits.
    pub fn record(&self, record: NewAuditRecord) {
        match self.tx.try_send(record) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(record)) => {
                tracing::warn!(
                    method = %record.method,
                    endpoint = %record.endpoint,
                    "Audit queue full, dropping record"
                );
            }
            Err(mpsc::error::TrySendError::Closed(record)) => {
                tracing::error!(
                    method = %record.method,
                    endpoint = %record.endpoint,
                    "Audit workers stopped, dropping record"
                );
            }
        }
    }
}

async fn worker_loop(
    worker: usize,
    rx: Arc<Mutex<mpsc::Receiver<NewAuditRecord>>>,
    store: Arc<dyn AuditStore>,
) {
    loop {
        // Hold the lock only while waiting for the next record so workers
        // never serialize their store writes.
        let record = { rx.lock().await.recv().await };
        let Some(record) = record else {
            break;
        };
        if let Err(error) = store.append(record).await {
            tracing::error!(worker, error = %error, "Failed to persist request log");
        }
    }
    tracing::debug!(worker, "Audit worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStore {
        appended: AtomicUsize,
    }

    #[async_trait]
    impl AuditStore for CountingStore {
        async fn append(&self, _record: NewAuditRecord) -> Result<(), sqlx::Error> {
            self.appended.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn sample_record() -> NewAuditRecord {
        NewAuditRecord {
            method: "GET".to_string(),
            endpoint: "/health".to_string(),
            request_headers: serde_json::json!({}),
            request_body: None,
            response_body: None,
            status_code: 200,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn records_drain_to_the_store() {
        let store = Arc::new(CountingStore {
            appended: AtomicUsize::new(0),
        });
        let config = AuditConfig {
            queue_capacity: 16,
            workers: 2,
        };
        let recorder = AuditRecorder::spawn(store.clone(), &config);

        for _ in 0..5 {
            recorder.record(sample_record());
        }

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert_eq!(store.appended.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn full_queue_drops_without_blocking() {
        struct StalledStore;

        #[async_trait]
        impl AuditStore for StalledStore {
            async fn append(&self, _record: NewAuditRecord) -> Result<(), sqlx::Error> {
                std::future::pending::<()>().await;
                Ok(())
            }
        }

        let config = AuditConfig {
            queue_capacity: 1,
            workers: 1,
        };
        let recorder = AuditRecorder::spawn(Arc::new(StalledStore), &config);

        // Far more records than the queue holds; record() must return
        // immediately every time.
        for _ in 0..64 {
            recorder.record(sample_record());
        }
    }
}
