//! Remote submission seam.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{EntityKind, StoredRecord};

/// Rejection reported by the backend for one record.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct BackendError(pub String);

/// The remote API a pending record is flushed to.
#[async_trait]
pub trait SyncBackend: Send + Sync {
    /// Submit one record. `idempotency_key` is stable across retries of the
    /// same record so a retried flush does not create duplicates remotely.
    async fn submit(
        &self,
        kind: EntityKind,
        record: &StoredRecord,
        idempotency_key: &str,
    ) -> Result<(), BackendError>;
}

/// Stand-in backend: waits a fixed latency, then accepts.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    latency: Duration,
}

impl SimulatedBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl SyncBackend for SimulatedBackend {
    async fn submit(
        &self,
        kind: EntityKind,
        record: &StoredRecord,
        idempotency_key: &str,
    ) -> Result<(), BackendError> {
        tokio::time::sleep(self.latency).await;
        tracing::debug!(
            kind = kind.storage_key(),
            id = record.record.id(),
            key = idempotency_key,
            "Submitted record"
        );
        Ok(())
    }
}
