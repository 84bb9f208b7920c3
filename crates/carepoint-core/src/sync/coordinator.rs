//! Flushes pending queues when connectivity returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::broadcast;

use super::{Connectivity, Notifier, SyncBackend, SyncError, SyncEvent, SyncState};
use crate::config::SyncConfig;
use crate::models::{EntityKind, StoredRecord};
use crate::store::RecordStore;

/// Result of flushing one kind: records flushed, or why the kind failed.
pub type KindOutcome = Result<usize, SyncError>;

/// Outcome of one sync pass.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub outcomes: Vec<(EntityKind, KindOutcome)>,
}

impl SyncReport {
    /// Records flushed across all successful kinds.
    pub fn flushed(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|(_, outcome)| outcome.as_ref().ok())
            .sum()
    }

    pub fn failed_kinds(&self) -> Vec<EntityKind> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| outcome.is_err())
            .map(|(kind, _)| *kind)
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|(_, outcome)| outcome.is_ok())
    }
}

/// Drives flushes of the record store's pending queues.
pub struct SyncCoordinator<B: SyncBackend> {
    store: Arc<RecordStore>,
    backend: B,
    connectivity: Connectivity,
    notifier: Notifier,
    events: broadcast::Sender<SyncEvent>,
    syncing: AtomicBool,
    flush_timeout: Option<Duration>,
}

impl<B: SyncBackend> SyncCoordinator<B> {
    pub fn new(store: Arc<RecordStore>, backend: B, config: &SyncConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            connectivity: store.connectivity().clone(),
            notifier: store.notifier().clone(),
            store,
            backend,
            events,
            syncing: AtomicBool::new(false),
            flush_timeout: config.flush_timeout(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> SyncState {
        if self.syncing.load(Ordering::SeqCst) {
            SyncState::Syncing
        } else {
            SyncState::Idle
        }
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }

    /// Record a connectivity transition. Regaining connectivity starts a
    /// sync pass and returns its report.
    pub async fn connectivity_changed(&self, online: bool) -> Option<SyncReport> {
        let was_online = self.connectivity.set(online);
        if was_online == online {
            return None;
        }

        tracing::info!(online, "Connectivity changed");
        self.emit(SyncEvent::ConnectivityChanged { online });

        if online {
            self.notifier
                .success("Connection restored", "Data will be synchronized");
            self.sync_now().await
        } else {
            self.notifier
                .warning("Working offline", "Data will sync when connection is restored");
            None
        }
    }

    /// Flush every non-empty pending queue.
    ///
    /// Returns `None` without doing anything when offline or when another
    /// pass is already running.
    pub async fn sync_now(&self) -> Option<SyncReport> {
        if !self.connectivity.is_online() {
            tracing::debug!("Offline, sync skipped");
            return None;
        }
        let Some(_guard) = SyncGuard::acquire(&self.syncing) else {
            tracing::debug!("Sync already running");
            return None;
        };

        self.emit(SyncEvent::SyncStarted);

        let mut queued = Vec::new();
        let mut outcomes = Vec::new();
        for kind in EntityKind::ALL {
            match self.store.list_pending(kind) {
                Ok(records) if records.is_empty() => {}
                Ok(records) => queued.push((kind, records)),
                Err(e) => outcomes.push((kind, Err(SyncError::from(e)))),
            }
        }

        tracing::info!(kinds = queued.len(), "Sync started");
        let flushes = join_all(
            queued
                .iter()
                .map(|(kind, records)| self.flush_kind(*kind, records)),
        )
        .await;

        for ((kind, records), outcome) in queued.iter().zip(flushes) {
            let outcome = match outcome {
                Ok(count) => self
                    .store
                    .drain_pending(*kind, &records[..count])
                    .map_err(SyncError::from),
                Err(e) => Err(e),
            };
            outcomes.push((*kind, outcome));
        }

        let report = SyncReport { outcomes };
        for (kind, outcome) in &report.outcomes {
            if let Err(e) = outcome {
                tracing::warn!(kind = kind.storage_key(), error = %e, "Flush failed");
                self.emit(SyncEvent::SyncFailed {
                    kind: *kind,
                    reason: e.to_string(),
                });
            }
        }

        if report.is_success() {
            let flushed = report.flushed();
            tracing::info!(flushed, "Sync complete");
            self.emit(SyncEvent::SyncCompleted { flushed });
            if flushed > 0 {
                self.notifier
                    .success("Sync Complete", "All data synchronized successfully");
            }
        } else {
            self.notifier
                .error("Sync Failed", "Will retry when connection improves");
        }

        Some(report)
    }

    /// Submit a queue front to back, stopping at the first failure.
    async fn flush_kind(&self, kind: EntityKind, records: &[StoredRecord]) -> KindOutcome {
        for record in records {
            let key = record.fingerprint();
            let submit = self.backend.submit(kind, record, &key);
            let result = match self.flush_timeout {
                Some(limit) => tokio::time::timeout(limit, submit)
                    .await
                    .map_err(|_| SyncError::Timeout { kind, after: limit })?,
                None => submit.await,
            };
            result.map_err(|e| SyncError::Backend {
                kind,
                reason: e.to_string(),
            })?;
            tracing::debug!(kind = kind.storage_key(), id = record.record.id(), "Flushed record");
        }
        Ok(records.len())
    }

    fn emit(&self, event: SyncEvent) {
        let _ = self.events.send(event);
    }
}

/// Holds the single-pass flag; released on drop.
struct SyncGuard<'a>(&'a AtomicBool);

impl<'a> SyncGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| SyncGuard(flag))
    }
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{EntityRecord, Patient};
    use crate::sync::SimulatedBackend;

    fn setup(online: bool) -> SyncCoordinator<SimulatedBackend> {
        let db = Database::open_in_memory().unwrap();
        let store = Arc::new(RecordStore::new(db, Connectivity::new(online), Notifier::new(16)));
        let config = SyncConfig {
            simulated_latency_ms: 0,
            ..SyncConfig::default()
        };
        SyncCoordinator::new(store, SimulatedBackend::new(Duration::ZERO), &config)
    }

    #[test]
    fn test_guard_is_exclusive() {
        let flag = AtomicBool::new(false);
        let guard = SyncGuard::acquire(&flag);
        assert!(guard.is_some());
        assert!(SyncGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(SyncGuard::acquire(&flag).is_some());
    }

    #[tokio::test]
    async fn test_sync_skipped_offline() {
        let coordinator = setup(false);
        assert!(coordinator.sync_now().await.is_none());
        assert_eq!(coordinator.state(), SyncState::Idle);
    }

    #[tokio::test]
    async fn test_reconnect_flushes_queue() {
        let coordinator = setup(false);
        coordinator
            .store
            .store(EntityRecord::Patient(Patient::new("Amar".into(), 30)))
            .unwrap();

        let mut events = coordinator.subscribe();
        let report = coordinator.connectivity_changed(true).await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.flushed(), 1);
        assert_eq!(coordinator.store.total_pending().unwrap(), 0);
        assert_eq!(coordinator.state(), SyncState::Idle);

        assert_eq!(events.try_recv().unwrap(), SyncEvent::ConnectivityChanged { online: true });
        assert_eq!(events.try_recv().unwrap(), SyncEvent::SyncStarted);
        assert_eq!(events.try_recv().unwrap(), SyncEvent::SyncCompleted { flushed: 1 });
    }

    #[tokio::test]
    async fn test_repeated_state_is_ignored() {
        let coordinator = setup(true);
        assert!(coordinator.connectivity_changed(true).await.is_none());
        assert!(coordinator.connectivity_changed(false).await.is_none());
        assert!(!coordinator.is_online());
    }
}
