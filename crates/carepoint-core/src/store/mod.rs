//! Local record store.
//!
//! Each entity kind has a full list and a pending queue, both stored as JSON
//! under fixed keys. Every write is a read-modify-write of whole lists inside
//! one transaction, so a failed write leaves both lists as they were.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

use crate::db::{Database, DbError, StorageUsage};
use crate::models::{EntityKind, EntityRecord, Patient, Prescription, RecordError, StoredRecord};
use crate::sync::{Connectivity, Notifier};

/// Record store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Database(#[from] DbError),

    #[error("Invalid record: {0}")]
    Invalid(#[from] RecordError),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Lock poisoned")]
    LockPoisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable per-kind record lists with offline pending queues.
pub struct RecordStore {
    db: Mutex<Database>,
    connectivity: Connectivity,
    notifier: Notifier,
}

impl RecordStore {
    pub fn new(db: Database, connectivity: Connectivity, notifier: Notifier) -> Self {
        Self {
            db: Mutex::new(db),
            connectivity,
            notifier,
        }
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Validate and persist a record.
    ///
    /// While offline the record is also queued for the next flush.
    pub fn store(&self, record: EntityRecord) -> StoreResult<StoredRecord> {
        record.validate()?;

        let kind = record.kind();
        let online = self.connectivity.is_online();
        let stored = StoredRecord::new(record, !online);

        let written = self.with_db(|db| {
            db.atomically(|db| {
                if kind.is_snapshot() {
                    db.set_json(kind.storage_key(), &stored)?;
                } else {
                    let mut all = read_list(db, kind.storage_key())?;
                    all.push(stored.clone());
                    db.set_json(kind.storage_key(), &all)?;
                }
                if !online {
                    let mut pending = read_list(db, kind.pending_key())?;
                    pending.push(stored.clone());
                    db.set_json(kind.pending_key(), &pending)?;
                }
                Ok(())
            })
            .map_err(StoreError::from)
        });

        if let Err(e) = written {
            tracing::warn!(kind = kind.storage_key(), error = %e, "Failed to store record");
            self.notifier.error(
                "Storage Error",
                &format!("{} could not be saved: {}", kind.label(), e),
            );
            return Err(e);
        }

        tracing::debug!(kind = kind.storage_key(), id = stored.record.id(), pending = !online, "Stored record");
        if !online {
            let (title, message) = offline_notice(kind);
            self.notifier.info(&title, message);
        }
        Ok(stored)
    }

    /// Every stored record of a kind, in insertion order.
    pub fn list_all(&self, kind: EntityKind) -> StoreResult<Vec<StoredRecord>> {
        self.with_db(|db| {
            if kind.is_snapshot() {
                let snapshot: Option<StoredRecord> = db.get_json(kind.storage_key())?;
                Ok(snapshot.into_iter().collect())
            } else {
                Ok(read_list(db, kind.storage_key())?)
            }
        })
    }

    /// Records of a kind waiting to be flushed, in insertion order.
    pub fn list_pending(&self, kind: EntityKind) -> StoreResult<Vec<StoredRecord>> {
        self.with_db(|db| Ok(read_list(db, kind.pending_key())?))
    }

    /// Pending queue length per kind.
    pub fn pending_counts(&self) -> StoreResult<HashMap<EntityKind, usize>> {
        self.with_db(|db| {
            let mut counts = HashMap::new();
            for kind in EntityKind::ALL {
                counts.insert(kind, read_list(db, kind.pending_key())?.len());
            }
            Ok(counts)
        })
    }

    pub fn total_pending(&self) -> StoreResult<usize> {
        Ok(self.pending_counts()?.values().sum())
    }

    /// Remove flushed records from a pending queue.
    ///
    /// Each flushed record removes the first queued entry with the same
    /// fingerprint. Entries queued or rewritten after the flush read the
    /// queue no longer match and survive.
    pub fn drain_pending(&self, kind: EntityKind, flushed: &[StoredRecord]) -> StoreResult<usize> {
        let mut sent: Vec<String> = flushed.iter().map(StoredRecord::fingerprint).collect();
        self.with_db(|db| {
            db.atomically(|db| {
                let mut pending = read_list(db, kind.pending_key())?;
                let before = pending.len();
                pending.retain(|queued| {
                    let fingerprint = queued.fingerprint();
                    match sent.iter().position(|f| *f == fingerprint) {
                        Some(i) => {
                            sent.swap_remove(i);
                            false
                        }
                        None => true,
                    }
                });
                db.set_json(kind.pending_key(), &pending)?;
                Ok(before - pending.len())
            })
            .map_err(StoreError::from)
        })
    }

    /// Remove every list and queue.
    pub fn clear_all(&self) -> StoreResult<()> {
        self.with_db(|db| {
            db.atomically(|db| {
                for kind in EntityKind::ALL {
                    db.remove_item(kind.storage_key())?;
                    db.remove_item(kind.pending_key())?;
                }
                Ok(())
            })
            .map_err(StoreError::from)
        })?;

        tracing::info!("Cleared all local records");
        self.notifier
            .info("Offline Data Cleared", "All local data has been removed");
        Ok(())
    }

    pub fn storage_usage(&self) -> StoreResult<StorageUsage> {
        self.with_db(|db| Ok(db.storage_usage()?))
    }

    /// All stored patients.
    pub fn patients(&self) -> StoreResult<Vec<Patient>> {
        Ok(self
            .list_all(EntityKind::Patients)?
            .iter()
            .filter_map(|r| r.record.as_patient().cloned())
            .collect())
    }

    /// All stored prescriptions.
    pub fn prescriptions(&self) -> StoreResult<Vec<Prescription>> {
        Ok(self
            .list_all(EntityKind::Prescriptions)?
            .iter()
            .filter_map(|r| r.record.as_prescription().cloned())
            .collect())
    }

    /// Replace a stored patient with an updated copy.
    ///
    /// A queued copy is refreshed in place; while offline a patient that is
    /// not queued yet gets queued.
    pub fn update_patient(&self, patient: Patient) -> StoreResult<StoredRecord> {
        let record = EntityRecord::Patient(patient);
        record.validate()?;

        let id = record.id().to_string();
        let online = self.connectivity.is_online();
        let key = EntityKind::Patients.storage_key();
        let pending_key = EntityKind::Patients.pending_key();

        self.with_db(|db| {
            db.atomically(|db| {
                let mut all = read_list(db, key)?;
                let Some(slot) = all.iter_mut().find(|r| r.record.id() == id) else {
                    return Err(DbError::NotFound(id.clone()));
                };
                slot.record = record.clone();
                slot.pending_sync = slot.pending_sync || !online;
                let updated = slot.clone();
                db.set_json(key, &all)?;

                let mut pending = read_list(db, pending_key)?;
                match pending.iter_mut().find(|r| r.record.id() == id) {
                    Some(queued) => queued.record = record.clone(),
                    None if !online => pending.push(updated.clone()),
                    None => return Ok(updated),
                }
                db.set_json(pending_key, &pending)?;
                Ok(updated)
            })
            .map_err(|e| match e {
                DbError::NotFound(id) => StoreError::NotFound(id),
                other => StoreError::from(other),
            })
        })
    }

    fn with_db<T>(&self, f: impl FnOnce(&Database) -> StoreResult<T>) -> StoreResult<T> {
        let db = self.db.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&db)
    }
}

fn read_list(db: &Database, key: &str) -> Result<Vec<StoredRecord>, DbError> {
    Ok(db.get_json(key)?.unwrap_or_default())
}

fn offline_notice(kind: EntityKind) -> (String, &'static str) {
    match kind {
        EntityKind::Patients => ("Patient Registered Offline".into(), "Data will sync when online"),
        EntityKind::Prescriptions => ("Prescription Saved Offline".into(), "Will sync when online"),
        other => (format!("{} Saved Offline", other.label()), "Will sync when online"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Medication, PharmacySnapshot, PharmacyStock};
    use crate::sync::NoticeLevel;

    fn setup_store(online: bool) -> RecordStore {
        let db = Database::open_in_memory().unwrap();
        RecordStore::new(db, Connectivity::new(online), Notifier::new(16))
    }

    fn patient(name: &str) -> EntityRecord {
        EntityRecord::Patient(Patient::new(name.into(), 30))
    }

    #[test]
    fn test_online_store_skips_pending() {
        let store = setup_store(true);
        let stored = store.store(patient("Amar")).unwrap();

        assert!(!stored.pending_sync);
        assert_eq!(store.list_all(EntityKind::Patients).unwrap().len(), 1);
        assert!(store.list_pending(EntityKind::Patients).unwrap().is_empty());
    }

    #[test]
    fn test_offline_store_queues_and_notifies() {
        let store = setup_store(false);
        let mut notices = store.notifier().subscribe();

        let stored = store.store(patient("Amar")).unwrap();
        assert!(stored.pending_sync);

        assert_eq!(store.list_all(EntityKind::Patients).unwrap(), vec![stored.clone()]);
        assert_eq!(store.list_pending(EntityKind::Patients).unwrap(), vec![stored]);

        let notice = notices.try_recv().unwrap();
        assert_eq!(notice.title, "Patient Registered Offline");
        assert_eq!(notice.level, NoticeLevel::Info);
    }

    #[test]
    fn test_insertion_order_and_stable_reads() {
        let store = setup_store(true);
        for name in ["A", "B", "C"] {
            store.store(patient(name)).unwrap();
        }

        let first = store.list_all(EntityKind::Patients).unwrap();
        let second = store.list_all(EntityKind::Patients).unwrap();
        assert_eq!(first, second);

        let names: Vec<_> = store.patients().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_invalid_record_rejected() {
        let store = setup_store(false);
        let result = store.store(patient("  "));

        assert!(matches!(result, Err(StoreError::Invalid(_))));
        assert!(store.list_all(EntityKind::Patients).unwrap().is_empty());
        assert_eq!(store.total_pending().unwrap(), 0);
    }

    #[test]
    fn test_pharmacy_snapshot_replaced() {
        let store = setup_store(false);
        let stock = vec![PharmacyStock::new("1".into(), "Paracetamol 500mg".into(), 150, 50)];
        store.store(EntityRecord::Pharmacy(PharmacySnapshot::new(stock.clone()))).unwrap();
        store.store(EntityRecord::Pharmacy(PharmacySnapshot::new(stock))).unwrap();

        assert_eq!(store.list_all(EntityKind::Pharmacy).unwrap().len(), 1);
        assert_eq!(store.list_pending(EntityKind::Pharmacy).unwrap().len(), 2);
    }

    #[test]
    fn test_quota_failure_surfaces_error() {
        let db = Database::open_in_memory().unwrap().with_quota(64);
        let store = RecordStore::new(db, Connectivity::new(false), Notifier::new(16));
        let mut notices = store.notifier().subscribe();

        let result = store.store(patient("Amar"));
        assert!(matches!(result, Err(StoreError::Database(DbError::QuotaExceeded { .. }))));
        assert!(store.list_all(EntityKind::Patients).unwrap().is_empty());
        assert!(store.list_pending(EntityKind::Patients).unwrap().is_empty());
        assert_eq!(notices.try_recv().unwrap().level, NoticeLevel::Error);
    }

    #[test]
    fn test_drain_keeps_later_entries() {
        let store = setup_store(false);
        for name in ["A", "B", "C"] {
            store.store(patient(name)).unwrap();
        }
        let snapshot = store.list_pending(EntityKind::Patients).unwrap();

        assert_eq!(store.drain_pending(EntityKind::Patients, &snapshot[..2]).unwrap(), 2);
        let left = store.list_pending(EntityKind::Patients).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].record.as_patient().unwrap().name, "C");

        // Already drained records match nothing
        assert_eq!(store.drain_pending(EntityKind::Patients, &snapshot[..2]).unwrap(), 0);
        assert_eq!(store.drain_pending(EntityKind::Patients, &snapshot).unwrap(), 1);
        assert_eq!(store.list_all(EntityKind::Patients).unwrap().len(), 3);
    }

    #[test]
    fn test_drain_keeps_rewritten_entry() {
        let store = setup_store(false);
        let stored = store.store(patient("Amar")).unwrap();
        let snapshot = store.list_pending(EntityKind::Patients).unwrap();

        let mut updated = stored.record.as_patient().unwrap().clone();
        updated.start_consultation().unwrap();
        store.update_patient(updated.clone()).unwrap();

        assert_eq!(store.drain_pending(EntityKind::Patients, &snapshot).unwrap(), 0);
        let left = store.list_pending(EntityKind::Patients).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].record.as_patient(), Some(&updated));
    }

    #[test]
    fn test_pending_counts() {
        let store = setup_store(false);
        store.store(patient("A")).unwrap();
        let rx = Prescription::new(
            "p-1".into(),
            "Fever".into(),
            String::new(),
            vec![Medication::new("Paracetamol 500mg".into(), 10)],
        );
        store.store(EntityRecord::Prescription(rx)).unwrap();

        let counts = store.pending_counts().unwrap();
        assert_eq!(counts[&EntityKind::Patients], 1);
        assert_eq!(counts[&EntityKind::Prescriptions], 1);
        assert_eq!(counts[&EntityKind::Appointments], 0);
        assert_eq!(store.total_pending().unwrap(), 2);
        assert_eq!(store.prescriptions().unwrap().len(), 1);
    }

    #[test]
    fn test_clear_all() {
        let store = setup_store(false);
        store.store(patient("A")).unwrap();
        store.clear_all().unwrap();

        assert!(store.list_all(EntityKind::Patients).unwrap().is_empty());
        assert_eq!(store.total_pending().unwrap(), 0);
        assert_eq!(store.storage_usage().unwrap().used, 0);
    }

    #[test]
    fn test_update_patient() {
        let store = setup_store(true);
        let stored = store.store(patient("Amar")).unwrap();
        let mut updated = stored.record.as_patient().unwrap().clone();
        updated.start_consultation().unwrap();

        store.update_patient(updated.clone()).unwrap();
        assert_eq!(store.patients().unwrap(), vec![updated.clone()]);
        assert!(store.list_pending(EntityKind::Patients).unwrap().is_empty());

        store.connectivity().set(false);
        updated.complete().unwrap();
        let record = store.update_patient(updated).unwrap();
        assert!(record.pending_sync);
        assert_eq!(store.list_pending(EntityKind::Patients).unwrap().len(), 1);
    }

    #[test]
    fn test_update_unknown_patient() {
        let store = setup_store(true);
        let result = store.update_patient(Patient::new("Ghost".into(), 20));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}
