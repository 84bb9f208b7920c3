//! Carepoint Core Library
//!
//! Offline-first core for a rural hospital front-end.
//!
//! # Architecture
//!
//! ```text
//! Intake form → validate → TriageScorer ─► score, priority, wait, schemes
//!                               │
//!                        RecordStore.store
//!                   ┌───────────┴───────────┐
//!                   │ online                │ offline
//!                   ▼                       ▼
//!              full list            full list + pending queue
//!                                           │
//!                           connectivity regained
//!                                           ▼
//!                           SyncCoordinator flush → SyncBackend
//!
//! AssetCache (separate worker): install → activate → fetch interception
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, Prescription, PharmacyStock, EntityRecord, etc.)
//! - [`db`]: SQLite key/value storage with quota, plus asset cache tables
//! - [`store`]: Per-kind record lists with offline pending queues
//! - [`sync`]: Connectivity, notices, and the flush coordinator
//! - [`triage`]: Lookup-table triage scorer and consultation queue
//! - [`pharmacy`]: Inventory status and demand prediction
//! - [`reference`]: Health schemes and hospital directory
//! - [`cache`]: Page asset cache worker
//! - [`config`]: TOML configuration

pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod pharmacy;
pub mod reference;
pub mod store;
pub mod sync;
pub mod triage;

// Re-export commonly used types
pub use cache::{AssetCache, AssetRequest, AssetResponse, FetchOutcome, Fetcher, WorkerState};
pub use config::CoreConfig;
pub use db::Database;
pub use models::{
    EntityKind, EntityRecord, Language, Patient, PatientIntake, PharmacyStock, Prescription,
    Priority, StoredRecord,
};
pub use pharmacy::PharmacyManager;
pub use store::RecordStore;
pub use sync::{Connectivity, Notice, Notifier, SimulatedBackend, SyncBackend, SyncCoordinator};
pub use triage::{TriageQueue, TriageResult, TriageScorer};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "carepoint_core=info";

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum CarepointError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Runtime error: {0}")]
    RuntimeError(String),
}

impl From<db::DbError> for CarepointError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(id) => CarepointError::NotFound(id),
            other => CarepointError::DatabaseError(other.to_string()),
        }
    }
}

impl From<store::StoreError> for CarepointError {
    fn from(e: store::StoreError) -> Self {
        match e {
            store::StoreError::Database(e) => e.into(),
            store::StoreError::Invalid(e) => CarepointError::InvalidInput(e.to_string()),
            store::StoreError::NotFound(id) => CarepointError::NotFound(id),
            store::StoreError::LockPoisoned => {
                CarepointError::DatabaseError("Lock poisoned".into())
            }
        }
    }
}

impl From<serde_json::Error> for CarepointError {
    fn from(e: serde_json::Error) -> Self {
        CarepointError::SerializationError(e.to_string())
    }
}

impl From<config::ConfigError> for CarepointError {
    fn from(e: config::ConfigError) -> Self {
        CarepointError::ConfigError(e.to_string())
    }
}

impl From<models::ValidationError> for CarepointError {
    fn from(e: models::ValidationError) -> Self {
        CarepointError::InvalidInput(e.to_string())
    }
}

impl From<models::StatusError> for CarepointError {
    fn from(e: models::StatusError) -> Self {
        CarepointError::InvalidInput(e.to_string())
    }
}

impl From<pharmacy::PharmacyError> for CarepointError {
    fn from(e: pharmacy::PharmacyError) -> Self {
        CarepointError::NotFound(e.to_string())
    }
}

impl From<std::io::Error> for CarepointError {
    fn from(e: std::io::Error) -> Self {
        CarepointError::RuntimeError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for CarepointError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        CarepointError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install the global tracing subscriber. Later calls are no-ops.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(
    path: String,
    config_toml: Option<String>,
) -> Result<Arc<CarepointCore>, CarepointError> {
    let config = match config_toml {
        Some(text) => CoreConfig::from_toml_str(&text)?,
        None => CoreConfig::default(),
    };
    let db = Database::open(&path)?;
    CarepointCore::build(db, config)
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<CarepointCore>, CarepointError> {
    let db = Database::open_in_memory()?;
    CarepointCore::build(db, CoreConfig::default())
}

// =========================================================================
// Main API Object
// =========================================================================

/// Process-scoped services for one UI shell.
#[derive(uniffi::Object)]
pub struct CarepointCore {
    runtime: tokio::runtime::Runtime,
    store: Arc<RecordStore>,
    scorer: TriageScorer,
    coordinator: SyncCoordinator<SimulatedBackend>,
    pharmacy: Mutex<PharmacyManager>,
    notices: Mutex<broadcast::Receiver<Notice>>,
}

impl CarepointCore {
    fn build(db: Database, config: CoreConfig) -> Result<Arc<Self>, CarepointError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        let notifier = Notifier::new(config.sync.event_capacity);
        let notices = notifier.subscribe();
        let db = db.with_quota(config.storage.quota_bytes);
        let store = Arc::new(RecordStore::new(db, Connectivity::default(), notifier));

        let mut pharmacy = match store.list_all(EntityKind::Pharmacy)?.pop() {
            Some(StoredRecord {
                record: EntityRecord::Pharmacy(snapshot),
                ..
            }) => PharmacyManager::from_snapshot(snapshot),
            _ => PharmacyManager::default(),
        };
        for rx in store.prescriptions()? {
            pharmacy.add_prescription_to_history(rx);
        }

        let backend = SimulatedBackend::new(config.sync.simulated_latency());
        let coordinator = SyncCoordinator::new(store.clone(), backend, &config.sync);

        tracing::info!(quota = config.storage.quota_bytes, "Carepoint core ready");

        Ok(Arc::new(Self {
            runtime,
            store,
            scorer: TriageScorer::new(),
            coordinator,
            pharmacy: Mutex::new(pharmacy),
            notices: Mutex::new(notices),
        }))
    }

    fn find_patient(&self, patient_id: &str) -> Result<Patient, CarepointError> {
        self.store
            .patients()?
            .into_iter()
            .find(|p| p.id == patient_id)
            .ok_or_else(|| CarepointError::NotFound(format!("patient {}", patient_id)))
    }

    fn persist_pharmacy(&self, pharmacy: &PharmacyManager) -> Result<(), CarepointError> {
        self.store.store(EntityRecord::Pharmacy(pharmacy.snapshot()))?;
        Ok(())
    }
}

#[uniffi::export]
impl CarepointCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Validate an intake form, triage the patient and store the record.
    pub fn register_patient(
        &self,
        intake: FfiPatientIntake,
    ) -> Result<FfiRegistration, CarepointError> {
        let online = self.coordinator.is_online();
        let mut patient = PatientIntake::from(intake).into_patient(online)?;

        let triage = self.scorer.score(&patient);
        patient.apply_triage(triage.score, triage.priority);
        self.store.store(EntityRecord::Patient(patient.clone()))?;

        tracing::info!(patient = %patient.id, priority = triage.priority.as_str(), online, "Patient registered");
        Ok(FfiRegistration {
            patient: patient.into(),
            triage: triage.into(),
        })
    }

    /// Score an arbitrary symptom/history set without storing anything.
    pub fn preview_triage(
        &self,
        age: u32,
        symptoms: Vec<String>,
        medical_history: Vec<String>,
    ) -> FfiTriageResult {
        let mut patient = Patient::new(String::new(), age);
        patient.current_symptoms = symptoms;
        patient.medical_history = medical_history;
        self.scorer.score(&patient).into()
    }

    /// All patients, in registration order.
    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, CarepointError> {
        Ok(self.store.patients()?.into_iter().map(Into::into).collect())
    }

    /// Patients registered with an email (the patient dashboard view).
    pub fn patients_by_email(&self, email: String) -> Result<Vec<FfiPatient>, CarepointError> {
        Ok(self
            .store
            .patients()?
            .into_iter()
            .filter(|p| p.has_email(&email))
            .map(Into::into)
            .collect())
    }

    /// Patients still to be seen, most urgent first.
    pub fn consultation_queue(&self) -> Result<Vec<FfiPatient>, CarepointError> {
        let queue = TriageQueue::new(self.store.patients()?);
        Ok(queue.into_vec().into_iter().map(Into::into).collect())
    }

    pub fn start_consultation(&self, patient_id: String) -> Result<FfiPatient, CarepointError> {
        let mut patient = self.find_patient(&patient_id)?;
        patient.start_consultation()?;
        self.store.update_patient(patient.clone())?;
        Ok(patient.into())
    }

    pub fn complete_consultation(&self, patient_id: String) -> Result<FfiPatient, CarepointError> {
        let mut patient = self.find_patient(&patient_id)?;
        patient.complete()?;
        self.store.update_patient(patient.clone())?;
        Ok(patient.into())
    }

    // =========================================================================
    // Prescription Operations
    // =========================================================================

    /// Issue and store a prescription; it also feeds pharmacy demand.
    pub fn issue_prescription(
        &self,
        patient_id: String,
        diagnosis: String,
        instructions: String,
        medications: Vec<FfiMedication>,
    ) -> Result<FfiPrescription, CarepointError> {
        self.find_patient(&patient_id)?;
        let medications = medications.into_iter().map(Into::into).collect();
        let prescription = Prescription::new(patient_id, diagnosis, instructions, medications);

        self.store
            .store(EntityRecord::Prescription(prescription.clone()))?;
        self.pharmacy
            .lock()?
            .add_prescription_to_history(prescription.clone());
        Ok(prescription.into())
    }

    pub fn prescriptions_for(&self, patient_id: String) -> Result<Vec<FfiPrescription>, CarepointError> {
        Ok(self
            .store
            .prescriptions()?
            .into_iter()
            .filter(|rx| rx.patient_id == patient_id)
            .map(Into::into)
            .collect())
    }

    // =========================================================================
    // Appointment Operations
    // =========================================================================

    /// Book a visit at a directory hospital. Returns the appointment id.
    pub fn book_appointment(
        &self,
        patient_id: String,
        hospital_id: String,
        scheduled_at: String,
        reason: Option<String>,
    ) -> Result<String, CarepointError> {
        if reference::hospital(&hospital_id).is_none() {
            return Err(CarepointError::NotFound(format!("hospital {}", hospital_id)));
        }
        let mut appointment = models::Appointment::new(patient_id, hospital_id, scheduled_at);
        appointment.reason = reason;
        let id = appointment.id.clone();
        self.store.store(EntityRecord::Appointment(appointment))?;
        Ok(id)
    }

    // =========================================================================
    // Pharmacy Operations
    // =========================================================================

    pub fn pharmacy_stock(&self) -> Result<Vec<FfiStock>, CarepointError> {
        let pharmacy = self.pharmacy.lock()?;
        Ok(pharmacy.stock().iter().cloned().map(Into::into).collect())
    }

    /// Set an item's on-hand quantity and persist the new inventory.
    pub fn update_stock(&self, medication_id: String, quantity: u32) -> Result<FfiStock, CarepointError> {
        let mut pharmacy = self.pharmacy.lock()?;
        let item = pharmacy.update_stock(&medication_id, quantity)?.clone();
        self.persist_pharmacy(&pharmacy)?;
        Ok(item.into())
    }

    /// Recompute demand predictions from recent prescriptions.
    pub fn analyze_demand(&self) -> Result<Vec<FfiStock>, CarepointError> {
        let mut pharmacy = self.pharmacy.lock()?;
        let stock: Vec<FfiStock> = pharmacy
            .analyze_demand()
            .iter()
            .cloned()
            .map(Into::into)
            .collect();
        self.persist_pharmacy(&pharmacy)?;
        Ok(stock)
    }

    pub fn critical_stock_alerts(&self) -> Result<Vec<FfiStock>, CarepointError> {
        let pharmacy = self.pharmacy.lock()?;
        Ok(pharmacy
            .critical_alerts()
            .into_iter()
            .cloned()
            .map(Into::into)
            .collect())
    }

    // =========================================================================
    // Sync Operations
    // =========================================================================

    /// Report a connectivity change from the host. Regaining connectivity
    /// runs a sync pass before returning.
    pub fn set_online(&self, online: bool) -> Option<FfiSyncReport> {
        self.runtime
            .block_on(self.coordinator.connectivity_changed(online))
            .map(Into::into)
    }

    /// Manual "sync now". `None` when offline or already syncing.
    pub fn sync_now(&self) -> Option<FfiSyncReport> {
        self.runtime
            .block_on(self.coordinator.sync_now())
            .map(Into::into)
    }

    pub fn sync_status(&self) -> Result<FfiSyncStatus, CarepointError> {
        let counts = self.store.pending_counts()?;
        let count = |kind: EntityKind| counts.get(&kind).copied().unwrap_or(0) as u32;
        Ok(FfiSyncStatus {
            online: self.coordinator.is_online(),
            syncing: self.coordinator.state() == sync::SyncState::Syncing,
            pending_patients: count(EntityKind::Patients),
            pending_prescriptions: count(EntityKind::Prescriptions),
            pending_appointments: count(EntityKind::Appointments),
            pending_pharmacy: count(EntityKind::Pharmacy),
        })
    }

    /// The manual "clear all local data" action.
    pub fn clear_local_data(&self) -> Result<(), CarepointError> {
        Ok(self.store.clear_all()?)
    }

    pub fn storage_usage(&self) -> Result<FfiStorageUsage, CarepointError> {
        let usage = self.store.storage_usage()?;
        Ok(FfiStorageUsage {
            used_bytes: usage.used,
            available_bytes: usage.available,
        })
    }

    /// Notices published since the last call, oldest first.
    pub fn drain_notices(&self) -> Result<Vec<FfiNotice>, CarepointError> {
        let mut rx = self.notices.lock()?;
        let mut notices = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(notice) => notices.push(notice.into()),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notice receiver lagged");
                }
                Err(_) => break,
            }
        }
        Ok(notices)
    }

    // =========================================================================
    // Reference Data
    // =========================================================================

    /// Health schemes in the requested language ("en" or "pa").
    pub fn health_schemes(&self, language: String) -> Vec<FfiScheme> {
        let language = Language::from_code(&language).unwrap_or_default();
        reference::health_schemes()
            .iter()
            .map(|s| FfiScheme::localized(s, language))
            .collect()
    }

    pub fn hospitals(&self) -> Vec<FfiHospital> {
        reference::hospitals().iter().map(Into::into).collect()
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe intake form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientIntake {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub symptoms: String,
    pub medical_history: String,
}

impl From<FfiPatientIntake> for PatientIntake {
    fn from(intake: FfiPatientIntake) -> Self {
        PatientIntake {
            name: intake.name,
            email: intake.email,
            phone: intake.phone,
            age: intake.age,
            symptoms: intake.symptoms,
            medical_history: intake.medical_history,
        }
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub current_symptoms: Vec<String>,
    pub medical_history: Vec<String>,
    pub triage_score: u8,
    pub priority: String,
    pub appointment_time: String,
    pub status: String,
    pub is_online: bool,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            email: patient.email,
            phone: patient.phone,
            age: patient.age,
            current_symptoms: patient.current_symptoms,
            medical_history: patient.medical_history,
            triage_score: patient.triage_score,
            priority: patient.priority.as_str().to_string(),
            appointment_time: patient.appointment_time,
            status: format!("{:?}", patient.status),
            is_online: patient.is_online,
        }
    }
}

/// FFI-safe triage result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTriageResult {
    pub score: u8,
    pub priority: String,
    pub recommended_action: String,
    pub estimated_wait_minutes: u32,
    pub recommended_scheme_ids: Vec<String>,
}

impl From<TriageResult> for FfiTriageResult {
    fn from(result: TriageResult) -> Self {
        Self {
            score: result.score,
            priority: result.priority.as_str().to_string(),
            recommended_action: result.recommended_action,
            estimated_wait_minutes: result.estimated_wait_minutes,
            recommended_scheme_ids: result
                .recommended_schemes
                .iter()
                .map(|s| s.id.to_string())
                .collect(),
        }
    }
}

/// FFI-safe registration outcome.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRegistration {
    pub patient: FfiPatient,
    pub triage: FfiTriageResult,
}

/// FFI-safe medication line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub quantity: u32,
}

impl From<FfiMedication> for models::Medication {
    fn from(med: FfiMedication) -> Self {
        let mut medication = models::Medication::new(med.name, med.quantity);
        medication.dosage = med.dosage;
        medication.frequency = med.frequency;
        medication.duration = med.duration;
        medication
    }
}

impl From<models::Medication> for FfiMedication {
    fn from(med: models::Medication) -> Self {
        Self {
            name: med.name,
            dosage: med.dosage,
            frequency: med.frequency,
            duration: med.duration,
            quantity: med.quantity,
        }
    }
}

/// FFI-safe prescription.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescription {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub diagnosis: String,
    pub instructions: String,
    pub date_issued: String,
    pub medications: Vec<FfiMedication>,
    pub status: String,
}

impl From<Prescription> for FfiPrescription {
    fn from(rx: Prescription) -> Self {
        Self {
            id: rx.id,
            patient_id: rx.patient_id,
            doctor_id: rx.doctor_id,
            diagnosis: rx.diagnosis,
            instructions: rx.instructions,
            date_issued: rx.date_issued,
            medications: rx.medications.into_iter().map(Into::into).collect(),
            status: format!("{:?}", rx.status),
        }
    }
}

/// FFI-safe stock line.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStock {
    pub medication_id: String,
    pub name: String,
    pub current_stock: u32,
    pub minimum_stock: u32,
    pub demand_prediction: u32,
    pub last_restocked: String,
    pub status: String,
}

impl From<PharmacyStock> for FfiStock {
    fn from(stock: PharmacyStock) -> Self {
        Self {
            medication_id: stock.medication_id,
            name: stock.name,
            current_stock: stock.current_stock,
            minimum_stock: stock.minimum_stock,
            demand_prediction: stock.demand_prediction,
            last_restocked: stock.last_restocked,
            status: stock.status.as_str().to_string(),
        }
    }
}

/// FFI-safe sync pass summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSyncReport {
    pub flushed: u32,
    pub failed_kinds: Vec<String>,
}

impl From<sync::SyncReport> for FfiSyncReport {
    fn from(report: sync::SyncReport) -> Self {
        Self {
            flushed: report.flushed() as u32,
            failed_kinds: report
                .failed_kinds()
                .iter()
                .map(|k| k.storage_key().to_string())
                .collect(),
        }
    }
}

/// FFI-safe connectivity and queue status.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSyncStatus {
    pub online: bool,
    pub syncing: bool,
    pub pending_patients: u32,
    pub pending_prescriptions: u32,
    pub pending_appointments: u32,
    pub pending_pharmacy: u32,
}

/// FFI-safe storage usage.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStorageUsage {
    pub used_bytes: u64,
    pub available_bytes: u64,
}

/// FFI-safe notice.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotice {
    pub title: String,
    pub message: String,
    pub level: String,
}

impl From<Notice> for FfiNotice {
    fn from(notice: Notice) -> Self {
        Self {
            title: notice.title,
            message: notice.message,
            level: format!("{:?}", notice.level).to_lowercase(),
        }
    }
}

/// FFI-safe health scheme, already localized.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiScheme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub eligibility: String,
    pub benefits: String,
    pub category: String,
}

impl FfiScheme {
    fn localized(scheme: &models::HealthScheme, language: Language) -> Self {
        let (eligibility, benefits) = match language {
            Language::English => (scheme.eligibility, scheme.benefits),
            Language::Punjabi => (scheme.eligibility_pa, scheme.benefits_pa),
        };
        Self {
            id: scheme.id.to_string(),
            name: scheme.name_in(language).to_string(),
            description: scheme.description_in(language).to_string(),
            eligibility: eligibility.to_string(),
            benefits: benefits.to_string(),
            category: format!("{:?}", scheme.category).to_lowercase(),
        }
    }
}

/// FFI-safe hospital directory entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHospital {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub hospital_type: String,
    pub location: String,
}

impl From<&models::Hospital> for FfiHospital {
    fn from(hospital: &models::Hospital) -> Self {
        Self {
            id: hospital.id.to_string(),
            name: hospital.name.to_string(),
            phone: hospital.phone.to_string(),
            email: hospital.email.to_string(),
            hospital_type: format!("{:?}", hospital.hospital_type),
            location: hospital.location.to_string(),
        }
    }
}
