//! Storage envelope: entity kinds, the record union, and stored metadata.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::patient::Patient;
use super::pharmacy::PharmacySnapshot;
use super::prescription::{Appointment, Prescription};

/// Entity types with their own list and pending queue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Patients,
    Prescriptions,
    Appointments,
    Pharmacy,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Patients,
        EntityKind::Prescriptions,
        EntityKind::Appointments,
        EntityKind::Pharmacy,
    ];

    /// Storage key of the full list.
    pub fn storage_key(&self) -> &'static str {
        match self {
            EntityKind::Patients => "patients",
            EntityKind::Prescriptions => "prescriptions",
            EntityKind::Appointments => "appointments",
            EntityKind::Pharmacy => "pharmacyData",
        }
    }

    /// Storage key of the pending queue.
    pub fn pending_key(&self) -> &'static str {
        match self {
            EntityKind::Patients => "pendingPatients",
            EntityKind::Prescriptions => "pendingPrescriptions",
            EntityKind::Appointments => "pendingAppointments",
            EntityKind::Pharmacy => "pendingPharmacy",
        }
    }

    /// The pharmacy key holds one snapshot object rather than a list.
    pub fn is_snapshot(&self) -> bool {
        matches!(self, EntityKind::Pharmacy)
    }

    /// Singular noun for notices.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Patients => "Patient",
            EntityKind::Prescriptions => "Prescription",
            EntityKind::Appointments => "Appointment",
            EntityKind::Pharmacy => "Pharmacy data",
        }
    }
}

/// Record validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum RecordError {
    #[error("{kind:?} record has empty {field}")]
    EmptyField { kind: EntityKind, field: &'static str },

    #[error("Triage score {0} out of range 0-10")]
    ScoreOutOfRange(u8),

    #[error("Medication '{0}' has zero quantity")]
    ZeroQuantity(String),
}

/// Any entity the store accepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EntityRecord {
    Patient(Patient),
    Prescription(Prescription),
    Appointment(Appointment),
    Pharmacy(PharmacySnapshot),
}

impl EntityRecord {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRecord::Patient(_) => EntityKind::Patients,
            EntityRecord::Prescription(_) => EntityKind::Prescriptions,
            EntityRecord::Appointment(_) => EntityKind::Appointments,
            EntityRecord::Pharmacy(_) => EntityKind::Pharmacy,
        }
    }

    /// Identity used in logs.
    pub fn id(&self) -> &str {
        match self {
            EntityRecord::Patient(p) => &p.id,
            EntityRecord::Prescription(p) => &p.id,
            EntityRecord::Appointment(a) => &a.id,
            EntityRecord::Pharmacy(s) => &s.captured_at,
        }
    }

    /// Reject shapes that must never be persisted.
    pub fn validate(&self) -> Result<(), RecordError> {
        let kind = self.kind();
        let empty = |field| RecordError::EmptyField { kind, field };

        match self {
            EntityRecord::Patient(p) => {
                if p.id.is_empty() {
                    return Err(empty("id"));
                }
                if p.name.trim().is_empty() {
                    return Err(empty("name"));
                }
                if p.triage_score > 10 {
                    return Err(RecordError::ScoreOutOfRange(p.triage_score));
                }
            }
            EntityRecord::Prescription(rx) => {
                if rx.id.is_empty() {
                    return Err(empty("id"));
                }
                if rx.patient_id.is_empty() {
                    return Err(empty("patient_id"));
                }
                for med in &rx.medications {
                    if med.name.trim().is_empty() {
                        return Err(empty("medication name"));
                    }
                    if med.quantity == 0 {
                        return Err(RecordError::ZeroQuantity(med.name.clone()));
                    }
                }
            }
            EntityRecord::Appointment(a) => {
                if a.id.is_empty() {
                    return Err(empty("id"));
                }
                if a.patient_id.is_empty() {
                    return Err(empty("patient_id"));
                }
                if a.hospital_id.is_empty() {
                    return Err(empty("hospital_id"));
                }
            }
            EntityRecord::Pharmacy(snapshot) => {
                if snapshot.stock.iter().any(|s| s.medication_id.is_empty()) {
                    return Err(empty("medication_id"));
                }
            }
        }
        Ok(())
    }

    pub fn as_patient(&self) -> Option<&Patient> {
        match self {
            EntityRecord::Patient(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_prescription(&self) -> Option<&Prescription> {
        match self {
            EntityRecord::Prescription(p) => Some(p),
            _ => None,
        }
    }
}

/// A record as persisted, with storage metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredRecord {
    pub record: EntityRecord,
    /// When the store accepted the record (RFC 3339)
    pub stored_at: String,
    /// Written while disconnected and not yet flushed
    pub pending_sync: bool,
}

impl StoredRecord {
    pub fn new(record: EntityRecord, pending_sync: bool) -> Self {
        Self {
            record,
            stored_at: chrono::Utc::now().to_rfc3339(),
            pending_sync,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.record.kind()
    }

    /// SHA-256 of the record content, stable across retries.
    ///
    /// Every record type serializes to JSON infallibly (string map keys, no
    /// custom serializers). Should that ever change, the debug form is
    /// hashed instead so distinct records never share the empty-input key.
    pub fn fingerprint(&self) -> String {
        let bytes = match serde_json::to_vec(&self.record) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(id = self.record.id(), error = %e, "Record not serializable, fingerprinting debug form");
                format!("{:?}", self.record).into_bytes()
            }
        };
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Medication;

    #[test]
    fn test_storage_keys() {
        assert_eq!(EntityKind::Patients.pending_key(), "pendingPatients");
        assert_eq!(EntityKind::Pharmacy.storage_key(), "pharmacyData");
        assert_eq!(EntityKind::Pharmacy.pending_key(), "pendingPharmacy");
        assert!(EntityKind::Pharmacy.is_snapshot());
        assert!(!EntityKind::Appointments.is_snapshot());
    }

    #[test]
    fn test_record_json_is_tagged() {
        let record = EntityRecord::Patient(Patient::new("Amar".into(), 50));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "patient");
        assert_eq!(json["data"]["name"], "Amar");

        let back: EntityRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_validate_rejects_malformed() {
        let mut patient = Patient::new(" ".into(), 50);
        assert!(EntityRecord::Patient(patient.clone()).validate().is_err());

        patient.name = "Amar".into();
        patient.triage_score = 11;
        assert_eq!(
            EntityRecord::Patient(patient).validate(),
            Err(RecordError::ScoreOutOfRange(11))
        );

        let rx = Prescription::new(
            "p-1".into(),
            "Fever".into(),
            String::new(),
            vec![Medication::new("Paracetamol 500mg".into(), 0)],
        );
        assert_eq!(
            EntityRecord::Prescription(rx).validate(),
            Err(RecordError::ZeroQuantity("Paracetamol 500mg".into()))
        );
    }

    #[test]
    fn test_fingerprint_ignores_metadata() {
        let record = EntityRecord::Patient(Patient::new("Amar".into(), 50));
        let a = StoredRecord::new(record.clone(), true);
        let mut b = StoredRecord::new(record, false);
        b.stored_at = "2024-01-01T00:00:00Z".into();

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let patient = Patient::new("Amar".into(), 50);
        let before = StoredRecord::new(EntityRecord::Patient(patient.clone()), true);

        let mut seen = patient;
        seen.start_consultation().unwrap();
        let after = StoredRecord::new(EntityRecord::Patient(seen), true);

        // SHA-256 of empty input
        let empty = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        assert_ne!(before.fingerprint(), after.fingerprint());
        assert_ne!(before.fingerprint(), empty);
    }
}
