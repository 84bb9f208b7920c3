//! Prescription and appointment models.

use serde::{Deserialize, Serialize};

/// Doctor id used until the console has real sign-in.
pub const PLACEHOLDER_DOCTOR_ID: &str = "dr-001";

/// Prescription status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PrescriptionStatus {
    Active,
    Filled,
    Expired,
}

/// A single medication line on a prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    pub id: String,
    /// Medication name as stocked by the pharmacy (e.g., "Paracetamol 500mg")
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    /// Units to dispense
    pub quantity: u32,
}

impl Medication {
    /// Create a medication line with a fresh id.
    pub fn new(name: String, quantity: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            dosage: String::new(),
            frequency: String::new(),
            duration: String::new(),
            quantity,
        }
    }
}

/// A prescription issued at the end of a consultation. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    pub id: String,
    /// Owning patient id
    pub patient_id: String,
    /// Issuing doctor
    pub doctor_id: String,
    pub medications: Vec<Medication>,
    pub diagnosis: String,
    pub instructions: String,
    /// Issue timestamp (RFC 3339)
    pub date_issued: String,
    /// Issued through the digital console rather than on paper
    pub is_digital: bool,
    pub status: PrescriptionStatus,
}

impl Prescription {
    /// Issue a new active digital prescription.
    pub fn new(
        patient_id: String,
        diagnosis: String,
        instructions: String,
        medications: Vec<Medication>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            doctor_id: PLACEHOLDER_DOCTOR_ID.to_string(),
            medications,
            diagnosis,
            instructions,
            date_issued: chrono::Utc::now().to_rfc3339(),
            is_digital: true,
            status: PrescriptionStatus::Active,
        }
    }

    /// Total units of a medication on this prescription.
    pub fn quantity_of(&self, medication_name: &str) -> u32 {
        self.medications
            .iter()
            .filter(|m| m.name == medication_name)
            .map(|m| m.quantity)
            .sum()
    }
}

/// A booked visit at one of the directory hospitals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    /// Hospital directory id (e.g., "ch-nabha")
    pub hospital_id: String,
    /// Scheduled time (RFC 3339)
    pub scheduled_at: String,
    pub reason: Option<String>,
}

impl Appointment {
    pub fn new(patient_id: String, hospital_id: String, scheduled_at: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            hospital_id,
            scheduled_at,
            reason: None,
        }
    }
}
