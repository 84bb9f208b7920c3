//! Patient models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Triage priority tier, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

/// Lifecycle status of a patient visit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PatientStatus {
    /// Registered, waiting for a doctor
    Waiting,
    /// Currently with a doctor
    InConsultation,
    /// Visit finished
    Completed,
}

/// Status transition errors.
#[derive(Error, Debug, PartialEq)]
pub enum StatusError {
    #[error("Cannot move patient from {from:?} to {to:?}")]
    InvalidTransition {
        from: PatientStatus,
        to: PatientStatus,
    },
}

/// A registered patient with triage results attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Local UUID, generated at intake
    pub id: String,
    /// Full name
    pub name: String,
    /// Contact email (used by the patient dashboard to find own visits)
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Age in years
    pub age: u32,
    /// Current symptom labels, in the order entered
    pub current_symptoms: Vec<String>,
    /// Historical condition labels, in the order entered
    pub medical_history: Vec<String>,
    /// Derived triage score (0-10)
    pub triage_score: u8,
    /// Derived priority tier
    pub priority: Priority,
    /// Appointment timestamp (RFC 3339)
    pub appointment_time: String,
    /// Visit status
    pub status: PatientStatus,
    /// Whether the device was connected when the patient was registered
    pub is_online: bool,
}

impl Patient {
    /// Create a new waiting patient with required fields.
    pub fn new(name: String, age: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email: String::new(),
            phone: String::new(),
            age,
            current_symptoms: Vec::new(),
            medical_history: Vec::new(),
            triage_score: 0,
            priority: Priority::Low,
            appointment_time: chrono::Utc::now().to_rfc3339(),
            status: PatientStatus::Waiting,
            is_online: true,
        }
    }

    /// Attach a triage score and priority.
    pub fn apply_triage(&mut self, score: u8, priority: Priority) {
        self.triage_score = score;
        self.priority = priority;
    }

    /// Move a waiting patient into consultation.
    pub fn start_consultation(&mut self) -> Result<(), StatusError> {
        self.advance(PatientStatus::Waiting, PatientStatus::InConsultation)
    }

    /// Finish a consultation.
    pub fn complete(&mut self) -> Result<(), StatusError> {
        self.advance(PatientStatus::InConsultation, PatientStatus::Completed)
    }

    fn advance(&mut self, expected: PatientStatus, to: PatientStatus) -> Result<(), StatusError> {
        if self.status != expected {
            return Err(StatusError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Case-insensitive email match.
    pub fn has_email(&self, email: &str) -> bool {
        !email.is_empty() && self.email.eq_ignore_ascii_case(email)
    }
}

/// Intake form validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Required field missing: {0}")]
    MissingField(&'static str),

    #[error("Invalid age: {0}")]
    InvalidAge(String),
}

/// Raw intake form as submitted by the registration screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientIntake {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Age as typed
    pub age: String,
    /// Comma-separated symptoms
    pub symptoms: String,
    /// Comma-separated medical history
    pub medical_history: String,
}

impl PatientIntake {
    /// Check required fields. Reports the first problem found.
    pub fn validate(&self) -> Result<u32, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError::MissingField("phone"));
        }
        let age_text = self.age.trim();
        if age_text.is_empty() {
            return Err(ValidationError::MissingField("age"));
        }
        let age: u32 = age_text
            .parse()
            .map_err(|_| ValidationError::InvalidAge(age_text.to_string()))?;
        if age > 150 {
            return Err(ValidationError::InvalidAge(age_text.to_string()));
        }
        if split_list(&self.symptoms).is_empty() {
            return Err(ValidationError::MissingField("symptoms"));
        }
        Ok(age)
    }

    /// Build a waiting patient from a valid form.
    pub fn into_patient(self, online: bool) -> Result<Patient, ValidationError> {
        let age = self.validate()?;
        let mut patient = Patient::new(self.name.trim().to_string(), age);
        patient.email = self.email.trim().to_string();
        patient.phone = self.phone.trim().to_string();
        patient.current_symptoms = split_list(&self.symptoms);
        patient.medical_history = split_list(&self.medical_history);
        patient.is_online = online;
        Ok(patient)
    }
}

/// Split a comma-separated field, trimming and dropping blanks.
fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
