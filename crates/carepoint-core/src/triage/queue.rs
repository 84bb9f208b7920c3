//! Consultation queue ordering.

use crate::models::{Patient, PatientStatus};

/// Patients still to be seen, most urgent first.
pub struct TriageQueue {
    patients: Vec<Patient>,
}

impl TriageQueue {
    /// Build from stored patients; completed visits are dropped.
    ///
    /// Ordering is priority, then score, both descending. Ties keep
    /// registration order.
    pub fn new(patients: impl IntoIterator<Item = Patient>) -> Self {
        let mut patients: Vec<Patient> = patients
            .into_iter()
            .filter(|p| p.status != PatientStatus::Completed)
            .collect();
        patients.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(b.triage_score.cmp(&a.triage_score))
        });
        Self { patients }
    }

    /// The patient to call next: longest-standing most urgent waiting patient.
    pub fn next_waiting(&self) -> Option<&Patient> {
        self.patients
            .iter()
            .find(|p| p.status == PatientStatus::Waiting)
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    pub fn into_vec(self) -> Vec<Patient> {
        self.patients
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    fn patient(name: &str, priority: Priority, score: u8) -> Patient {
        let mut p = Patient::new(name.into(), 30);
        p.apply_triage(score, priority);
        p
    }

    #[test]
    fn test_orders_by_priority_then_score() {
        let queue = TriageQueue::new(vec![
            patient("low", Priority::Low, 2),
            patient("high-6", Priority::High, 6),
            patient("critical", Priority::Critical, 9),
            patient("high-7", Priority::High, 7),
        ]);

        let names: Vec<_> = queue.patients().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["critical", "high-7", "high-6", "low"]);
    }

    #[test]
    fn test_completed_excluded_and_next_waiting() {
        let mut done = patient("done", Priority::Critical, 10);
        done.start_consultation().unwrap();
        done.complete().unwrap();
        let mut seeing = patient("seeing", Priority::High, 7);
        seeing.start_consultation().unwrap();

        let queue = TriageQueue::new(vec![
            done,
            seeing,
            patient("first", Priority::Medium, 4),
            patient("second", Priority::Medium, 4),
        ]);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.next_waiting().unwrap().name, "first");
    }

    #[test]
    fn test_empty_queue() {
        let queue = TriageQueue::new(Vec::new());
        assert!(queue.is_empty());
        assert!(queue.next_waiting().is_none());
    }
}
