//! Lookup-table triage scorer.
//!
//! score = Σ symptom weights (unknown → 3) + Σ risk factors (unknown → 0)
//!         + 2 if age > 65, + 3 if age < 2, clamped to 0..=10

use std::collections::HashMap;

use super::{recommended_action, wait_minutes, TriageResult, MAX_SCORE};
use crate::models::{HealthScheme, Patient, Priority, SchemeCategory};
use crate::reference;

/// Weight of a symptom missing from the table.
pub const UNKNOWN_SYMPTOM_WEIGHT: i32 = 3;

/// Rule-based triage scorer.
pub struct TriageScorer {
    /// Symptom label → severity weight
    symptom_weights: HashMap<String, i32>,
    /// Condition label → risk addend
    risk_factors: HashMap<String, i32>,
}

impl Default for TriageScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl TriageScorer {
    /// Create a scorer with the default tables.
    pub fn new() -> Self {
        Self {
            symptom_weights: Self::default_symptoms(),
            risk_factors: Self::default_risk_factors(),
        }
    }

    /// Score a patient. Never fails; unknown labels fall back to defaults.
    pub fn score(&self, patient: &Patient) -> TriageResult {
        let symptoms = patient
            .current_symptoms
            .iter()
            .map(|s| self.symptom_weight(s))
            .fold(0i32, i32::saturating_add);
        let risk = patient
            .medical_history
            .iter()
            .map(|c| self.risk_factor(c))
            .fold(0i32, i32::saturating_add);
        let age = match patient.age {
            a if a > 65 => 2,
            a if a < 2 => 3,
            _ => 0,
        };

        let raw = symptoms.saturating_add(risk).saturating_add(age);
        let score = raw.clamp(0, MAX_SCORE as i32) as u8;
        let priority = priority_for(score);

        tracing::debug!(patient = %patient.id, raw, score, priority = priority.as_str(), "Scored patient");

        TriageResult {
            score,
            priority,
            recommended_action: recommended_action(priority).to_string(),
            estimated_wait_minutes: wait_minutes(priority),
            recommended_schemes: recommend_schemes(patient),
        }
    }

    /// Weight of one symptom label (case-insensitive).
    pub fn symptom_weight(&self, symptom: &str) -> i32 {
        self.symptom_weights
            .get(&symptom.trim().to_lowercase())
            .copied()
            .unwrap_or(UNKNOWN_SYMPTOM_WEIGHT)
    }

    /// Addend for one history label (case-insensitive).
    pub fn risk_factor(&self, condition: &str) -> i32 {
        self.risk_factors
            .get(&condition.trim().to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    /// Symptom labels the scorer knows, sorted.
    pub fn known_symptoms(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.symptom_weights.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Add or override a symptom weight.
    pub fn add_symptom(&mut self, symptom: &str, weight: i32) {
        self.symptom_weights.insert(symptom.to_lowercase(), weight);
    }

    /// Add or override a risk factor.
    pub fn add_risk_factor(&mut self, condition: &str, addend: i32) {
        self.risk_factors.insert(condition.to_lowercase(), addend);
    }

    fn default_symptoms() -> HashMap<String, i32> {
        let mut map = HashMap::new();

        // Emergencies
        map.insert("chest pain".into(), 10);
        map.insert("difficulty breathing".into(), 9);
        map.insert("severe bleeding".into(), 10);
        map.insert("loss of consciousness".into(), 10);
        map.insert("severe head injury".into(), 9);
        map.insert("severe allergic reaction".into(), 9);

        // Urgent
        map.insert("severe pain".into(), 7);
        map.insert("high fever".into(), 6);
        map.insert("broken bone".into(), 6);
        map.insert("severe nausea".into(), 6);

        // Standard
        map.insert("moderate pain".into(), 5);
        map.insert("fever".into(), 4);
        map.insert("cough".into(), 4);
        map.insert("headache".into(), 4);

        // Minor
        map.insert("minor cut".into(), 2);
        map.insert("common cold".into(), 2);
        map.insert("routine checkup".into(), 1);
        map.insert("vaccination".into(), 1);

        map
    }

    fn default_risk_factors() -> HashMap<String, i32> {
        let mut map = HashMap::new();
        map.insert("diabetes".into(), 2);
        map.insert("heart disease".into(), 3);
        map.insert("hypertension".into(), 2);
        map.insert("asthma".into(), 2);
        map.insert("elderly".into(), 2);
        map.insert("immunocompromised".into(), 3);
        map
    }
}

/// Priority tier for a clamped score.
pub fn priority_for(score: u8) -> Priority {
    match score {
        s if s >= 8 => Priority::Critical,
        s if s >= 6 => Priority::High,
        s if s >= 4 => Priority::Medium,
        _ => Priority::Low,
    }
}

/// Schemes a patient may qualify for.
///
/// Rules are applied in order and their results concatenated, so a scheme
/// matched by two rules is listed twice.
pub fn recommend_schemes(patient: &Patient) -> Vec<HealthScheme> {
    let mut schemes = Vec::new();

    if patient.age < 18 {
        schemes.extend(reference::schemes_in(SchemeCategory::Child).copied());
    }
    let pregnant = patient
        .current_symptoms
        .iter()
        .any(|s| s.to_lowercase().contains("pregnan"));
    if pregnant {
        schemes.extend(reference::schemes_in(SchemeCategory::Maternal).copied());
    }
    schemes.extend(reference::schemes_in(SchemeCategory::Insurance).copied());

    schemes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(age: u32, symptoms: &[&str], history: &[&str]) -> Patient {
        let mut p = Patient::new("Test".into(), age);
        p.current_symptoms = symptoms.iter().map(|s| s.to_string()).collect();
        p.medical_history = history.iter().map(|s| s.to_string()).collect();
        p
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let scorer = TriageScorer::new();
        assert_eq!(scorer.symptom_weight("Chest Pain"), 10);
        assert_eq!(scorer.symptom_weight("itchy elbow"), UNKNOWN_SYMPTOM_WEIGHT);
        assert_eq!(scorer.risk_factor("DIABETES"), 2);
        assert_eq!(scorer.risk_factor("flat feet"), 0);
    }

    #[test]
    fn test_age_adjustments() {
        let scorer = TriageScorer::new();
        assert_eq!(scorer.score(&patient(70, &["cough"], &[])).score, 6);
        assert_eq!(scorer.score(&patient(1, &["cough"], &[])).score, 7);
        assert_eq!(scorer.score(&patient(65, &["cough"], &[])).score, 4);
        assert_eq!(scorer.score(&patient(2, &["cough"], &[])).score, 4);
    }

    #[test]
    fn test_priority_thresholds() {
        assert_eq!(priority_for(0), Priority::Low);
        assert_eq!(priority_for(3), Priority::Low);
        assert_eq!(priority_for(4), Priority::Medium);
        assert_eq!(priority_for(6), Priority::High);
        assert_eq!(priority_for(8), Priority::Critical);
        assert_eq!(priority_for(10), Priority::Critical);
    }

    #[test]
    fn test_custom_tables() {
        let mut scorer = TriageScorer::new();
        scorer.add_symptom("Dizziness", 5);
        scorer.add_risk_factor("Pregnancy", 1);

        let result = scorer.score(&patient(30, &["dizziness"], &["pregnancy"]));
        assert_eq!(result.score, 6);
        assert!(scorer.known_symptoms().contains(&"dizziness"));
    }

    #[test]
    fn test_negative_weights_clamp_at_zero() {
        let mut scorer = TriageScorer::new();
        scorer.add_symptom("feeling better", -5);

        let result = scorer.score(&patient(30, &["feeling better"], &[]));
        assert_eq!(result.score, 0);
        assert_eq!(result.priority, Priority::Low);
    }

    #[test]
    fn test_extreme_custom_weights_saturate() {
        let mut scorer = TriageScorer::new();
        scorer.add_symptom("collapse", i32::MAX);
        scorer.add_symptom("recovered", i32::MIN);
        scorer.add_risk_factor("frailty", i32::MAX);

        let high = scorer.score(&patient(80, &["collapse", "collapse"], &["frailty"]));
        assert_eq!(high.score, MAX_SCORE);
        assert_eq!(high.priority, Priority::Critical);

        let low = scorer.score(&patient(1, &["recovered", "recovered"], &[]));
        assert_eq!(low.score, 0);
        assert_eq!(low.priority, Priority::Low);
    }

    #[test]
    fn test_scheme_rules() {
        let child = recommend_schemes(&patient(10, &["fever"], &[]));
        let ids: Vec<_> = child.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["kanyak-sambhal", "rashtriya-bal-swasth", "sehat-bima"]);

        let adult = recommend_schemes(&patient(30, &["fever"], &[]));
        assert_eq!(adult.len(), 1);
        assert_eq!(adult[0].id, "sehat-bima");
    }

    #[test]
    fn test_pregnant_minor_gets_all_matching_rules() {
        let schemes = recommend_schemes(&patient(17, &["Pregnancy checkup"], &[]));
        let ids: Vec<_> = schemes.iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                "kanyak-sambhal",
                "rashtriya-bal-swasth",
                "janani-suraksha",
                "shishu-suraksha",
                "sehat-bima",
            ]
        );
    }
}
