//! Triage scoring and the doctor's waiting queue.

mod queue;
mod scorer;

pub use queue::*;
pub use scorer::*;

use serde::Serialize;

use crate::models::{HealthScheme, Priority};

/// Highest possible triage score.
pub const MAX_SCORE: u8 = 10;

/// Scorer output for one patient.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TriageResult {
    /// Clamped score (0-10)
    pub score: u8,
    pub priority: Priority,
    pub recommended_action: String,
    pub estimated_wait_minutes: u32,
    /// Matching schemes; may contain repeats
    pub recommended_schemes: Vec<HealthScheme>,
}

/// Expected wait for a priority tier, in minutes.
pub fn wait_minutes(priority: Priority) -> u32 {
    match priority {
        Priority::Critical => 0,
        Priority::High => 5,
        Priority::Medium => 15,
        Priority::Low => 30,
    }
}

pub fn recommended_action(priority: Priority) -> &'static str {
    match priority {
        Priority::Critical => "Immediate medical attention required",
        Priority::High => "Urgent care needed within 1 hour",
        Priority::Medium => "Medical consultation recommended",
        Priority::Low => "Routine consultation or self-care",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_times() {
        assert_eq!(wait_minutes(Priority::Critical), 0);
        assert_eq!(wait_minutes(Priority::High), 5);
        assert_eq!(wait_minutes(Priority::Medium), 15);
        assert_eq!(wait_minutes(Priority::Low), 30);
    }
}
