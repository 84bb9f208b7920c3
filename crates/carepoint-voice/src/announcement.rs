//! Spoken text for triage results.

use carepoint_core::models::{Language, Priority};
use carepoint_core::triage::TriageResult;

/// Speaking rate used for announcements; slower than normal speech.
pub const ANNOUNCEMENT_RATE: f32 = 0.8;

/// Priority tier as spoken in a language.
pub fn priority_name(priority: Priority, language: Language) -> &'static str {
    match language {
        Language::English => priority.as_str(),
        Language::Punjabi => match priority {
            Priority::Critical => "ਗੰਭੀਰ",
            Priority::High => "ਉੱਚ",
            Priority::Medium => "ਮੱਧਮ",
            Priority::Low => "ਘੱਟ",
        },
    }
}

/// Summary of a triage result read back to the patient.
pub fn announcement(result: &TriageResult, language: Language) -> String {
    let priority = priority_name(result.priority, language);
    match language {
        Language::English => format!(
            "Your triage score is {}. Your priority is {}. Estimated wait time is {} minutes.",
            result.score, priority, result.estimated_wait_minutes
        ),
        Language::Punjabi => format!(
            "ਤੁਹਾਡਾ ਟ੍ਰਾਈਏਜ ਸਕੋਰ {} ਹੈ। ਤੁਹਾਡੀ ਤਰਜੀਹ {} ਹੈ। ਅਨੁਮਾਨਿਤ ਉਡੀਕ ਦਾ ਸਮਾਂ {} ਮਿੰਟ ਹੈ।",
            result.score, priority, result.estimated_wait_minutes
        ),
    }
}

/// Prompt spoken before listening for symptoms.
pub fn instructions(language: Language) -> &'static str {
    match language {
        Language::English => "Please describe your symptoms. Press the microphone button and speak.",
        Language::Punjabi => "ਕਿਰਪਾ ਕਰਕੇ ਆਪਣੇ ਲੱਛਣਾਂ ਬਾਰੇ ਦੱਸੋ। ਮਾਈਕ ਬਟਨ ਦਬਾਓ ਅਤੇ ਬੋਲੋ।",
    }
}
