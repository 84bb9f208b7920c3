//! Speech capabilities supplied by the host.
//!
//! Either capability may be missing. Callers check [`VoiceFeatures`] and hide
//! the voice controls instead of surfacing an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use carepoint_core::models::{Language, Patient};
use carepoint_core::triage::{TriageResult, TriageScorer};

use crate::announcement::{announcement, instructions, ANNOUNCEMENT_RATE};
use crate::extraction::extract_symptoms;

/// Voice errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoiceError {
    #[error("{0} is not supported on this device")]
    Unsupported(Capability),

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Speech recognition failed: {0}")]
    Recognition(String),
}

pub type VoiceResult<T> = Result<T, VoiceError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Capability {
    Synthesis,
    Recognition,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Synthesis => write!(f, "Speech synthesis"),
            Capability::Recognition => write!(f, "Speech recognition"),
        }
    }
}

/// Text to speak with its voice settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// BCP 47 locale ("en-US", "pa-IN")
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            locale: language.locale().to_string(),
            rate: ANNOUNCEMENT_RATE,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// Text-to-speech engine.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak and resolve once the utterance has finished.
    async fn speak(&self, utterance: &Utterance) -> VoiceResult<()>;

    /// Stop anything being spoken.
    fn cancel(&self) {}
}

/// Speech-to-text engine.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Listen for a single utterance and return its transcript.
    async fn listen(&self, locale: &str) -> VoiceResult<String>;

    fn stop(&self) {}
}

/// Which voice features the UI should offer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoiceFeatures {
    pub can_speak: bool,
    pub can_listen: bool,
}

impl VoiceFeatures {
    pub fn detect(
        synthesizer: Option<&dyn SpeechSynthesizer>,
        recognizer: Option<&dyn SpeechRecognizer>,
    ) -> Self {
        Self {
            can_speak: synthesizer.is_some(),
            can_listen: recognizer.is_some(),
        }
    }

    /// The voice symptom checker needs both directions.
    pub fn symptom_checker_available(&self) -> bool {
        self.can_speak && self.can_listen
    }
}

/// Spoken triage: prompts, listens, scores, and reads the result back.
pub struct VoiceAssistant {
    synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    recognizer: Option<Box<dyn SpeechRecognizer>>,
    language: Language,
}

impl VoiceAssistant {
    pub fn new(
        synthesizer: Option<Box<dyn SpeechSynthesizer>>,
        recognizer: Option<Box<dyn SpeechRecognizer>>,
    ) -> Self {
        Self {
            synthesizer,
            recognizer,
            language: Language::default(),
        }
    }

    pub fn features(&self) -> VoiceFeatures {
        VoiceFeatures::detect(self.synthesizer.as_deref(), self.recognizer.as_deref())
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Speak text in the current language.
    pub async fn speak(&self, text: &str) -> VoiceResult<()> {
        let synthesizer = self
            .synthesizer
            .as_ref()
            .ok_or(VoiceError::Unsupported(Capability::Synthesis))?;
        synthesizer.speak(&Utterance::new(text, self.language)).await
    }

    /// Listen for one utterance in the current language.
    pub async fn listen(&self) -> VoiceResult<String> {
        let recognizer = self
            .recognizer
            .as_ref()
            .ok_or(VoiceError::Unsupported(Capability::Recognition))?;
        recognizer.listen(self.language.locale()).await
    }

    pub async fn speak_instructions(&self) -> VoiceResult<()> {
        self.speak(instructions(self.language)).await
    }

    /// Read a triage result back to the patient.
    pub async fn announce(&self, result: &TriageResult) -> VoiceResult<()> {
        self.speak(&announcement(result, self.language)).await
    }

    /// Score a transcript as if it came from an adult walk-in patient.
    pub fn assess_transcript(&self, scorer: &TriageScorer, transcript: &str, age: u32) -> TriageResult {
        let vocabulary = scorer.known_symptoms();
        let mut patient = Patient::new("Voice Patient".into(), age);
        patient.current_symptoms = extract_symptoms(transcript, &vocabulary);
        scorer.score(&patient)
    }

    /// Listen, score, and announce in one go.
    pub async fn check_symptoms(&self, scorer: &TriageScorer, age: u32) -> VoiceResult<TriageResult> {
        let transcript = self.listen().await?;
        let result = self.assess_transcript(scorer, &transcript, age);
        tracing::info!(score = result.score, priority = result.priority.as_str(), "Voice triage");
        self.announce(&result).await?;
        Ok(result)
    }

    /// Silence both engines.
    pub fn stop(&self) {
        if let Some(synthesizer) = &self.synthesizer {
            synthesizer.cancel();
        }
        if let Some(recognizer) = &self.recognizer {
            recognizer.stop();
        }
    }
}
