//! Voice assistant tests against scripted speech engines.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use carepoint_core::models::{Language, Priority};
use carepoint_core::triage::TriageScorer;
use carepoint_voice::{
    extract_symptoms, instructions, Capability, SpeechRecognizer, SpeechSynthesizer, Utterance,
    VoiceAssistant, VoiceError, VoiceResult, SYMPTOM_KEYWORDS,
};
use proptest::prelude::*;

/// Records everything it is asked to say.
#[derive(Clone, Default)]
struct RecordingSynthesizer {
    spoken: Arc<Mutex<Vec<Utterance>>>,
}

#[async_trait]
impl SpeechSynthesizer for RecordingSynthesizer {
    async fn speak(&self, utterance: &Utterance) -> VoiceResult<()> {
        self.spoken.lock().unwrap().push(utterance.clone());
        Ok(())
    }
}

/// Hears the same transcript every time.
struct ScriptedRecognizer {
    transcript: &'static str,
    locales: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRecognizer {
    fn new(transcript: &'static str) -> Self {
        Self {
            transcript,
            locales: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn listen(&self, locale: &str) -> VoiceResult<String> {
        self.locales.lock().unwrap().push(locale.to_string());
        Ok(self.transcript.to_string())
    }
}

struct BrokenRecognizer;

#[async_trait]
impl SpeechRecognizer for BrokenRecognizer {
    async fn listen(&self, _locale: &str) -> VoiceResult<String> {
        Err(VoiceError::Recognition("no-speech".into()))
    }
}

#[tokio::test]
async fn test_check_symptoms_announces_result() {
    let synth = RecordingSynthesizer::default();
    let assistant = VoiceAssistant::new(
        Some(Box::new(synth.clone())),
        Some(Box::new(ScriptedRecognizer::new("I have chest pain and a fever"))),
    );
    let scorer = TriageScorer::new();

    let result = assistant.check_symptoms(&scorer, 40).await.unwrap();

    assert_eq!(result.score, 10);
    assert_eq!(result.priority, Priority::Critical);
    assert_eq!(result.estimated_wait_minutes, 0);

    let spoken = synth.spoken.lock().unwrap();
    assert_eq!(spoken.len(), 1);
    assert_eq!(
        spoken[0].text,
        "Your triage score is 10. Your priority is Critical. Estimated wait time is 0 minutes."
    );
    assert_eq!(spoken[0].locale, "en-US");
    assert!((spoken[0].rate - 0.8).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_punjabi_session_uses_punjabi_locale() {
    let synth = RecordingSynthesizer::default();
    let recognizer = ScriptedRecognizer::new("cough");
    let heard = recognizer.locales.clone();
    let mut assistant = VoiceAssistant::new(Some(Box::new(synth.clone())), Some(Box::new(recognizer)));
    assistant.set_language(Language::Punjabi);

    assistant.speak_instructions().await.unwrap();
    let result = assistant.check_symptoms(&TriageScorer::new(), 30).await.unwrap();

    assert_eq!(result.priority, Priority::Medium);
    assert_eq!(*heard.lock().unwrap(), vec!["pa-IN".to_string()]);

    let spoken = synth.spoken.lock().unwrap();
    assert_eq!(spoken.len(), 2);
    assert_eq!(spoken[0].text, instructions(Language::Punjabi));
    assert!(spoken.iter().all(|u| u.locale == "pa-IN"));
    assert!(spoken[1].text.contains("ਮੱਧਮ"));
}

#[tokio::test]
async fn test_missing_engines_are_reported() {
    let mute = VoiceAssistant::new(None, Some(Box::new(ScriptedRecognizer::new("fever"))));
    assert!(!mute.features().can_speak);
    assert!(mute.features().can_listen);
    assert!(!mute.features().symptom_checker_available());
    assert_eq!(
        mute.speak("hello").await,
        Err(VoiceError::Unsupported(Capability::Synthesis))
    );

    let deaf = VoiceAssistant::new(Some(Box::new(RecordingSynthesizer::default())), None);
    assert_eq!(
        deaf.listen().await,
        Err(VoiceError::Unsupported(Capability::Recognition))
    );
    assert!(matches!(
        deaf.check_symptoms(&TriageScorer::new(), 30).await,
        Err(VoiceError::Unsupported(Capability::Recognition))
    ));
}

#[tokio::test]
async fn test_recognition_failure_skips_announcement() {
    let synth = RecordingSynthesizer::default();
    let assistant = VoiceAssistant::new(Some(Box::new(synth.clone())), Some(Box::new(BrokenRecognizer)));

    let err = assistant.check_symptoms(&TriageScorer::new(), 30).await.unwrap_err();
    assert_eq!(err, VoiceError::Recognition("no-speech".into()));
    assert!(synth.spoken.lock().unwrap().is_empty());
}

#[test]
fn test_assess_transcript_uses_scorer_vocabulary() {
    let assistant = VoiceAssistant::new(None, None);
    let mut scorer = TriageScorer::new();
    scorer.add_symptom("rash", 2);

    let result = assistant.assess_transcript(&scorer, "a small rash and a headache", 30);
    // rash 2 + headache 4
    assert_eq!(result.score, 6);
    assert_eq!(result.priority, Priority::High);

    let silent = assistant.assess_transcript(&scorer, "", 30);
    assert_eq!(silent.score, 0);
    assert_eq!(silent.priority, Priority::Low);
}

proptest! {
    #[test]
    fn prop_extracted_labels_are_known(transcript in "[a-z ,.]{0,60}") {
        let scorer = TriageScorer::new();
        let vocabulary = scorer.known_symptoms();
        let symptoms = extract_symptoms(&transcript, &vocabulary);

        for symptom in &symptoms {
            prop_assert!(
                vocabulary.contains(&symptom.as_str()) || SYMPTOM_KEYWORDS.contains(&symptom.as_str()),
                "unexpected label {:?}", symptom
            );
        }
        let mut unique = symptoms.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), symptoms.len());
    }
}
