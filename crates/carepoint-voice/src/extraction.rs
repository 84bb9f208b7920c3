//! Symptom extraction from recognised speech.
//!
//! Recognisers misspell medical words often enough ("feaver", "dizzyness") that
//! exact matching loses most of them, so matches are fuzzy:
//!
//! 1. Multi-word vocabulary phrases ("chest pain"), compared against word
//!    windows of the same length
//! 2. Single keywords, compared against the words no phrase consumed

use std::collections::HashSet;

use strsim::jaro_winkler;

/// Keywords always listened for, on top of the scorer vocabulary.
pub const SYMPTOM_KEYWORDS: &[&str] = &["fever", "headache", "cough", "pain", "nausea", "dizziness"];

/// Minimum Jaro-Winkler similarity for a fuzzy match.
pub const MATCH_THRESHOLD: f64 = 0.92;

/// Extract symptom labels from a transcript.
///
/// `vocabulary` is the scorer's known symptom list. Results are canonical
/// labels (vocabulary spelling), phrases first, without repeats.
pub fn extract_symptoms(transcript: &str, vocabulary: &[&str]) -> Vec<String> {
    let words = tokenize(transcript);
    let mut consumed = vec![false; words.len()];
    let mut found: Vec<String> = Vec::new();

    let mut phrases: Vec<Vec<&str>> = vocabulary
        .iter()
        .map(|p| p.split_whitespace().collect::<Vec<_>>())
        .filter(|p| p.len() > 1)
        .collect();
    // Longest first so "severe head injury" wins over "head injury"
    phrases.sort_by(|a, b| b.len().cmp(&a.len()));

    for phrase in &phrases {
        let n = phrase.len();
        if n > words.len() {
            continue;
        }
        for start in 0..=(words.len() - n) {
            if consumed[start..start + n].iter().any(|&c| c) {
                continue;
            }
            let window = &words[start..start + n];
            if phrase_matches(phrase, window) {
                consumed[start..start + n].iter_mut().for_each(|c| *c = true);
                push_unique(&mut found, phrase.join(" "));
                break;
            }
        }
    }

    let keywords: Vec<&str> = {
        let mut seen = HashSet::new();
        SYMPTOM_KEYWORDS
            .iter()
            .copied()
            .chain(vocabulary.iter().copied().filter(|v| !v.contains(' ')))
            .filter(|k| seen.insert(*k))
            .collect()
    };

    for (word, &used) in words.iter().zip(&consumed) {
        if used {
            continue;
        }
        if let Some(keyword) = best_match(word, &keywords) {
            push_unique(&mut found, keyword.to_string());
        }
    }

    tracing::debug!(transcript, symptoms = ?found, "Extracted symptoms");
    found
}

/// Lowercase words with surrounding punctuation removed.
fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

fn phrase_matches(phrase: &[&str], window: &[String]) -> bool {
    phrase
        .iter()
        .zip(window)
        .all(|(expected, heard)| similar(expected, heard))
}

fn best_match<'a>(word: &str, keywords: &[&'a str]) -> Option<&'a str> {
    keywords
        .iter()
        .map(|k| (*k, jaro_winkler(k, word)))
        .filter(|(_, score)| *score >= MATCH_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(k, _)| k)
}

fn similar(expected: &str, heard: &str) -> bool {
    expected == heard || jaro_winkler(expected, heard) >= MATCH_THRESHOLD
}

fn push_unique(found: &mut Vec<String>, label: String) {
    if !found.contains(&label) {
        found.push(label);
    }
}
