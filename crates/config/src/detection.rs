//! Language detection keyword lists and scoring
//!
//! The greeting persona decides between English and French from the caller's
//! first response by counting keyword hits against two fixed lists. The
//! matching is deliberately simple: lowercase the utterance and count
//! substring membership per keyword. A keyword occurring inside a longer
//! word counts as a hit; ties (including zero hits on both sides) resolve to
//! English. Both quirks are kept as deployed — see DESIGN.md before
//! changing either.

use serde::{Deserialize, Serialize};
use std::path::Path;

use clinic_agent_core::Language;

use crate::ConfigError;

/// Hit counts per language, logged alongside the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionScores {
    pub french: usize,
    pub english: usize,
}

/// Keyword lists for the detector, loadable from detection.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_french_keywords")]
    pub french_keywords: Vec<String>,
    #[serde(default = "default_english_keywords")]
    pub english_keywords: Vec<String>,
}

fn default_french_keywords() -> Vec<String> {
    [
        "bonjour",
        "salut",
        "bonsoir",
        "oui",
        "non",
        "merci",
        "je",
        "suis",
        "voudrais",
        "rendez-vous",
        "français",
        "parle",
        "comprends",
        "dentiste",
        "clinique",
        "allo",
        "comment",
        "allez",
        "vous",
        "bien",
        "très",
        "avoir",
        "prendre",
        "besoin",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_english_keywords() -> Vec<String> {
    [
        "hello",
        "hi",
        "good",
        "yes",
        "no",
        "thank",
        "i",
        "am",
        "would",
        "like",
        "appointment",
        "english",
        "speak",
        "understand",
        "dentist",
        "clinic",
        "need",
        "want",
        "book",
        "schedule",
        "help",
        "can",
        "you",
        "please",
        "thanks",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            french_keywords: default_french_keywords(),
            english_keywords: default_english_keywords(),
        }
    }
}

impl DetectionConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        crate::load_yaml(path)
    }

    /// Score an utterance against both keyword lists.
    pub fn score(&self, utterance: &str) -> DetectionScores {
        let lower = utterance.to_lowercase();
        DetectionScores {
            french: self
                .french_keywords
                .iter()
                .filter(|k| lower.contains(k.as_str()))
                .count(),
            english: self
                .english_keywords
                .iter()
                .filter(|k| lower.contains(k.as_str()))
                .count(),
        }
    }

    /// Detect the language of an utterance. Pure: the caller is responsible
    /// for writing the result into the session record.
    pub fn detect(&self, utterance: &str) -> (Language, DetectionScores) {
        let scores = self.score(utterance);
        let language = if scores.french > scores.english {
            Language::French
        } else {
            // Ties and zero-zero default to English.
            Language::English
        };
        (language, scores)
    }
}
