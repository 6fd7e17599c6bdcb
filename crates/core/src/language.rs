//! Supported conversation languages

use serde::{Deserialize, Serialize};

/// Language of the conversation, chosen once per call by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    French,
}

impl Language {
    /// Lowercase tag as logged and stored in session snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::French => "french",
        }
    }

    /// Capitalized name used in transfer status messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "French",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
