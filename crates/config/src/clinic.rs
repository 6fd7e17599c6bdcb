//! Clinic identity and information text
//!
//! Fixed address/hours text returned by the `get_clinic_info` tool and
//! interpolated into persona instructions, in both supported locales.

use serde::{Deserialize, Serialize};
use std::path::Path;

use clinic_agent_core::Language;

use crate::ConfigError;

/// Clinic configuration loaded from clinic.yaml, with defaults matching the
/// SmileRight deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicConfig {
    /// Display name used in SMS headers and prompts
    #[serde(default = "default_name")]
    pub name: String,
    /// Clinic info text (address + hours), English
    #[serde(default = "default_info_en")]
    pub info_en: String,
    /// Clinic info text (address + hours), French
    #[serde(default = "default_info_fr")]
    pub info_fr: String,
    /// Operating hours phrase, English
    #[serde(default = "default_hours_en")]
    pub operating_hours_en: String,
    /// Operating hours phrase, French
    #[serde(default = "default_hours_fr")]
    pub operating_hours_fr: String,
}

fn default_name() -> String {
    "SmileRight Dental Clinic".to_string()
}

fn default_info_en() -> String {
    "SmileRight Dental Clinic is located at 5561 St-Denis Street, Montreal, Canada. \
     Our opening hours are Monday to Friday from 8:00 AM to 12:00 PM and 1:00 PM to 6:00 PM. \
     We are closed on weekends."
        .to_string()
}

fn default_info_fr() -> String {
    "La Clinique Dentaire SmileRight est située au 5561, rue St-Denis, Montréal, Canada. \
     Nos heures d'ouverture sont du lundi au vendredi de 8h00 à 12h00 et de 13h00 à 18h00. \
     Nous sommes fermés la fin de semaine."
        .to_string()
}

fn default_hours_en() -> String {
    "Monday to Friday from 8:00 AM to 12:00 PM and 1:00 PM to 6:00 PM".to_string()
}

fn default_hours_fr() -> String {
    "du lundi au vendredi de 8h00 à 12h00 et de 13h00 à 18h00".to_string()
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            info_en: default_info_en(),
            info_fr: default_info_fr(),
            operating_hours_en: default_hours_en(),
            operating_hours_fr: default_hours_fr(),
        }
    }
}

impl ClinicConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        crate::load_yaml(path)
    }

    /// Info text for a language
    pub fn info(&self, language: Language) -> &str {
        match language {
            Language::English => &self.info_en,
            Language::French => &self.info_fr,
        }
    }

    /// Operating hours phrase for a language
    pub fn operating_hours(&self, language: Language) -> &str {
        match language {
            Language::English => &self.operating_hours_en,
            Language::French => &self.operating_hours_fr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClinicConfig::default();
        assert_eq!(config.name, "SmileRight Dental Clinic");
        assert!(config.info(Language::English).contains("5561 St-Denis Street"));
        assert!(config.info(Language::French).contains("rue St-Denis"));
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let yaml = "name: Other Clinic\n";
        let config: ClinicConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "Other Clinic");
        assert!(config.operating_hours(Language::French).contains("lundi"));
    }
}
