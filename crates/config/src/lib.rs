//! Configuration for the clinic voice booking agent
//!
//! Three config surfaces, each YAML-loadable with compiled-in defaults that
//! match the deployed SmileRight setup:
//!
//! - [`ClinicConfig`] — clinic identity, address, and operating hours in
//!   both supported languages.
//! - [`DetectionConfig`] — keyword lists driving the greeting-stage
//!   language detector.
//! - [`PersonasConfig`] — parameterized persona templates (one template,
//!   keyed by locale and feature flags, instead of per-language copies).

pub mod clinic;
pub mod detection;
pub mod personas;

pub use clinic::ClinicConfig;
pub use detection::{DetectionConfig, DetectionScores};
pub use personas::{PersonaDefinition, PersonaFeatures, PersonaRole, PersonasConfig};

/// Errors when loading configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found at {0}: {1}")]
    FileNotFound(String, String),
    #[error("failed to parse config: {0}")]
    ParseError(String),
}

pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(
    path: impl AsRef<std::path::Path>,
) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::FileNotFound(path.display().to_string(), e.to_string()))?;
    serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}
