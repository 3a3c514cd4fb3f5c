//! libbopomofo-core
//!
//! Language-model plumbing shared by the Bopomofo input core: phrase
//! sources, the layered unigram aggregator and its configuration.
//!
//! Public API:
//! - `Unigram` - Scored phrase value for a lookup key
//! - `PhraseSource` - Open/close store backing one model layer
//! - `TextPhraseTable` - Plain-text `PhraseSource`
//! - `LanguageModel` - Query trait consumed by a composition engine
//! - `AggregateModel` - User/global/excluded/replacement layering
//! - `Config` - Source paths and feature toggles
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod unigram;
pub use unigram::Unigram;

pub mod source;
pub use source::{PhraseSource, SourceError};

pub mod table;
pub use table::TextPhraseTable;

pub mod model;
pub use model::{AggregateModel, ExternalConverter, LanguageModel, Layer, SPACE_KEY};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Language-model configuration.
///
/// Every path is optional; a missing path leaves that layer unloaded, which
/// behaves as an empty source. Keys missing from a TOML file take their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Global phrase table.
    pub language_model_path: Option<PathBuf>,
    /// User phrases, ranked above the global table.
    pub user_phrases_path: Option<PathBuf>,
    /// Phrases hidden from both the user and global layers.
    pub excluded_phrases_path: Option<PathBuf>,
    /// `original replacement` pairs.
    pub phrase_replacement_path: Option<PathBuf>,
    pub associated_phrases_path: Option<PathBuf>,

    pub phrase_replacement_enabled: bool,
    /// Only takes effect once the host installs a converter.
    pub external_converter_enabled: bool,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config = Config::from_toml_str("phrase_replacement_enabled = true\n").unwrap();
        assert!(config.phrase_replacement_enabled);
        assert!(!config.external_converter_enabled);
        assert_eq!(config.language_model_path, None);
    }

    #[test]
    fn toml_round_trip() {
        let config = Config {
            language_model_path: Some(PathBuf::from("data/model.txt")),
            excluded_phrases_path: Some(PathBuf::from("excluded.txt")),
            external_converter_enabled: true,
            ..Config::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn normalize_composes_and_trims() {
        assert_eq!(utils::normalize("  ni\u{301} "), "ní");
    }
}
