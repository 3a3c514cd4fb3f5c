//! Bopomofo-specific configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All language-model options from `libbopomofo_core::Config` (flattened via serde)
//! - The keyboard layout a new reading buffer starts on
//! - How Hanyu Pinyin output spells ü
//!
//! # Example
//!
//! ```rust
//! use libbopomofo::{BopomofoConfig, LayoutKind};
//!
//! let config = BopomofoConfig::from_toml_str("keyboard_layout = \"hsu\"").unwrap();
//! assert_eq!(config.keyboard_layout, LayoutKind::Hsu);
//! let base = config.into_base();
//! // Use base with AggregateModel::from_config()
//! ```

use libbopomofo_core::ConfigError;
use serde::{Deserialize, Serialize};

use crate::layout::LayoutKind;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BopomofoConfig {
    /// Source paths and toggles for the aggregate model
    #[serde(flatten)]
    pub base: libbopomofo_core::Config,

    pub keyboard_layout: LayoutKind,

    /// Write ü as `v` instead of `ü` after n and l
    pub use_v_for_u_umlaut: bool,
}

impl BopomofoConfig {
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Convert into the base config for use with `AggregateModel::from_config()`
    pub fn into_base(self) -> libbopomofo_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &libbopomofo_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut libbopomofo_core::Config {
        &mut self.base
    }
}
