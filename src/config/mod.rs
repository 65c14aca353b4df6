//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Defaults applied to newly created sections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDefaults {
    /// Rounds planned for a new section
    #[serde(default = "default_planned_rounds")]
    pub planned_rounds: u32,

    /// Whether new sections collect USCF attributes
    #[serde(default)]
    pub uscf_mode: bool,
}

fn default_planned_rounds() -> u32 {
    5
}

impl Default for SectionDefaults {
    fn default() -> Self {
        Self {
            planned_rounds: default_planned_rounds(),
            uscf_mode: false,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub sections: SectionDefaults,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            sections: SectionDefaults::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sections.planned_rounds == 0 {
            return Err(ConfigError::ValidationError(
                "Planned rounds must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
