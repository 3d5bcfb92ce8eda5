//! Service configuration loading.
//!
//! Defaults, then an optional TOML file, then environment variables.

use std::path::{Path, PathBuf};

use chess_analysis::{EngineConfig, LlmConfig, ReviewConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Everything the service needs to run.
///
/// ```toml
/// [engine]
/// path = "/usr/local/bin/stockfish"
/// threads = 4
///
/// [review]
/// blunder_threshold_cp = 200
///
/// [llm]
/// model = "gpt-4o-mini"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub engine: EngineConfig,
    pub review: ReviewConfig,
    pub llm: LlmConfig,
}

impl ServiceConfig {
    /// Load from `path`, or from [`Self::config_path()`] if it exists, then
    /// apply process environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if an explicit `path` cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Reading configuration");
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Returns `analysis.toml` in the current working directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from("analysis.toml")
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.engine.apply_env(&lookup);
        self.review.apply_env(&lookup);
        self.llm.apply_env(&lookup);
    }
}
