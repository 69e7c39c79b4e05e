//! Configuration management for Hashtagger.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default` with the values the training
//! pipeline was tuned with (rarity target 15, 3000 TF-IDF features, top 6).

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Hashtagger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Training data source
    pub data: DataConfig,

    /// Dictionary and synonym files
    pub lexicon: LexiconConfig,

    /// Rarity-aware synthetic augmentation
    pub augmentation: AugmentationConfig,

    /// TF-IDF feature extraction
    pub features: FeaturesConfig,

    /// Classifier hyperparameters
    pub training: TrainingConfig,

    /// Inference settings
    pub suggest: SuggestConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.hashtagger.hashtagger/config.toml
    /// - Linux: ~/.config/hashtagger/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\hashtagger\config\config.toml
    ///
    /// Falls back to ~/.hashtagger/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "hashtagger", "hashtagger")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".hashtagger").join("config.toml")
            })
    }

    /// Get the resolved artifact directory path (with ~ expansion).
    pub fn artifact_dir(&self) -> PathBuf {
        expand(&self.general.artifact_dir.to_string_lossy())
    }

    /// Get the resolved lexicon directory path (with ~ expansion).
    pub fn lexicon_dir(&self) -> PathBuf {
        expand(&self.lexicon.dir)
    }

    /// Get the resolved training CSV path, if one is configured.
    pub fn csv_path(&self) -> Option<PathBuf> {
        self.data.csv_path.as_deref().map(expand)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
