//! Sub-configuration structs with defaults matching the reference training run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory where the five trained artifacts are written and read
    pub artifact_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("~/.hashtagger/artifacts"),
        }
    }
}

/// Training data source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV file with one post per row. Overridden by the `CSV` argument of
    /// `hashtagger train` and `hashtagger balance`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_path: Option<String>,

    /// Column holding the raw post text
    pub text_column: String,

    /// Column holding the raw hashtag field
    pub tags_column: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            text_column: "ttext".to_string(),
            tags_column: "htags".to_string(),
        }
    }
}

/// Dictionary and synonym files used by augmentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    /// Directory containing `dictionary.txt` and `synsets.txt`
    pub dir: String,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            dir: "~/.hashtagger/lexicon".to_string(),
        }
    }
}

/// Rarity-aware synthetic augmentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentationConfig {
    /// Whether to augment rare records before training
    pub enabled: bool,

    /// Labels seen fewer times than this mark their records as rare
    pub target_count: usize,

    /// Synthetic candidates generated per rare record
    pub variants_per_record: usize,

    /// Token positions replaced per candidate
    pub replacements: usize,

    /// Seed for the augmentation RNG. Unset means OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target_count: 15,
            variants_per_record: 2,
            replacements: 1,
            seed: None,
        }
    }
}

/// TF-IDF feature extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Keep only the most frequent n-grams
    pub max_features: usize,

    /// Smallest n-gram length
    pub ngram_min: usize,

    /// Largest n-gram length
    pub ngram_max: usize,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            max_features: 3000,
            ngram_min: 1,
            ngram_max: 2,
        }
    }
}

/// Classifier hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Fit the three classifiers concurrently on the blocking pool
    pub parallel: bool,

    /// Inverse regularization strength for the linear SVM
    pub svc_c: f64,

    /// Maximum coordinate-descent epochs for the linear SVM
    pub svc_max_iter: usize,

    /// Additive smoothing for naive Bayes
    pub nb_alpha: f64,

    /// Inverse regularization strength for logistic regression
    pub lr_c: f64,

    /// Maximum gradient iterations for logistic regression
    pub lr_max_iter: usize,

    /// Convergence tolerance shared by the iterative solvers
    pub tolerance: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            svc_c: 1.0,
            svc_max_iter: 1000,
            nb_alpha: 1.0,
            lr_c: 1.0,
            lr_max_iter: 1000,
            tolerance: 1e-4,
        }
    }
}

/// Inference settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    /// Number of hashtags returned per text
    pub top_k: usize,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self { top_k: 6 }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("text", "json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
