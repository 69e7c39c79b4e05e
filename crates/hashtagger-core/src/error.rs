//! Error types for the Hashtagger training and suggestion pipeline.
//!
//! Errors are organized by stage so a failed run points at the artifact,
//! column, or setting that caused it. Recoverable conditions (a synonym
//! miss, an unrecognized input text) are not errors and never appear here.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Hashtagger operations.
#[derive(Error, Debug)]
pub enum HashtagError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Training corpus ingestion errors
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// Persisted model artifact errors
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Model fitting errors
    #[error("Training error: {0}")]
    Training(#[from] TrainingError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while loading the training corpus or the lexicon files.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// A required CSV column is absent from the header row
    #[error("Missing required column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// The CSV file could not be read or parsed
    #[error("Failed to read CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// A lexicon file (dictionary or synsets) could not be read
    #[error("Failed to read lexicon file {path}: {message}")]
    Lexicon { path: PathBuf, message: String },
}

/// Persisted artifact errors. All of these are fatal at load time.
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// An artifact file is missing
    #[error("Artifact not found: {0}")]
    NotFound(PathBuf),

    /// An artifact file could not be read or written
    #[error("Failed to access artifact {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// An artifact file is not valid JSON for its type
    #[error("Malformed artifact {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    /// Artifact written by an incompatible format version
    #[error("Unsupported artifact format in {path}: version {found}, expected {expected}")]
    UnsupportedVersion {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    /// Artifacts from different training runs were mixed
    #[error("Artifact {path} belongs to training run {found}, expected {expected}")]
    RunMismatch {
        path: PathBuf,
        found: String,
        expected: String,
    },

    /// A classifier was trained against a different label ordering
    #[error("Label index mismatch in {path}: {message}")]
    LabelIndexMismatch { path: PathBuf, message: String },

    /// A classifier expects a different feature width than the vectorizer produces
    #[error("Feature width mismatch in {path}: classifier has {found}, vectorizer has {expected}")]
    FeatureMismatch {
        path: PathBuf,
        found: usize,
        expected: usize,
    },
}

/// Errors raised while fitting the encoders or classifiers.
#[derive(Error, Debug)]
pub enum TrainingError {
    /// No usable records survived cleaning
    #[error("Training corpus is empty after cleaning")]
    EmptyCorpus,

    /// The vectorizer produced no features (every text was empty or filtered)
    #[error("Vectorizer vocabulary is empty; no usable terms in corpus")]
    EmptyVocabulary,

    /// Feature and label matrices disagree on row count
    #[error("Shape mismatch: {features} feature rows vs {labels} label rows")]
    ShapeMismatch { features: usize, labels: usize },

    /// A background fit task panicked or was cancelled
    #[error("Classifier fit for {model} did not complete: {message}")]
    Fit { model: String, message: String },
}

/// Convenience type alias for Hashtagger results.
pub type Result<T> = std::result::Result<T, HashtagError>;
