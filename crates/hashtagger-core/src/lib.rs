//! Hashtagger Core - hashtag prediction for short social-media posts.
//!
//! Training balances under-represented hashtags with synonym-perturbed copies
//! of their posts, then fits three one-vs-rest classifiers over shared
//! TF-IDF features. Suggestion sums the three per-label scores and returns the
//! top-ranked hashtags.
//!
//! # Architecture
//!
//! ```text
//! CSV → clean → balance (synonyms) → TF-IDF + label index → SVM | NB | LR → artifacts
//! text → clean → TF-IDF → Σ scores → top 6 hashtags
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use hashtagger_core::{Config, Suggester, TrainingPipeline};
//!
//! #[tokio::main]
//! async fn main() -> hashtagger_core::Result<()> {
//!     let config = Config::load()?;
//!     let pipeline = TrainingPipeline::new(config.clone());
//!     let csv = pipeline.configured_csv()?;
//!     pipeline.run(&csv, &config.artifact_dir()).await?;
//!
//!     let suggester = Suggester::load(&config.artifact_dir(), &config.suggest)?;
//!     println!("{:?}", suggester.suggest("sunny day at the beach").hashtags());
//!     Ok(())
//! }
//! ```

pub mod artifacts;
pub mod augment;
pub mod config;
pub mod corpus;
pub mod error;
pub mod features;
pub mod model;
pub mod output;
pub mod suggest;
pub mod text;
pub mod training;

pub use artifacts::TrainedArtifactSet;
pub use augment::{BalanceReport, Lexicon, RarityBalancer, SynonymAugmentor, TagFrequencyTable};
pub use config::Config;
pub use corpus::{Corpus, Record};
pub use error::{ArtifactError, ConfigError, CorpusError, HashtagError, Result, TrainingError};
pub use features::{LabelIndex, SparseVector, TfidfVectorizer};
pub use model::{Classifier, ClassifierKind, EnsembleScorer, EnsembleTrainer, LabelScorer, Scored};
pub use output::{OutputFormat, OutputWriter, PlainText, SuggestionRecord, UNRECOGNIZED_MESSAGE};
pub use suggest::{Suggester, Suggestion};
pub use text::{HashtagExtractor, NormalizerMode, TextNormalizer};
pub use training::{TrainingPipeline, TrainingSummary};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
