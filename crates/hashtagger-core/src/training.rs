//! End-to-end training: corpus → balanced corpus → features → ensemble → artifacts.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::artifacts::TrainedArtifactSet;
use crate::augment::{BalanceReport, Lexicon, RarityBalancer};
use crate::config::Config;
use crate::corpus::Corpus;
use crate::error::{ConfigError, Result, TrainingError};
use crate::features::{LabelIndex, TfidfVectorizer};
use crate::model::EnsembleTrainer;

/// What a training run did.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingSummary {
    /// Identifier shared by all five artifact files
    pub run_id: String,
    /// Records loaded from the CSV
    pub original_records: usize,
    /// Synthetic records added by balancing
    pub synthetic_records: usize,
    /// TF-IDF vocabulary size
    pub features: usize,
    /// Distinct hashtag labels
    pub labels: usize,
    /// Seed that drove augmentation and SVM coordinate order
    pub seed: u64,
    /// Balancing report, absent when augmentation is disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<BalanceReport>,
    /// Where the artifacts were written, absent for in-memory runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_dir: Option<PathBuf>,
}

/// Runs the training stages with one configuration.
pub struct TrainingPipeline {
    config: Config,
}

impl TrainingPipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// CSV path from the configuration.
    pub fn configured_csv(&self) -> Result<PathBuf> {
        self.config.csv_path().ok_or_else(|| {
            ConfigError::ValidationError(
                "no training CSV given; set data.csv_path or pass a path".to_string(),
            )
            .into()
        })
    }

    /// Load and clean the CSV corpus.
    pub fn load_corpus(&self, csv: &Path) -> Result<Corpus> {
        let corpus = Corpus::from_csv(csv, &self.config.data)?;
        if corpus.is_empty() {
            return Err(TrainingError::EmptyCorpus.into());
        }
        Ok(corpus)
    }

    /// Load the lexicon from the configured directory.
    pub fn load_lexicon(&self) -> Result<Lexicon> {
        Ok(Lexicon::load(&self.config.lexicon_dir())?)
    }

    /// One balancing pass, unless augmentation is disabled.
    pub fn balance<R: Rng + ?Sized>(
        &self,
        corpus: Corpus,
        lexicon: &Lexicon,
        rng: &mut R,
    ) -> (Corpus, Option<BalanceReport>) {
        if !self.config.augmentation.enabled {
            tracing::info!("Augmentation disabled; training on {} records", corpus.len());
            return (corpus, None);
        }
        let balancer = RarityBalancer::new(lexicon, &self.config.augmentation);
        let (corpus, report) = balancer.balance(corpus, rng);
        (corpus, Some(report))
    }

    /// Balance, vectorize and fit an in-memory corpus.
    pub async fn train(
        &self,
        corpus: Corpus,
        lexicon: &Lexicon,
    ) -> Result<(TrainedArtifactSet, TrainingSummary)> {
        if corpus.is_empty() {
            return Err(TrainingError::EmptyCorpus.into());
        }

        let seed = self.config.augmentation.seed.unwrap_or_else(rand::random);
        tracing::debug!("Training seed: {}", seed);
        let mut rng = StdRng::seed_from_u64(seed);

        let original_records = corpus.len();
        let (corpus, balance) = self.balance(corpus, lexicon, &mut rng);

        let texts = corpus.texts();
        let label_sets = corpus.label_sets();
        let vectorizer = TfidfVectorizer::fit(&texts, &self.config.features)?;
        let label_index = LabelIndex::fit(&label_sets);
        let features = vectorizer.transform_all(&texts);
        let labels = label_index.binarize(&label_sets);

        let trainer = EnsembleTrainer::new(self.config.training.clone());
        let classifiers = trainer.fit(features, labels, rng.gen()).await?;
        let artifacts = TrainedArtifactSet::new(vectorizer, label_index, classifiers)?;

        let summary = TrainingSummary {
            run_id: artifacts.run_id().to_string(),
            original_records,
            synthetic_records: corpus.synthetic().len(),
            features: artifacts.vectorizer().n_features(),
            labels: artifacts.label_index().len(),
            seed,
            balance,
            artifact_dir: None,
        };
        Ok((artifacts, summary))
    }

    /// Load `csv`, train, and save the artifacts into `artifact_dir`.
    pub async fn run(&self, csv: &Path, artifact_dir: &Path) -> Result<TrainingSummary> {
        let corpus = self.load_corpus(csv)?;
        let lexicon = self.load_lexicon()?;
        let (artifacts, mut summary) = self.train(corpus, &lexicon).await?;
        artifacts.save(artifact_dir)?;
        summary.artifact_dir = Some(artifact_dir.to_path_buf());
        Ok(summary)
    }
}
