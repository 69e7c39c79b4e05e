//! Three-classifier ensemble: concurrent fitting and combined ranking.
//!
//! Fitting runs each classifier family on the blocking thread pool over
//! shared, read-only feature and label matrices. Scoring adds the three
//! per-label score vectors element-wise and returns the highest-scoring
//! labels. The SVM contributes raw margins while the other two contribute
//! probabilities, so the sum is on mixed scales.

use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::TrainingConfig;
use crate::error::TrainingError;
use crate::features::{FeatureMatrix, LabelIndex, LabelMatrix, SparseVector};

use super::{
    Classifier, ClassifierKind, LabelScorer, LinearSvc, LogisticParams, LogisticRegression,
    MultinomialNb, SvcParams,
};

/// Fits the three classifier families against one feature/label pair.
pub struct EnsembleTrainer {
    config: TrainingConfig,
}

impl EnsembleTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Fit every family in [`ClassifierKind::ALL`] order.
    ///
    /// With `training.parallel` the three fits run concurrently; otherwise
    /// they run one after another. `seed` drives the SVM's coordinate order.
    pub async fn fit(
        &self,
        features: FeatureMatrix,
        labels: LabelMatrix,
        seed: u64,
    ) -> Result<Vec<Classifier>, TrainingError> {
        if features.n_rows() != labels.n_rows() {
            return Err(TrainingError::ShapeMismatch {
                features: features.n_rows(),
                labels: labels.n_rows(),
            });
        }
        if features.n_rows() == 0 {
            return Err(TrainingError::EmptyCorpus);
        }

        tracing::info!(
            "Fitting ensemble: {} rows, {} features, {} labels",
            features.n_rows(),
            features.n_features(),
            labels.n_labels()
        );

        let features = Arc::new(features);
        let labels = Arc::new(labels);
        let spawn = |kind| {
            spawn_fit(
                kind,
                Arc::clone(&features),
                Arc::clone(&labels),
                self.config.clone(),
                seed,
            )
        };

        if self.config.parallel {
            let (svc, nb, lr) = tokio::try_join!(
                spawn(ClassifierKind::LinearSvc),
                spawn(ClassifierKind::MultinomialNb),
                spawn(ClassifierKind::LogisticRegression),
            )?;
            Ok(vec![svc, nb, lr])
        } else {
            let mut models = Vec::with_capacity(ClassifierKind::ALL.len());
            for kind in ClassifierKind::ALL {
                models.push(spawn(kind).await?);
            }
            Ok(models)
        }
    }
}

async fn spawn_fit(
    kind: ClassifierKind,
    features: Arc<FeatureMatrix>,
    labels: Arc<LabelMatrix>,
    config: TrainingConfig,
    seed: u64,
) -> Result<Classifier, TrainingError> {
    let start = Instant::now();
    let model = tokio::task::spawn_blocking(move || fit_one(kind, &features, &labels, &config, seed))
        .await
        .map_err(|e| TrainingError::Fit {
            model: kind.to_string(),
            message: format!("Task join error: {}", e),
        })?;
    tracing::info!("Fitted {} in {:.2?}", kind, start.elapsed());
    Ok(model)
}

/// Fit a single classifier family synchronously.
pub fn fit_one(
    kind: ClassifierKind,
    features: &FeatureMatrix,
    labels: &LabelMatrix,
    config: &TrainingConfig,
    seed: u64,
) -> Classifier {
    match kind {
        ClassifierKind::LinearSvc => {
            let params = SvcParams {
                c: config.svc_c,
                max_iter: config.svc_max_iter,
                tolerance: config.tolerance,
            };
            let mut rng = StdRng::seed_from_u64(seed);
            LinearSvc::fit(features, labels, &params, &mut rng).into()
        }
        ClassifierKind::MultinomialNb => {
            MultinomialNb::fit(features, labels, config.nb_alpha).into()
        }
        ClassifierKind::LogisticRegression => {
            let params = LogisticParams {
                c: config.lr_c,
                max_iter: config.lr_max_iter,
                tolerance: config.tolerance,
            };
            LogisticRegression::fit(features, labels, &params).into()
        }
    }
}

/// How per-classifier score vectors are merged into one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CombineStrategy {
    /// Element-wise sum with no rescaling.
    #[default]
    UnweightedSum,
}

impl CombineStrategy {
    /// Merge equally long score vectors.
    pub fn combine(self, vectors: &[Vec<f64>]) -> Vec<f64> {
        match self {
            Self::UnweightedSum => {
                let width = vectors.first().map_or(0, Vec::len);
                let mut total = vec![0.0; width];
                for v in vectors {
                    for (t, s) in total.iter_mut().zip(v) {
                        *t += s;
                    }
                }
                total
            }
        }
    }
}

/// Outcome of scoring one feature vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Scored {
    /// Labels in descending combined score.
    Ranked(Vec<String>),
    /// The text shares no term with the vocabulary.
    UnrecognizedInput,
}

/// Ranks labels by the combined score of several classifiers.
pub struct EnsembleScorer<'a> {
    labels: &'a LabelIndex,
    models: &'a [Classifier],
    strategy: CombineStrategy,
    top_k: usize,
}

impl<'a> EnsembleScorer<'a> {
    pub fn new(labels: &'a LabelIndex, models: &'a [Classifier], top_k: usize) -> Self {
        Self {
            labels,
            models,
            strategy: CombineStrategy::default(),
            top_k,
        }
    }

    pub fn with_strategy(mut self, strategy: CombineStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Combined score per label position.
    pub fn combined(&self, x: &SparseVector) -> Vec<f64> {
        let vectors: Vec<Vec<f64>> = self.models.iter().map(|m| m.scores(x)).collect();
        self.strategy.combine(&vectors)
    }

    /// Top labels for `x`, or [`Scored::UnrecognizedInput`] for the zero vector.
    pub fn score(&self, x: &SparseVector) -> Scored {
        if x.is_zero() {
            return Scored::UnrecognizedInput;
        }

        let combined = self.combined(x);
        let ranked = rank(&combined, self.top_k)
            .into_iter()
            .filter_map(|i| self.labels.label(i).map(str::to_string))
            .collect();
        Scored::Ranked(ranked)
    }
}

/// Positions of the `top_k` largest scores, highest first.
/// Equal scores keep ascending position order.
pub(crate) fn rank(scores: &[f64], top_k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order.truncate(top_k);
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Eight labels, each tied to one feature.
    fn dataset() -> (FeatureMatrix, LabelIndex, LabelMatrix) {
        let mut rows = Vec::new();
        let mut sets = Vec::new();
        for label in 0..8 {
            for noise in 0..3 {
                rows.push(SparseVector::from_pairs(vec![
                    (label, 1.0),
                    (8 + (label + noise) % 3, 0.3),
                ]));
                sets.push(vec![format!("#tag{}", label)]);
            }
        }
        let index = LabelIndex::fit(&sets);
        let matrix = index.binarize(&sets);
        (FeatureMatrix::new(rows, 11), index, matrix)
    }

    fn config(parallel: bool) -> TrainingConfig {
        TrainingConfig {
            parallel,
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        assert_eq!(rank(&[0.5, 2.0, 0.5, 2.0, 1.0], 4), vec![1, 3, 4, 0]);
        assert_eq!(rank(&[1.0, 2.0], 6), vec![1, 0]);
        assert!(rank(&[], 6).is_empty());
    }

    #[test]
    fn test_unweighted_sum() {
        let combined = CombineStrategy::UnweightedSum
            .combine(&[vec![1.0, -0.5], vec![0.25, 0.25], vec![0.5, 0.0]]);
        assert_eq!(combined, vec![1.75, -0.25]);
    }

    #[tokio::test]
    async fn test_fit_produces_three_models_in_order() {
        let (x, index, y) = dataset();
        let models = EnsembleTrainer::new(config(true))
            .fit(x, y, 42)
            .await
            .unwrap();

        let kinds: Vec<_> = models.iter().map(Classifier::kind).collect();
        assert_eq!(kinds, ClassifierKind::ALL.to_vec());
        for m in &models {
            assert_eq!(m.n_labels(), index.len());
            assert_eq!(m.n_features(), 11);
        }
    }

    #[tokio::test]
    async fn test_sequential_fit_matches_parallel() {
        let (x, _, y) = dataset();
        let parallel = EnsembleTrainer::new(config(true))
            .fit(x.clone(), y.clone(), 7)
            .await
            .unwrap();
        let sequential = EnsembleTrainer::new(config(false))
            .fit(x, y, 7)
            .await
            .unwrap();
        assert_eq!(parallel, sequential);
    }

    #[tokio::test]
    async fn test_shape_mismatch_rejected() {
        let (x, _, _) = dataset();
        let sets = vec![vec!["#a".to_string()]];
        let y = LabelIndex::fit(&sets).binarize(&sets);
        let err = EnsembleTrainer::new(config(true))
            .fit(x, y, 0)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TrainingError::ShapeMismatch {
                features: 24,
                labels: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_scorer_returns_top_six_distinct_labels() {
        let (x, index, y) = dataset();
        let models = EnsembleTrainer::new(config(true))
            .fit(x, y, 1)
            .await
            .unwrap();
        let scorer = EnsembleScorer::new(&index, &models, 6);

        let probe = SparseVector::from_pairs(vec![(3, 1.0)]);
        let Scored::Ranked(labels) = scorer.score(&probe) else {
            panic!("expected ranked labels");
        };
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0], "#tag3");
        let mut distinct = labels.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), 6);

        // Combined score is the plain sum of the three model scores
        let combined = scorer.combined(&probe);
        for (pos, total) in combined.iter().enumerate() {
            let sum: f64 = models.iter().map(|m| m.scores(&probe)[pos]).sum();
            assert!((total - sum).abs() < 1e-12);
        }
    }

    #[tokio::test]
    async fn test_zero_vector_is_unrecognized() {
        let (x, index, y) = dataset();
        let models = EnsembleTrainer::new(config(false))
            .fit(x, y, 1)
            .await
            .unwrap();
        let scorer = EnsembleScorer::new(&index, &models, 6);
        assert_eq!(
            scorer.score(&SparseVector::default()),
            Scored::UnrecognizedInput
        );
    }

    #[tokio::test]
    async fn test_top_k_larger_than_label_count() {
        let (x, index, y) = dataset();
        let models = EnsembleTrainer::new(config(true))
            .fit(x, y, 1)
            .await
            .unwrap();
        let scorer = EnsembleScorer::new(&index, &models, 50);
        let probe = SparseVector::from_pairs(vec![(0, 1.0)]);
        match scorer.score(&probe) {
            Scored::Ranked(labels) => assert_eq!(labels.len(), 8),
            Scored::UnrecognizedInput => panic!("probe has known features"),
        }
    }
}
