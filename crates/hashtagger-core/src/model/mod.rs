//! One-vs-rest classifiers and the three-model ensemble built on them.
//!
//! Every classifier scores all labels at once against the shared
//! [`LabelIndex`](crate::features::LabelIndex): position `i` of a score
//! vector always refers to the label at index position `i`.

pub mod ensemble;
pub mod linear_svc;
pub mod logistic;
pub mod naive_bayes;
mod optim;
pub mod unit;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::features::SparseVector;

pub use ensemble::{CombineStrategy, EnsembleScorer, EnsembleTrainer, Scored};
pub use linear_svc::{LinearSvc, SvcParams};
pub use logistic::{LogisticParams, LogisticRegression};
pub use naive_bayes::MultinomialNb;
pub use unit::BinaryUnit;

/// Anything that produces one score per label for a feature vector.
pub trait LabelScorer {
    /// Score vector of length [`n_labels`](Self::n_labels).
    fn scores(&self, x: &SparseVector) -> Vec<f64>;

    /// Number of labels scored.
    fn n_labels(&self) -> usize;

    /// Feature width the scorer was fitted against.
    fn n_features(&self) -> usize;
}

/// Which classifier family a model belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    LinearSvc,
    MultinomialNb,
    LogisticRegression,
}

impl ClassifierKind {
    /// All kinds, in ensemble order.
    pub const ALL: [ClassifierKind; 3] = [
        ClassifierKind::LinearSvc,
        ClassifierKind::MultinomialNb,
        ClassifierKind::LogisticRegression,
    ];

    /// Artifact file name for this kind.
    pub fn artifact_name(self) -> &'static str {
        match self {
            Self::LinearSvc => "model_svc.json",
            Self::MultinomialNb => "model_nb.json",
            Self::LogisticRegression => "model_lr.json",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::LinearSvc => "LinearSVC",
            Self::MultinomialNb => "MultinomialNB",
            Self::LogisticRegression => "LogisticRegression",
        };
        f.write_str(name)
    }
}

/// A fitted classifier of any supported family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "model", rename_all = "snake_case")]
pub enum Classifier {
    LinearSvc(LinearSvc),
    MultinomialNb(MultinomialNb),
    LogisticRegression(LogisticRegression),
}

impl Classifier {
    pub fn kind(&self) -> ClassifierKind {
        match self {
            Self::LinearSvc(_) => ClassifierKind::LinearSvc,
            Self::MultinomialNb(_) => ClassifierKind::MultinomialNb,
            Self::LogisticRegression(_) => ClassifierKind::LogisticRegression,
        }
    }

    /// Per-label binary units in label-index order.
    pub fn units(&self) -> &[BinaryUnit] {
        match self {
            Self::LinearSvc(m) => m.units(),
            Self::MultinomialNb(m) => m.units(),
            Self::LogisticRegression(m) => m.units(),
        }
    }

    fn inner(&self) -> &dyn LabelScorer {
        match self {
            Self::LinearSvc(m) => m,
            Self::MultinomialNb(m) => m,
            Self::LogisticRegression(m) => m,
        }
    }
}

impl LabelScorer for Classifier {
    fn scores(&self, x: &SparseVector) -> Vec<f64> {
        self.inner().scores(x)
    }

    fn n_labels(&self) -> usize {
        self.inner().n_labels()
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }
}

impl From<LinearSvc> for Classifier {
    fn from(m: LinearSvc) -> Self {
        Self::LinearSvc(m)
    }
}

impl From<MultinomialNb> for Classifier {
    fn from(m: MultinomialNb) -> Self {
        Self::MultinomialNb(m)
    }
}

impl From<LogisticRegression> for Classifier {
    fn from(m: LogisticRegression) -> Self {
        Self::LogisticRegression(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureMatrix, LabelIndex};

    #[test]
    fn test_kind_names_and_artifacts() {
        assert_eq!(ClassifierKind::LinearSvc.artifact_name(), "model_svc.json");
        assert_eq!(ClassifierKind::MultinomialNb.artifact_name(), "model_nb.json");
        assert_eq!(
            ClassifierKind::LogisticRegression.artifact_name(),
            "model_lr.json"
        );
        assert_eq!(ClassifierKind::LinearSvc.to_string(), "LinearSVC");
    }

    #[test]
    fn test_classifier_serde_keeps_kind() {
        let x = FeatureMatrix::new(
            vec![
                SparseVector::from_pairs(vec![(0, 1.0)]),
                SparseVector::from_pairs(vec![(1, 1.0)]),
            ],
            2,
        );
        let sets = vec![vec!["#a".to_string()], vec!["#b".to_string()]];
        let y = LabelIndex::fit(&sets).binarize(&sets);
        let model: Classifier = MultinomialNb::fit(&x, &y, 1.0).into();

        let json = serde_json::to_string(&model).unwrap();
        assert!(json.contains("\"kind\":\"multinomial_nb\""));
        let restored: Classifier = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, model);
        assert_eq!(restored.kind(), ClassifierKind::MultinomialNb);
        assert_eq!(restored.n_labels(), 2);
        assert_eq!(restored.n_features(), 2);
    }
}
