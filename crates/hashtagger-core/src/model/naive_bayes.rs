//! One-vs-rest multinomial naive Bayes.
//!
//! For a two-class problem the posterior of the positive class is
//! `sigmoid(jll₁ - jll₀)`, and the joint log-likelihood difference is affine
//! in the features: `Σ x_f (θ₁f - θ₀f) + (log π₁ - log π₀)`. Each label is
//! therefore stored as a linear unit over smoothed log-probability
//! differences and scored through the sigmoid.

use serde::{Deserialize, Serialize};

use crate::features::{FeatureMatrix, LabelMatrix, SparseVector};

use super::unit::{constant_column, BinaryUnit};
use super::LabelScorer;

/// Fitted one-vs-rest multinomial naive Bayes; scores are probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    alpha: f64,
    n_features: usize,
    units: Vec<BinaryUnit>,
}

impl MultinomialNb {
    /// Fit with additive (Laplace/Lidstone) smoothing `alpha`.
    pub fn fit(x: &FeatureMatrix, y: &LabelMatrix, alpha: f64) -> Self {
        let units = (0..y.n_labels())
            .map(|label| {
                let column = y.column(label);
                match constant_column(column) {
                    Some(value) => BinaryUnit::Constant { value },
                    None => fit_binary(x, column, alpha),
                }
            })
            .collect();

        Self {
            alpha,
            n_features: x.n_features(),
            units,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn units(&self) -> &[BinaryUnit] {
        &self.units
    }
}

impl LabelScorer for MultinomialNb {
    fn scores(&self, x: &SparseVector) -> Vec<f64> {
        self.units.iter().map(|u| u.probability(x)).collect()
    }

    fn n_labels(&self) -> usize {
        self.units.len()
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

fn fit_binary(x: &FeatureMatrix, column: &[bool], alpha: f64) -> BinaryUnit {
    let n_features = x.n_features();
    // Index 0 = negative class, 1 = positive class
    let mut feature_count = [vec![0.0; n_features], vec![0.0; n_features]];
    let mut class_count = [0.0f64; 2];

    for (row, &positive) in x.rows().iter().zip(column) {
        let class = usize::from(positive);
        class_count[class] += 1.0;
        row.axpy_into(1.0, &mut feature_count[class]);
    }

    let smoothed_log_prob = |counts: &[f64]| -> Vec<f64> {
        let total: f64 = counts.iter().sum::<f64>() + alpha * n_features as f64;
        counts.iter().map(|c| ((c + alpha) / total).ln()).collect()
    };
    let log_prob_neg = smoothed_log_prob(&feature_count[0]);
    let log_prob_pos = smoothed_log_prob(&feature_count[1]);

    let weights = log_prob_pos
        .iter()
        .zip(&log_prob_neg)
        .map(|(p, n)| p - n)
        .collect();
    let bias = class_count[1].ln() - class_count[0].ln();

    BinaryUnit::Linear { weights, bias }
}
