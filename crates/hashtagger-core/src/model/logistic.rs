//! One-vs-rest L2-regularized logistic regression.
//!
//! Each label minimizes `½‖w‖² + C Σᵢ sᵢ log(1 + exp(-yᵢ(w·xᵢ + b)))` with
//! L-BFGS, where `sᵢ` are balanced class weights. The intercept `b` is not
//! penalized.

use serde::{Deserialize, Serialize};

use crate::features::{FeatureMatrix, LabelMatrix, SparseVector};

use super::optim;
use super::unit::{balanced_weights, constant_column, sigmoid, softplus, BinaryUnit};
use super::LabelScorer;

/// Hyper-parameters for [`LogisticRegression::fit`].
#[derive(Debug, Clone, Copy)]
pub struct LogisticParams {
    pub c: f64,
    pub max_iter: usize,
    pub tolerance: f64,
}

/// Fitted one-vs-rest logistic regression; scores are probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    n_features: usize,
    units: Vec<BinaryUnit>,
}

impl LogisticRegression {
    /// Fit one binary problem per label column.
    pub fn fit(x: &FeatureMatrix, y: &LabelMatrix, params: &LogisticParams) -> Self {
        let mut not_converged = 0usize;
        let units = (0..y.n_labels())
            .map(|label| {
                let column = y.column(label);
                if let Some(value) = constant_column(column) {
                    return BinaryUnit::Constant { value };
                }
                let (unit, converged) = fit_binary(x, column, params);
                if !converged {
                    not_converged += 1;
                }
                unit
            })
            .collect();

        if not_converged > 0 {
            tracing::warn!(
                "LogisticRegression: {} of {} labels hit max_iter={}",
                not_converged,
                y.n_labels(),
                params.max_iter
            );
        }

        Self {
            n_features: x.n_features(),
            units,
        }
    }

    pub fn units(&self) -> &[BinaryUnit] {
        &self.units
    }
}

impl LabelScorer for LogisticRegression {
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

fn fit_binary(x: &FeatureMatrix, column: &[bool], params: &LogisticParams) -> (BinaryUnit, bool) {
    let rows = x.rows();
    let n_features = x.n_features();
    let sample_weight = balanced_weights(column);
    let sign: Vec<f64> = column.iter().map(|&p| if p { 1.0 } else { -1.0 }).collect();
    let c = params.c;

    // Parameters: [w_0 .. w_{n-1}, b]
    let objective = |theta: &[f64], grad: &mut [f64]| -> f64 {
        let (w, b) = theta.split_at(n_features);
        let b = b[0];

        let mut loss = 0.5 * w.iter().map(|v| v * v).sum::<f64>();
        grad[..n_features].copy_from_slice(w);
        grad[n_features] = 0.0;

        for ((row, &yi), &si) in rows.iter().zip(&sign).zip(&sample_weight) {
            let z = row.dot(w) + b;
            loss += c * si * softplus(-yi * z);
            let coef = -c * si * yi * sigmoid(-yi * z);
            row.axpy_into(coef, &mut grad[..n_features]);
            grad[n_features] += coef;
        }
        loss
    };

    let minimum = optim::minimize(
        objective,
        vec![0.0; n_features + 1],
        params.max_iter,
        params.tolerance,
    );
    tracing::trace!(
        "logistic unit: loss={:.6} after {} iterations",
        minimum.value,
        minimum.iterations
    );

    let mut weights = minimum.x;
    let bias = weights.pop().unwrap_or(0.0);
    (BinaryUnit::Linear { weights, bias }, minimum.converged)
}
