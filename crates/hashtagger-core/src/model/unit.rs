//! Per-label binary sub-classifier shared by the one-vs-rest families.

use serde::{Deserialize, Serialize};

use crate::features::SparseVector;

/// One fitted binary problem inside a one-vs-rest classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BinaryUnit {
    /// Affine decision function `w·x + b`.
    Linear { weights: Vec<f64>, bias: f64 },
    /// The label column was constant during training; always returns `value`.
    Constant { value: f64 },
}

impl BinaryUnit {
    /// Raw decision value: the margin for linear units, the constant otherwise.
    pub fn decision(&self, x: &SparseVector) -> f64 {
        match self {
            Self::Linear { weights, bias } => x.dot(weights) + bias,
            Self::Constant { value } => *value,
        }
    }

    /// Positive-class probability: sigmoid of the margin for linear units.
    pub fn probability(&self, x: &SparseVector) -> f64 {
        match self {
            Self::Linear { .. } => sigmoid(self.decision(x)),
            Self::Constant { value } => *value,
        }
    }

    /// Weight vector length (0 for constant units).
    pub fn width(&self) -> usize {
        match self {
            Self::Linear { weights, .. } => weights.len(),
            Self::Constant { .. } => 0,
        }
    }
}

/// The constant a one-column problem collapses to, if the column never varies.
pub(crate) fn constant_column(column: &[bool]) -> Option<f64> {
    match (column.iter().all(|&y| y), column.iter().all(|&y| !y)) {
        (true, _) => Some(1.0),
        (_, true) => Some(0.0),
        _ => None,
    }
}

/// Per-sample weights for `class_weight = balanced`: `n / (2 * n_class)`.
pub(crate) fn balanced_weights(column: &[bool]) -> Vec<f64> {
    let n = column.len() as f64;
    let positives = column.iter().filter(|&&y| y).count() as f64;
    let negatives = n - positives;
    let w_pos = if positives > 0.0 { n / (2.0 * positives) } else { 0.0 };
    let w_neg = if negatives > 0.0 { n / (2.0 * negatives) } else { 0.0 };
    column
        .iter()
        .map(|&y| if y { w_pos } else { w_neg })
        .collect()
}

/// Numerically stable logistic function.
pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Numerically stable `ln(1 + e^t)`.
pub(crate) fn softplus(t: f64) -> f64 {
    if t > 0.0 {
        t + (-t).exp().ln_1p()
    } else {
        t.exp().ln_1p()
    }
}
