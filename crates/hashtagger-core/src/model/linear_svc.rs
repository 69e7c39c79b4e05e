//! One-vs-rest linear support vector classifier.
//!
//! Each label is an L2-regularized squared-hinge problem solved in the dual
//! by coordinate descent. The intercept is learned as the weight of a
//! constant extra feature with value 1. Samples are weighted so that both
//! classes of every label carry equal total mass.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::features::{FeatureMatrix, LabelMatrix, SparseVector};

use super::unit::{balanced_weights, constant_column, BinaryUnit};
use super::LabelScorer;

/// Hyper-parameters for [`LinearSvc::fit`].
#[derive(Debug, Clone, Copy)]
pub struct SvcParams {
    pub c: f64,
    pub max_iter: usize,
    pub tolerance: f64,
}

/// Fitted one-vs-rest linear SVM; scores are signed margins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSvc {
    n_features: usize,
    units: Vec<BinaryUnit>,
}

impl LinearSvc {
    /// Fit one binary problem per label column.
    pub fn fit<R: Rng + ?Sized>(
        x: &FeatureMatrix,
        y: &LabelMatrix,
        params: &SvcParams,
        rng: &mut R,
    ) -> Self {
        let mut not_converged = 0usize;
        let units = (0..y.n_labels())
            .map(|label| {
                let column = y.column(label);
                if let Some(value) = constant_column(column) {
                    tracing::warn!("Label {} is constant in training data", label);
                    return BinaryUnit::Constant { value };
                }
                let (unit, converged) = fit_binary(x, column, params, &mut *rng);
                if !converged {
                    not_converged += 1;
                }
                unit
            })
            .collect();

        if not_converged > 0 {
            tracing::warn!(
                "LinearSVC: {} of {} labels hit the iteration limit",
                not_converged,
                y.n_labels()
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

impl LabelScorer for LinearSvc {
    fn scores(&self, x: &SparseVector) -> Vec<f64> {
        self.units.iter().map(|u| u.decision(x)).collect()
    }

    fn n_labels(&self) -> usize {
        self.units.len()
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

fn fit_binary<R: Rng + ?Sized>(
    x: &FeatureMatrix,
    column: &[bool],
    params: &SvcParams,
    rng: &mut R,
) -> (BinaryUnit, bool) {
    let rows = x.rows();
    let sample_weight = balanced_weights(column);
    let sign: Vec<f64> = column.iter().map(|&p| if p { 1.0 } else { -1.0 }).collect();

    // Squared hinge: diagonal shift 1 / (2 C_i), no upper bound on alpha.
    let diag: Vec<f64> = sample_weight
        .iter()
        .map(|w| 0.5 / (params.c * w))
        .collect();
    let q_diag: Vec<f64> = rows
        .iter()
        .zip(&diag)
        .map(|(row, d)| row.squared_norm() + 1.0 + d)
        .collect();

    let mut weights = vec![0.0; x.n_features()];
    let mut bias = 0.0;
    let mut alpha = vec![0.0; rows.len()];
    let mut order: Vec<usize> = (0..rows.len()).collect();
    let mut converged = false;

    for _ in 0..params.max_iter {
        order.shuffle(rng);
        let mut pg_max = f64::NEG_INFINITY;
        let mut pg_min = f64::INFINITY;

        for &i in &order {
            let margin = rows[i].dot(&weights) + bias;
            let g = sign[i] * margin - 1.0 + diag[i] * alpha[i];
            let pg = if alpha[i] == 0.0 { g.min(0.0) } else { g };
            pg_max = pg_max.max(pg);
            pg_min = pg_min.min(pg);

            if pg.abs() > 1e-12 {
                let old = alpha[i];
                alpha[i] = (old - g / q_diag[i]).max(0.0);
                let delta = (alpha[i] - old) * sign[i];
                rows[i].axpy_into(delta, &mut weights);
                bias += delta;
            }
        }

        if pg_max - pg_min <= params.tolerance {
            converged = true;
            break;
        }
    }

    (BinaryUnit::Linear { weights, bias }, converged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::LabelIndex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params() -> SvcParams {
        SvcParams {
            c: 1.0,
            max_iter: 1000,
            tolerance: 1e-4,
        }
    }

    fn toy() -> (FeatureMatrix, LabelMatrix) {
        // Feature 0 ↔ #a, feature 1 ↔ #b
        let rows = vec![
            SparseVector::from_pairs(vec![(0, 1.0)]),
            SparseVector::from_pairs(vec![(0, 0.9), (2, 0.1)]),
            SparseVector::from_pairs(vec![(1, 1.0)]),
            SparseVector::from_pairs(vec![(1, 0.8), (2, 0.2)]),
        ];
        let sets: Vec<Vec<String>> = vec![
            vec!["#a".into()],
            vec!["#a".into()],
            vec!["#b".into()],
            vec!["#b".into()],
        ];
        let index = LabelIndex::fit(&sets);
        (FeatureMatrix::new(rows, 3), index.binarize(&sets))
    }

    #[test]
    fn test_separates_toy_problem() {
        let (x, y) = toy();
        let model = LinearSvc::fit(&x, &y, &params(), &mut StdRng::seed_from_u64(0));
        assert_eq!(model.n_labels(), 2);
        assert_eq!(model.n_features(), 3);

        let a = model.scores(&SparseVector::from_pairs(vec![(0, 1.0)]));
        assert!(a[0] > 0.0 && a[1] < 0.0);
        let b = model.scores(&SparseVector::from_pairs(vec![(1, 1.0)]));
        assert!(b[1] > 0.0 && b[0] < 0.0);
    }

    #[test]
    fn test_constant_label_becomes_constant_unit() {
        let rows = vec![
            SparseVector::from_pairs(vec![(0, 1.0)]),
            SparseVector::from_pairs(vec![(1, 1.0)]),
        ];
        let sets: Vec<Vec<String>> = vec![vec!["#all".into()], vec!["#all".into()]];
        let y = LabelIndex::fit(&sets).binarize(&sets);
        let model = LinearSvc::fit(
            &FeatureMatrix::new(rows, 2),
            &y,
            &params(),
            &mut StdRng::seed_from_u64(0),
        );
        assert_eq!(model.units()[0], BinaryUnit::Constant { value: 1.0 });
        assert_eq!(model.scores(&SparseVector::default()), vec![1.0]);
    }

    #[test]
    fn test_seeded_fit_is_reproducible() {
        let (x, y) = toy();
        let a = LinearSvc::fit(&x, &y, &params(), &mut StdRng::seed_from_u64(9));
        let b = LinearSvc::fit(&x, &y, &params(), &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
