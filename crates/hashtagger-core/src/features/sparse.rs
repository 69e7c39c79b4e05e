//! Sparse row vectors and the row-major feature matrix built from them.

use serde::{Deserialize, Serialize};

/// A sparse feature vector with strictly increasing indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Build from `(index, value)` pairs. Pairs are sorted by index and
    /// zero values dropped; duplicate indices are summed.
    pub fn from_pairs(mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|&(i, _)| i);
        let mut indices: Vec<usize> = Vec::with_capacity(pairs.len());
        let mut values: Vec<f64> = Vec::with_capacity(pairs.len());
        for (i, v) in pairs {
            if indices.last() == Some(&i) {
                if let Some(last) = values.last_mut() {
                    *last += v;
                }
            } else {
                indices.push(i);
                values.push(v);
            }
        }
        let (indices, values) = indices
            .into_iter()
            .zip(values)
            .filter(|&(_, v)| v != 0.0)
            .unzip();
        Self { indices, values }
    }

    /// Number of stored non-zero entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Whether every entry is zero.
    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate `(index, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Dot product with a dense vector. Indices past its end count as zero.
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.iter()
            .filter_map(|(i, v)| dense.get(i).map(|w| v * w))
            .sum()
    }

    /// Squared L2 norm.
    pub fn squared_norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum()
    }

    /// Largest index + 1, or 0 for the zero vector.
    pub fn width(&self) -> usize {
        self.indices.last().map_or(0, |i| i + 1)
    }

    /// Add `scale * self` into `dense`.
    pub fn axpy_into(&self, scale: f64, dense: &mut [f64]) {
        for (i, v) in self.iter() {
            if let Some(slot) = dense.get_mut(i) {
                *slot += scale * v;
            }
        }
    }
}

/// Row-major sparse matrix: one row per document.
#[derive(Debug, Clone, Default)]
pub struct FeatureMatrix {
    rows: Vec<SparseVector>,
    n_features: usize,
}

impl FeatureMatrix {
    /// Assemble a matrix of the given width.
    pub fn new(rows: Vec<SparseVector>, n_features: usize) -> Self {
        debug_assert!(rows.iter().all(|r| r.width() <= n_features));
        Self { rows, n_features }
    }

    /// Rows in document order.
    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
