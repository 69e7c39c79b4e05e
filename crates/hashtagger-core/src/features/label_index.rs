//! Fixed label ↔ column mapping shared by every classifier and the scorer.
//!
//! Labels are indexed in lexicographic order. The fingerprint hashes the
//! ordered label list; artifacts record it so a classifier fitted against a
//! different ordering is rejected at load time.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// On-disk form of a label index.
#[derive(Clone, Serialize, Deserialize)]
struct LabelIndexState {
    classes: Vec<String>,
}

/// Bijection between hashtag labels and integer positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LabelIndexState", into = "LabelIndexState")]
pub struct LabelIndex {
    classes: Vec<String>,
    positions: HashMap<String, usize>,
}

impl TryFrom<LabelIndexState> for LabelIndex {
    type Error = String;

    /// Classes must be strictly ascending, which also rules out duplicates.
    fn try_from(state: LabelIndexState) -> Result<Self, Self::Error> {
        if let Some(pair) = state.classes.windows(2).find(|w| w[0] >= w[1]) {
            let problem = if pair[0] == pair[1] {
                "duplicate label"
            } else {
                "labels out of order at"
            };
            return Err(format!("{} {:?}", problem, pair[1]));
        }
        Ok(Self::from_sorted(state.classes))
    }
}

impl From<LabelIndex> for LabelIndexState {
    fn from(index: LabelIndex) -> Self {
        Self {
            classes: index.classes,
        }
    }
}

impl PartialEq for LabelIndex {
    fn eq(&self, other: &Self) -> bool {
        self.classes == other.classes
    }
}

impl Eq for LabelIndex {}

impl LabelIndex {
    /// Collect every distinct label from `label_sets`.
    pub fn fit<S: AsRef<[String]>>(label_sets: &[S]) -> Self {
        let classes: BTreeSet<&String> = label_sets.iter().flat_map(|s| s.as_ref()).collect();
        let classes: Vec<String> = classes.into_iter().cloned().collect();
        tracing::debug!("Label index fitted with {} labels", classes.len());
        Self::from_sorted(classes)
    }

    fn from_sorted(classes: Vec<String>) -> Self {
        let positions = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self { classes, positions }
    }

    /// Binary indicator rows, one per label set.
    ///
    /// Labels absent from the index are ignored.
    pub fn binarize<S: AsRef<[String]>>(&self, label_sets: &[S]) -> LabelMatrix {
        let mut columns = vec![vec![false; label_sets.len()]; self.classes.len()];
        for (row, set) in label_sets.iter().enumerate() {
            for label in set.as_ref() {
                if let Some(&col) = self.positions.get(label) {
                    columns[col][row] = true;
                }
            }
        }
        LabelMatrix {
            n_rows: label_sets.len(),
            columns,
        }
    }

    /// Label at `position`.
    pub fn label(&self, position: usize) -> Option<&str> {
        self.classes.get(position).map(String::as_str)
    }

    /// Position of `label`.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// All labels in index order.
    pub fn labels(&self) -> &[String] {
        &self.classes
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the index has no labels.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// BLAKE3 hash of the ordered labels.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for class in &self.classes {
            hasher.update(class.as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize().to_hex().to_string()
    }
}

/// Column-major binary label matrix: one column per label.
#[derive(Debug, Clone)]
pub struct LabelMatrix {
    n_rows: usize,
    columns: Vec<Vec<bool>>,
}

impl LabelMatrix {
    /// Indicator column for the label at `position`.
    pub fn column(&self, position: usize) -> &[bool] {
        &self.columns[position]
    }

    /// Number of rows (documents).
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of label columns.
    pub fn n_labels(&self) -> usize {
        self.columns.len()
    }
}
