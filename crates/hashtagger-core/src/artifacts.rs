//! Persisted model artifacts.
//!
//! A training run writes five JSON files into one directory:
//!
//! ```text
//! tfidf.json      fitted vectorizer
//! binarizer.json  label index
//! model_svc.json  LinearSVC
//! model_nb.json   MultinomialNB
//! model_lr.json   LogisticRegression
//! ```
//!
//! Every file is wrapped in an envelope carrying the format version, the
//! training run id and the label index fingerprint. Loading rejects a set
//! whose files disagree on any of these, or whose classifiers do not match
//! the vectorizer width and label count.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;
use crate::features::{LabelIndex, TfidfVectorizer};
use crate::model::{BinaryUnit, Classifier, ClassifierKind, EnsembleScorer, LabelScorer};

/// Current artifact format version.
pub const FORMAT_VERSION: u32 = 1;

pub const TFIDF_FILE: &str = "tfidf.json";
pub const BINARIZER_FILE: &str = "binarizer.json";

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    format_version: u32,
    run_id: String,
    label_fingerprint: String,
    payload: T,
}

/// Vectorizer, label index and the three classifiers of one training run.
#[derive(Debug, Clone)]
pub struct TrainedArtifactSet {
    run_id: String,
    vectorizer: TfidfVectorizer,
    label_index: LabelIndex,
    classifiers: Vec<Classifier>,
}

impl TrainedArtifactSet {
    /// Assemble a new set and assign it a fresh run id.
    ///
    /// `classifiers` must hold one model per [`ClassifierKind`], in
    /// [`ClassifierKind::ALL`] order.
    pub fn new(
        vectorizer: TfidfVectorizer,
        label_index: LabelIndex,
        classifiers: Vec<Classifier>,
    ) -> Result<Self, ArtifactError> {
        let run_id = new_run_id(&label_index, &vectorizer);
        let set = Self {
            run_id,
            vectorizer,
            label_index,
            classifiers,
        };
        set.check_consistency()?;
        Ok(set)
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn label_index(&self) -> &LabelIndex {
        &self.label_index
    }

    pub fn classifiers(&self) -> &[Classifier] {
        &self.classifiers
    }

    /// Ensemble scorer over this set's classifiers.
    pub fn scorer(&self, top_k: usize) -> EnsembleScorer<'_> {
        EnsembleScorer::new(&self.label_index, &self.classifiers, top_k)
    }

    /// Whether every artifact file is present in `dir`.
    pub fn exists(dir: &Path) -> bool {
        artifact_names().all(|name| dir.join(name).exists())
    }

    /// Write all five files into `dir`, creating it if needed.
    pub fn save(&self, dir: &Path) -> Result<(), ArtifactError> {
        std::fs::create_dir_all(dir).map_err(|e| ArtifactError::Io {
            path: dir.to_path_buf(),
            message: e.to_string(),
        })?;

        self.write_file(&dir.join(TFIDF_FILE), &self.vectorizer)?;
        self.write_file(&dir.join(BINARIZER_FILE), &self.label_index)?;
        for model in &self.classifiers {
            self.write_file(&dir.join(model.kind().artifact_name()), model)?;
        }

        tracing::info!(
            "Saved artifacts for run {} to {:?} ({} features, {} labels)",
            self.run_id,
            dir,
            self.vectorizer.n_features(),
            self.label_index.len()
        );
        Ok(())
    }

    /// Load and cross-check all five files from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let binarizer_path = dir.join(BINARIZER_FILE);
        let binarizer: Envelope<LabelIndex> = read_file(&binarizer_path)?;
        let run_id = binarizer.run_id;
        let label_index = binarizer.payload;
        let fingerprint = label_index.fingerprint();
        if binarizer.label_fingerprint != fingerprint {
            return Err(ArtifactError::LabelIndexMismatch {
                path: binarizer_path,
                message: "stored fingerprint does not match the stored labels".to_string(),
            });
        }

        let tfidf_path = dir.join(TFIDF_FILE);
        let tfidf: Envelope<TfidfVectorizer> = read_file(&tfidf_path)?;
        check_envelope(&tfidf_path, &tfidf, &run_id, &fingerprint)?;
        let vectorizer = tfidf.payload;

        let mut classifiers = Vec::with_capacity(ClassifierKind::ALL.len());
        for kind in ClassifierKind::ALL {
            let path = dir.join(kind.artifact_name());
            let envelope: Envelope<Classifier> = read_file(&path)?;
            check_envelope(&path, &envelope, &run_id, &fingerprint)?;
            classifiers.push(envelope.payload);
        }

        let set = Self {
            run_id,
            vectorizer,
            label_index,
            classifiers,
        };
        set.check_consistency_in(dir)?;

        tracing::info!(
            "Loaded artifacts for run {} from {:?} ({} features, {} labels)",
            set.run_id,
            dir,
            set.vectorizer.n_features(),
            set.label_index.len()
        );
        Ok(set)
    }

    fn check_consistency(&self) -> Result<(), ArtifactError> {
        self.check_consistency_in(Path::new(""))
    }

    /// Kinds in order, label counts and feature widths agree.
    fn check_consistency_in(&self, dir: &Path) -> Result<(), ArtifactError> {
        if self.classifiers.len() != ClassifierKind::ALL.len() {
            return Err(ArtifactError::Malformed {
                path: dir.to_path_buf(),
                message: format!(
                    "expected {} classifiers, found {}",
                    ClassifierKind::ALL.len(),
                    self.classifiers.len()
                ),
            });
        }

        for (model, kind) in self.classifiers.iter().zip(ClassifierKind::ALL) {
            let path = dir.join(kind.artifact_name());
            if model.kind() != kind {
                return Err(ArtifactError::Malformed {
                    path,
                    message: format!("expected a {} model, found {}", kind, model.kind()),
                });
            }
            if model.n_labels() != self.label_index.len() {
                return Err(ArtifactError::LabelIndexMismatch {
                    path,
                    message: format!(
                        "classifier scores {} labels, label index has {}",
                        model.n_labels(),
                        self.label_index.len()
                    ),
                });
            }
            if model.n_features() != self.vectorizer.n_features() {
                return Err(ArtifactError::FeatureMismatch {
                    path,
                    found: model.n_features(),
                    expected: self.vectorizer.n_features(),
                });
            }
            let short_unit = model.units().iter().find(|unit| {
                matches!(unit, BinaryUnit::Linear { .. })
                    && unit.width() != self.vectorizer.n_features()
            });
            if let Some(unit) = short_unit {
                return Err(ArtifactError::FeatureMismatch {
                    path,
                    found: unit.width(),
                    expected: self.vectorizer.n_features(),
                });
            }
        }
        Ok(())
    }

    fn write_file<T: Serialize>(&self, path: &Path, payload: &T) -> Result<(), ArtifactError> {
        let envelope = Envelope {
            format_version: FORMAT_VERSION,
            run_id: self.run_id.clone(),
            label_fingerprint: self.label_index.fingerprint(),
            payload,
        };
        let json = serde_json::to_vec(&envelope).map_err(|e| ArtifactError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        // Sibling temp file, then rename over the target.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)
            .and_then(|_| std::fs::rename(&tmp, path))
            .map_err(|e| ArtifactError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        tracing::debug!("Wrote {:?} ({:.1} KB)", path, json.len() as f64 / 1024.0);
        Ok(())
    }
}

fn artifact_names() -> impl Iterator<Item = &'static str> {
    [TFIDF_FILE, BINARIZER_FILE]
        .into_iter()
        .chain(ClassifierKind::ALL.into_iter().map(ClassifierKind::artifact_name))
}

/// Read one envelope, checking the format version before decoding the payload.
fn read_file<T: DeserializeOwned>(path: &Path) -> Result<Envelope<T>, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read(path).map_err(|e| ArtifactError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let malformed = |e: serde_json::Error| ArtifactError::Malformed {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let raw: Envelope<serde_json::Value> = serde_json::from_slice(&content).map_err(malformed)?;
    if raw.format_version != FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: raw.format_version,
            expected: FORMAT_VERSION,
        });
    }
    let payload = serde_json::from_value(raw.payload).map_err(malformed)?;
    Ok(Envelope {
        format_version: raw.format_version,
        run_id: raw.run_id,
        label_fingerprint: raw.label_fingerprint,
        payload,
    })
}

fn check_envelope<T>(
    path: &Path,
    envelope: &Envelope<T>,
    run_id: &str,
    fingerprint: &str,
) -> Result<(), ArtifactError> {
    if envelope.run_id != run_id {
        return Err(ArtifactError::RunMismatch {
            path: path.to_path_buf(),
            found: envelope.run_id.clone(),
            expected: run_id.to_string(),
        });
    }
    if envelope.label_fingerprint != fingerprint {
        return Err(ArtifactError::LabelIndexMismatch {
            path: path.to_path_buf(),
            message: format!(
                "fingerprint {} does not match label index {}",
                envelope.label_fingerprint, fingerprint
            ),
        });
    }
    Ok(())
}

fn new_run_id(label_index: &LabelIndex, vectorizer: &TfidfVectorizer) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let mut hasher = blake3::Hasher::new();
    hasher.update(label_index.fingerprint().as_bytes());
    hasher.update(&(vectorizer.n_features() as u64).to_le_bytes());
    hasher.update(&nanos.to_le_bytes());
    hasher.update(&std::process::id().to_le_bytes());
    hasher.finalize().to_hex().as_str()[..16].to_string()
}
