//! Training records and the CSV record source.
//!
//! A corpus is an ordered list of records where every original record comes
//! before any synthetic record generated from it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::DataConfig;
use crate::error::CorpusError;
use crate::text::{HashtagExtractor, TextNormalizer};

/// One post with its cleaned text and hashtag labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Text as it appeared in the source (the augmented text for synthetic records)
    pub raw_text: String,

    /// Normalized text fed to the vectorizer
    pub cleaned_text: String,

    /// Hashtags in first-seen order, duplicates kept
    pub labels: Vec<String>,

    /// Whether this record was generated by augmentation
    #[serde(default)]
    pub synthetic: bool,
}

impl Record {
    /// Build a training record from raw CSV fields.
    ///
    /// Returns `None` when the cleaned text or the extracted label list is
    /// empty; such rows are excluded from training.
    pub fn from_raw(raw_text: &str, raw_tags: &str, normalizer: &TextNormalizer) -> Option<Self> {
        let labels = HashtagExtractor::extract(raw_tags);
        if labels.is_empty() {
            return None;
        }
        let cleaned_text = normalizer.normalize(raw_text);
        if cleaned_text.is_empty() {
            return None;
        }
        Some(Self {
            raw_text: raw_text.to_string(),
            cleaned_text,
            labels,
            synthetic: false,
        })
    }

    /// Create a synthetic record that inherits `source`'s labels unchanged.
    pub fn synthetic_from(source: &Record, cleaned_text: String) -> Self {
        Self {
            raw_text: cleaned_text.clone(),
            cleaned_text,
            labels: source.labels.clone(),
            synthetic: true,
        }
    }
}

/// Ordered training records: originals first, then synthetic records.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<Record>,
    original_len: usize,
}

impl Corpus {
    /// Create a corpus of original records.
    pub fn new(records: Vec<Record>) -> Self {
        let original_len = records.len();
        Self {
            records,
            original_len,
        }
    }

    /// Load and clean a corpus from a CSV file with a header row.
    ///
    /// Missing either configured column is fatal. Rows that fail to parse or
    /// yield no labels / no text are skipped and counted in the log.
    pub fn from_csv(path: &Path, data: &DataConfig) -> Result<Self, CorpusError> {
        let csv_err = |e: csv::Error| CorpusError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(csv_err)?;

        let headers = reader.headers().map_err(csv_err)?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| CorpusError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        };
        let text_idx = column(&data.text_column)?;
        let tags_idx = column(&data.tags_column)?;

        let normalizer = TextNormalizer::training();
        let mut records = Vec::new();
        let mut malformed = 0usize;
        let mut unlabeled = 0usize;

        for row in reader.records() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    tracing::debug!("Skipping malformed row in {:?}: {}", path, e);
                    malformed += 1;
                    continue;
                }
            };
            let (Some(text), Some(tags)) = (row.get(text_idx), row.get(tags_idx)) else {
                malformed += 1;
                continue;
            };
            match Record::from_raw(text, tags, &normalizer) {
                Some(record) => records.push(record),
                None => unlabeled += 1,
            }
        }

        if malformed > 0 {
            tracing::warn!("Skipped {} malformed rows in {:?}", malformed, path);
        }
        tracing::info!(
            "Loaded {} records from {:?} ({} dropped for empty text or hashtags)",
            records.len(),
            path,
            unlabeled
        );

        Ok(Self::new(records))
    }

    /// All records in order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// The original (non-synthetic) records.
    pub fn originals(&self) -> &[Record] {
        &self.records[..self.original_len]
    }

    /// The synthetic records appended by augmentation.
    pub fn synthetic(&self) -> &[Record] {
        &self.records[self.original_len..]
    }

    /// Append synthetic records after all existing records.
    pub fn extend_synthetic(&mut self, records: impl IntoIterator<Item = Record>) {
        self.records.extend(records);
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the corpus has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Cleaned texts in record order.
    pub fn texts(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.cleaned_text.as_str())
            .collect()
    }

    /// Label lists in record order.
    pub fn label_sets(&self) -> Vec<&[String]> {
        self.records.iter().map(|r| r.labels.as_slice()).collect()
    }
}
