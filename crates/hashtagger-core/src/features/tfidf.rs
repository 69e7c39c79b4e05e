//! TF-IDF vectorizer over word n-grams.
//!
//! Tokens are runs of two or more word characters. The vocabulary keeps the
//! `max_features` n-grams with the highest corpus frequency and is indexed
//! in lexicographic order. Weights use smoothed IDF,
//! `ln((1 + n) / (1 + df)) + 1`, and each row is L2-normalized.

use std::collections::{BTreeMap, HashMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::FeaturesConfig;
use crate::error::TrainingError;

use super::sparse::{FeatureMatrix, SparseVector};

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

/// On-disk form of a fitted vectorizer.
#[derive(Clone, Serialize, Deserialize)]
struct TfidfState {
    ngram_min: usize,
    ngram_max: usize,
    terms: Vec<String>,
    idf: Vec<f64>,
}

/// Fitted TF-IDF vectorizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TfidfState", into = "TfidfState")]
pub struct TfidfVectorizer {
    ngram_min: usize,
    ngram_max: usize,
    terms: Vec<String>,
    idf: Vec<f64>,
    index: HashMap<String, usize>,
}

impl TryFrom<TfidfState> for TfidfVectorizer {
    type Error = String;

    /// Rejects states whose n-gram range, IDF length or term list could not
    /// have come from [`TfidfVectorizer::fit`].
    fn try_from(state: TfidfState) -> Result<Self, Self::Error> {
        if state.ngram_min == 0 || state.ngram_min > state.ngram_max {
            return Err(format!(
                "invalid n-gram range {}..={}",
                state.ngram_min, state.ngram_max
            ));
        }
        if state.idf.len() != state.terms.len() {
            return Err(format!(
                "{} idf weights for {} terms",
                state.idf.len(),
                state.terms.len()
            ));
        }
        if let Some(w) = state.idf.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(format!("idf weight {} is not a positive number", w));
        }

        let mut index = HashMap::with_capacity(state.terms.len());
        for (i, term) in state.terms.iter().enumerate() {
            if index.insert(term.clone(), i).is_some() {
                return Err(format!("duplicate term {:?}", term));
            }
        }
        Ok(Self {
            ngram_min: state.ngram_min,
            ngram_max: state.ngram_max,
            terms: state.terms,
            idf: state.idf,
            index,
        })
    }
}

impl From<TfidfVectorizer> for TfidfState {
    fn from(v: TfidfVectorizer) -> Self {
        Self {
            ngram_min: v.ngram_min,
            ngram_max: v.ngram_max,
            terms: v.terms,
            idf: v.idf,
        }
    }
}

impl TfidfVectorizer {
    /// Learn the vocabulary and IDF weights from `documents`.
    pub fn fit(documents: &[&str], config: &FeaturesConfig) -> Result<Self, TrainingError> {
        let (ngram_min, ngram_max) = (config.ngram_min, config.ngram_max);

        // BTreeMap keeps candidate terms in lexicographic order.
        let mut term_freq: BTreeMap<String, usize> = BTreeMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let grams = ngrams(doc, ngram_min, ngram_max);
            let mut seen: HashSet<&str> = HashSet::new();
            for gram in &grams {
                *term_freq.entry(gram.clone()).or_insert(0) += 1;
                if seen.insert(gram.as_str()) {
                    *doc_freq.entry(gram.clone()).or_insert(0) += 1;
                }
            }
        }

        if term_freq.is_empty() {
            return Err(TrainingError::EmptyVocabulary);
        }

        let mut ranked: Vec<(&String, usize)> = term_freq.iter().map(|(t, &f)| (t, f)).collect();
        // Stable sort over lexicographic input: ties keep alphabetical order.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(config.max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(t, _)| t.clone()).collect();
        terms.sort();

        let n_docs = documents.len() as f64;
        let idf = terms
            .iter()
            .map(|t| {
                let df = doc_freq.get(t).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        tracing::info!(
            "Fitted TF-IDF: {} of {} candidate n-grams kept ({}..={})",
            terms.len(),
            term_freq.len(),
            ngram_min,
            ngram_max
        );

        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Ok(Self {
            ngram_min,
            ngram_max,
            terms,
            idf,
            index,
        })
    }

    /// Encode one cleaned text. Unknown n-grams are ignored, so a text with
    /// no known n-gram yields the zero vector.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for gram in ngrams(document, self.ngram_min, self.ngram_max) {
            if let Some(&i) = self.index.get(&gram) {
                *counts.entry(i).or_insert(0.0) += 1.0;
            }
        }

        let mut pairs: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(i, tf)| (i, tf * self.idf[i]))
            .collect();

        let norm = pairs.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, v) in &mut pairs {
                *v /= norm;
            }
        }

        SparseVector::from_pairs(pairs)
    }

    /// Encode many texts into a matrix.
    pub fn transform_all(&self, documents: &[&str]) -> FeatureMatrix {
        let rows = documents.iter().map(|d| self.transform(d)).collect();
        FeatureMatrix::new(rows, self.n_features())
    }

    /// Vocabulary size.
    pub fn n_features(&self) -> usize {
        self.terms.len()
    }

    /// Vocabulary terms in index order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Index of a term, if it is in the vocabulary.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }
}

/// Word n-grams of `text` for every length in `min..=max`.
fn ngrams(text: &str, min: usize, max: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = TOKEN_RE.find_iter(&lowered).map(|m| m.as_str()).collect();
    let mut grams = Vec::new();
    for n in min..=max {
        if n == 0 || n > tokens.len() {
            continue;
        }
        grams.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    grams
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_features: usize) -> FeaturesConfig {
        FeaturesConfig {
            max_features,
            ..FeaturesConfig::default()
        }
    }

    #[test]
    fn test_ngrams_skip_single_char_tokens() {
        let grams = ngrams("a good day", 1, 2);
        assert_eq!(grams, vec!["good", "day", "good day"]);
    }

    #[test]
    fn test_fit_vocabulary_sorted_with_bigrams() {
        let docs = ["sunny beach day", "rainy beach"];
        let v = TfidfVectorizer::fit(&docs, &config(100)).unwrap();
        assert_eq!(
            v.terms(),
            &["beach", "beach day", "day", "rainy", "rainy beach", "sunny", "sunny beach"]
        );
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let docs = ["beach beach sun", "beach sun", "rain"];
        let cfg = FeaturesConfig {
            max_features: 2,
            ngram_min: 1,
            ngram_max: 1,
        };
        let v = TfidfVectorizer::fit(&docs, &cfg).unwrap();
        assert_eq!(v.terms(), &["beach", "sun"]);
    }

    #[test]
    fn test_idf_smoothing() {
        let docs = ["beach", "beach sun"];
        let cfg = FeaturesConfig {
            max_features: 10,
            ngram_min: 1,
            ngram_max: 1,
        };
        let v = TfidfVectorizer::fit(&docs, &cfg).unwrap();
        // beach: df = 2 → idf = ln(3/3) + 1 = 1; sun: df = 1 → ln(3/2) + 1
        let x = v.transform("beach sun");
        let pairs: Vec<_> = x.iter().collect();
        let sun_idf = (1.5f64).ln() + 1.0;
        let norm = (1.0 + sun_idf * sun_idf).sqrt();
        assert!((pairs[0].1 - 1.0 / norm).abs() < 1e-12);
        assert!((pairs[1].1 - sun_idf / norm).abs() < 1e-12);
    }

    #[test]
    fn test_transform_unknown_text_is_zero() {
        let docs = ["sunny beach day"];
        let v = TfidfVectorizer::fit(&docs, &config(100)).unwrap();
        assert!(v.transform("completely unrelated words").is_zero());
        assert!(v.transform("").is_zero());
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let docs = ["sunny beach day", "rainy beach", "sunny morning"];
        let v = TfidfVectorizer::fit(&docs, &config(100)).unwrap();
        let x = v.transform("sunny beach sunny");
        assert!((x.squared_norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_corpus_is_error() {
        let docs = ["a b c", ""];
        let err = TfidfVectorizer::fit(&docs, &config(100)).unwrap_err();
        assert!(matches!(err, TrainingError::EmptyVocabulary));
    }

    #[test]
    fn test_deserialize_rejects_inconsistent_state() {
        let docs = ["sunny beach day", "rainy beach"];
        let v = TfidfVectorizer::fit(&docs, &config(100)).unwrap();
        let valid = serde_json::to_value(&v).unwrap();

        let mut short_idf = valid.clone();
        short_idf["idf"] = serde_json::json!([1.0]);
        let err = serde_json::from_value::<TfidfVectorizer>(short_idf).unwrap_err();
        assert!(err.to_string().contains("idf weights"));

        let mut inverted = valid.clone();
        inverted["ngram_min"] = serde_json::json!(3);
        assert!(serde_json::from_value::<TfidfVectorizer>(inverted).is_err());

        let mut zero_min = valid.clone();
        zero_min["ngram_min"] = serde_json::json!(0);
        assert!(serde_json::from_value::<TfidfVectorizer>(zero_min).is_err());

        let mut duplicated = valid.clone();
        duplicated["terms"][1] = duplicated["terms"][0].clone();
        let err = serde_json::from_value::<TfidfVectorizer>(duplicated).unwrap_err();
        assert!(err.to_string().contains("duplicate term"));

        assert!(serde_json::from_value::<TfidfVectorizer>(valid).is_ok());
    }

    #[test]
    fn test_serde_roundtrip_rebuilds_index() {
        let docs = ["sunny beach day", "rainy beach"];
        let v = TfidfVectorizer::fit(&docs, &config(100)).unwrap();
        let json = serde_json::to_string(&v).unwrap();
        let restored: TfidfVectorizer = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.term_index("rainy beach"), v.term_index("rainy beach"));
        assert_eq!(restored.transform("sunny beach"), v.transform("sunny beach"));
    }
}
