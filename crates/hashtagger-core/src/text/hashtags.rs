//! Label extraction from the raw hashtag field.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HASHTAG_RE: Regex = Regex::new(r"#\w+").unwrap();
}

/// Pulls `#word` tokens out of a raw hashtag field.
pub struct HashtagExtractor;

impl HashtagExtractor {
    /// Extract lowercase hashtags in first-occurrence order, duplicates kept.
    ///
    /// An empty result means the row carries no usable label and must be
    /// left out of the training corpus.
    pub fn extract(raw: &str) -> Vec<String> {
        let lowered = raw.to_lowercase();
        HASHTAG_RE
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
