//! Deterministic cleaning of post text before vectorization.
//!
//! Two variants exist. The training variant strips digit runs; the inference
//! variant keeps them. Models were fitted on digit-free text, so digits seen
//! at inference simply fall outside the vectorizer vocabulary.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref TRAINING_NOISE_RE: Regex = Regex::new(r"http\S+|@\S+|\d+").unwrap();
    static ref INFERENCE_NOISE_RE: Regex = Regex::new(r"https?://\S+|@\S+").unwrap();
    static ref EMOJI_RE: Regex = Regex::new(
        r"[\p{Extended_Pictographic}\p{Emoji_Modifier}\x{1F1E6}-\x{1F1FF}\x{200D}\x{FE0E}\x{FE0F}\x{20E3}]"
    )
    .unwrap();
    static ref PUNCTUATION_RE: Regex = Regex::new(r"[\p{P}[:punct:]]").unwrap();
}

/// Which side of the pipeline the text is being cleaned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizerMode {
    /// Corpus cleaning: URLs, mentions and digit runs are removed.
    #[default]
    Training,
    /// Suggestion input: `http(s)://` URLs and mentions are removed, digits kept.
    Inference,
}

/// Lowercases text and strips URLs, mentions, emoji and punctuation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNormalizer {
    mode: NormalizerMode,
}

impl TextNormalizer {
    /// Create a normalizer for the given mode.
    pub fn new(mode: NormalizerMode) -> Self {
        Self { mode }
    }

    /// Normalizer used when cleaning the training corpus.
    pub fn training() -> Self {
        Self::new(NormalizerMode::Training)
    }

    /// Normalizer used on text submitted for suggestions.
    pub fn inference() -> Self {
        Self::new(NormalizerMode::Inference)
    }

    /// The mode this normalizer runs in.
    pub fn mode(&self) -> NormalizerMode {
        self.mode
    }

    /// Normalize `text` to a lowercase, single-space-joined token sequence.
    ///
    /// Out-of-dictionary words are kept. Removing punctuation can join
    /// fragments into a new URL or mention (`h.ttp://x`), so passes repeat
    /// until the output is stable; the result is therefore idempotent.
    pub fn normalize(&self, text: &str) -> String {
        let mut current = self.pass(text);
        // Each pass only removes characters, so this converges.
        loop {
            let next = self.pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn pass(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let noise = match self.mode {
            NormalizerMode::Training => &*TRAINING_NOISE_RE,
            NormalizerMode::Inference => &*INFERENCE_NOISE_RE,
        };
        let stripped = noise.replace_all(&lowered, "");
        let stripped = EMOJI_RE.replace_all(&stripped, "");
        let stripped = PUNCTUATION_RE.replace_all(&stripped, "");
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_strips_noise() {
        let n = TextNormalizer::training();
        let out = n.normalize("Check https://t.co/xyz @Friend!! Day 42 of #Summer 🌞🔥");
        assert_eq!(out, "check day of summer");
    }

    #[test]
    fn test_inference_keeps_digits() {
        let n = TextNormalizer::inference();
        assert_eq!(n.normalize("Top 10 beaches, 2024!"), "top 10 beaches 2024");
        assert_eq!(
            TextNormalizer::training().normalize("Top 10 beaches, 2024!"),
            "top beaches"
        );
    }

    #[test]
    fn test_inference_only_strips_scheme_urls() {
        let n = TextNormalizer::inference();
        assert_eq!(n.normalize("visit https://x.io now"), "visit now");
        // Bare "http" words are not URLs at inference time
        assert_eq!(n.normalize("httpd logs"), "httpd logs");
        assert_eq!(TextNormalizer::training().normalize("httpd logs"), "logs");
    }

    #[test]
    fn test_keeps_out_of_dictionary_words() {
        let n = TextNormalizer::training();
        assert_eq!(n.normalize("Sooo   HYPED   rn"), "sooo hyped rn");
    }

    #[test]
    fn test_strips_unicode_punctuation() {
        let n = TextNormalizer::training();
        assert_eq!(n.normalize("“Quoted” — text…"), "quoted text");
    }

    #[test]
    fn test_empty_and_noise_only() {
        let n = TextNormalizer::training();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize("@someone 123 😂 !!!"), "");
    }

    #[test]
    fn test_idempotent_when_punctuation_reveals_url() {
        let n = TextNormalizer::training();
        let once = n.normalize("go h.ttps://site now a.@b");
        assert_eq!(once, "go now a");
        assert_eq!(n.normalize(&once), once);

        let n = TextNormalizer::inference();
        let once = n.normalize("go h.ttps://site now a.@b");
        assert_eq!(n.normalize(&once), once);
        assert!(!once.contains('@'));
    }

    #[test]
    fn test_idempotent_on_samples() {
        let samples = [
            "Good Morning EVERYONE!!! Have a great day :) 😀",
            "RT @user: 5 tips → https://bit.ly/abc #growth",
            "ÉCOLE d'été – 3ème édition",
            "   ",
            "emoji👨‍👩‍👧family 🇫🇷 flag",
        ];
        let n = TextNormalizer::training();
        for s in samples {
            let once = n.normalize(s);
            assert_eq!(n.normalize(&once), once, "not idempotent for {s:?}");
            assert!(!once.chars().any(|c| c.is_ascii_punctuation()));
            assert!(!once.chars().any(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_removes_emoji_sequences() {
        let n = TextNormalizer::training();
        assert_eq!(n.normalize("emoji👨‍👩‍👧family 🇫🇷 flag"), "emojifamily flag");
    }
}
