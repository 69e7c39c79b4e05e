//! Inference: raw text in, ranked hashtags out.

use std::path::Path;

use crate::artifacts::TrainedArtifactSet;
use crate::config::SuggestConfig;
use crate::error::ArtifactError;
use crate::model::Scored;
use crate::text::TextNormalizer;

/// Suggestions for one input text.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// The text as given
    pub text: String,
    /// The text after inference-mode normalization
    pub cleaned_text: String,
    /// Ranked labels or the unrecognized-input sentinel
    pub outcome: Scored,
}

impl Suggestion {
    /// Ranked hashtags; empty when the input was not recognized.
    pub fn hashtags(&self) -> &[String] {
        match &self.outcome {
            Scored::Ranked(labels) => labels,
            Scored::UnrecognizedInput => &[],
        }
    }

    /// Whether any term of the text was in the training vocabulary.
    pub fn is_recognized(&self) -> bool {
        matches!(self.outcome, Scored::Ranked(_))
    }
}

/// Scores texts against a loaded artifact set.
pub struct Suggester {
    artifacts: TrainedArtifactSet,
    normalizer: TextNormalizer,
    top_k: usize,
}

impl Suggester {
    pub fn new(artifacts: TrainedArtifactSet, config: &SuggestConfig) -> Self {
        Self {
            artifacts,
            normalizer: TextNormalizer::inference(),
            top_k: config.top_k,
        }
    }

    /// Load the artifact set from `dir`.
    pub fn load(dir: &Path, config: &SuggestConfig) -> Result<Self, ArtifactError> {
        Ok(Self::new(TrainedArtifactSet::load(dir)?, config))
    }

    pub fn artifacts(&self) -> &TrainedArtifactSet {
        &self.artifacts
    }

    /// Clean, vectorize and score one text.
    pub fn suggest(&self, text: &str) -> Suggestion {
        let cleaned_text = self.normalizer.normalize(text);
        let features = self.artifacts.vectorizer().transform(&cleaned_text);
        let outcome = self.artifacts.scorer(self.top_k).score(&features);
        tracing::debug!(
            "Scored {:?}: {} known terms, recognized={}",
            cleaned_text,
            features.nnz(),
            matches!(outcome, Scored::Ranked(_))
        );
        Suggestion {
            text: text.to_string(),
            cleaned_text,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FeaturesConfig, TrainingConfig};
    use crate::features::{LabelIndex, TfidfVectorizer};
    use crate::model::ensemble::fit_one;
    use crate::model::ClassifierKind;

    fn suggester(top_k: usize) -> Suggester {
        let docs = [
            "sunny beach day",
            "beach waves sunny",
            "city lights night",
            "night city walk",
            "coffee morning",
            "morning coffee cup",
        ];
        let sets: Vec<Vec<String>> = ["#beach", "#beach", "#city", "#city", "#coffee", "#coffee"]
            .iter()
            .map(|s| vec![s.to_string()])
            .collect();
        let vectorizer = TfidfVectorizer::fit(&docs, &FeaturesConfig::default()).unwrap();
        let index = LabelIndex::fit(&sets);
        let x = vectorizer.transform_all(&docs);
        let y = index.binarize(&sets);
        let models = ClassifierKind::ALL
            .iter()
            .map(|&k| fit_one(k, &x, &y, &TrainingConfig::default(), 0))
            .collect();
        let artifacts = TrainedArtifactSet::new(vectorizer, index, models).unwrap();
        Suggester::new(artifacts, &SuggestConfig { top_k })
    }

    #[test]
    fn test_suggest_ranks_matching_label_first() {
        let s = suggester(6);
        let result = s.suggest("What a SUNNY day at the beach!!! http://pic.example/1");
        assert!(result.is_recognized());
        assert_eq!(result.cleaned_text, "what a sunny day at the beach");
        assert_eq!(result.hashtags()[0], "#beach");
        // Only three labels exist
        assert_eq!(result.hashtags().len(), 3);
    }

    #[test]
    fn test_unknown_words_are_unrecognized() {
        let s = suggester(6);
        let result = s.suggest("zebra xylophone");
        assert!(!result.is_recognized());
        assert!(result.hashtags().is_empty());
        assert_eq!(result.outcome, Scored::UnrecognizedInput);
    }

    #[test]
    fn test_empty_text_is_unrecognized() {
        let s = suggester(6);
        assert_eq!(s.suggest("   ").outcome, Scored::UnrecognizedInput);
        assert_eq!(s.suggest("@only_a_mention").outcome, Scored::UnrecognizedInput);
    }

    #[test]
    fn test_top_k_limits_results() {
        let s = suggester(1);
        assert_eq!(s.suggest("late night city").hashtags(), &["#city"]);
    }
}
