//! Lexical perturbation of cleaned text by synonym substitution.

use rand::seq::{index, SliceRandom};
use rand::Rng;

use super::lexicon::Lexicon;

/// Texts with fewer tokens than this are returned untouched.
pub const MIN_TOKENS: usize = 3;

/// Only tokens longer than this (in characters) may be replaced.
pub const MIN_REPLACEABLE_CHARS: usize = 3;

/// Produces near-duplicate texts by swapping words for dictionary synonyms.
#[derive(Debug, Clone, Copy)]
pub struct SynonymAugmentor<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> SynonymAugmentor<'a> {
    /// Create an augmentor over an immutable lexicon.
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Replace up to `n` randomly chosen long tokens of `text` with synonyms.
    ///
    /// Positions are drawn without replacement from tokens longer than three
    /// characters. A position whose word has no synonym keeps its word, so
    /// the result may equal the input; callers decide whether to keep it.
    pub fn augment<R: Rng + ?Sized>(&self, text: &str, n: usize, rng: &mut R) -> String {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() < MIN_TOKENS {
            return text.to_string();
        }

        let candidates: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.chars().count() > MIN_REPLACEABLE_CHARS)
            .map(|(i, _)| i)
            .collect();

        let amount = n.min(candidates.len());
        let mut output: Vec<&str> = tokens.clone();
        for pick in index::sample(rng, candidates.len(), amount) {
            let position = candidates[pick];
            if let Some(synonym) = self.lexicon.synonyms(tokens[position]).choose(rng) {
                output[position] = synonym.as_str();
            }
        }

        output.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn lexicon() -> Lexicon {
        Lexicon::from_parts(
            [
                "good", "morning", "forenoon", "everyone", "everybody", "great", "bang", "day",
                "beach", "shore", "sunny", "bright",
            ],
            [
                vec!["morning", "forenoon", "morn"],
                vec!["everyone", "everybody"],
                vec!["great", "bang"],
                vec!["beach", "shore"],
                vec!["sunny", "bright"],
            ],
        )
    }

    fn differing_positions(a: &str, b: &str) -> usize {
        a.split(' ').zip(b.split(' ')).filter(|(x, y)| x != y).count()
    }

    #[test]
    fn test_short_text_returned_unchanged() {
        let lex = lexicon();
        let aug = SynonymAugmentor::new(&lex);
        let mut rng = StdRng::seed_from_u64(1);
        for text in ["", "morning", "sunny beach"] {
            assert_eq!(aug.augment(text, 5, &mut rng), text);
        }
    }

    #[test]
    fn test_single_replacement_keeps_token_count() {
        let lex = lexicon();
        let aug = SynonymAugmentor::new(&lex);
        let text = "good morning everyone have a great day";
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let out = aug.augment(text, 1, &mut rng);
            assert_eq!(out.split(' ').count(), text.split(' ').count());
            assert!(differing_positions(text, &out) <= 1, "{out}");
        }
    }

    #[test]
    fn test_some_seed_changes_text() {
        let lex = lexicon();
        let aug = SynonymAugmentor::new(&lex);
        let text = "good morning everyone have a great day";
        let changed = (0..50).any(|seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            aug.augment(text, 1, &mut rng) != text
        });
        assert!(changed);
    }

    #[test]
    fn test_short_words_never_replaced() {
        // Every long word lacks synonyms; short words have them but are not eligible
        let lex = Lexicon::from_parts(["day", "sun", "walk"], [vec!["day", "sun"]]);
        let aug = SynonymAugmentor::new(&lex);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            assert_eq!(aug.augment("day sun walking", 3, &mut rng), "day sun walking");
        }
    }

    #[test]
    fn test_n_larger_than_candidates() {
        let lex = lexicon();
        let aug = SynonymAugmentor::new(&lex);
        let mut rng = StdRng::seed_from_u64(9);
        let out = aug.augment("sunny beach morning", 10, &mut rng);
        assert_eq!(out, "bright shore forenoon");
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let lex = lexicon();
        let aug = SynonymAugmentor::new(&lex);
        let text = "sunny beach morning with everyone";
        let a = aug.augment(text, 2, &mut StdRng::seed_from_u64(42));
        let b = aug.augment(text, 2, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert!(differing_positions(text, &a) <= 2);
    }

    #[test]
    fn test_no_synonyms_returns_same_text() {
        let lex = Lexicon::default();
        let aug = SynonymAugmentor::new(&lex);
        let mut rng = StdRng::seed_from_u64(3);
        let text = "nothing here matches anything";
        assert_eq!(aug.augment(text, 1, &mut rng), text);
    }
}
