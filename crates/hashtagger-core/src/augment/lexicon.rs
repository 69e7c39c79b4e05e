//! Dictionary and synonym tables used by synonym augmentation.
//!
//! Two files are read from the lexicon directory:
//! - `dictionary.txt`: one accepted English word per line
//! - `synsets.txt`: `<synset id>\t<lemma>|<lemma>|...`, WordNet-style lemma
//!   names where `_` and `-` stand for spaces
//!
//! Both are plain exports of WordNet. With NLTK's `wordnet` corpus, the
//! dictionary is `wn.words()` written one per line, and each synset line is
//! `s.name()` followed by a tab and `"|".join(s.lemma_names())`. A missing
//! file yields an empty table, which disables augmentation.
//!
//! The dictionary only validates synonym candidates. It never filters the
//! tokens of an input text.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use crate::error::CorpusError;

/// Accepted dictionary words.
#[derive(Debug, Clone, Default)]
pub struct ReferenceVocabulary {
    words: HashSet<String>,
}

impl ReferenceVocabulary {
    /// Build from an iterator of words (lowercased, trimmed, blanks dropped).
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Whether `word` is an accepted dictionary word.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Word → replacement candidates, pre-filtered against the dictionary.
///
/// Candidates are kept sorted so a seeded RNG picks the same replacement on
/// every run.
#[derive(Debug, Clone, Default)]
pub struct SynonymIndex {
    entries: HashMap<String, Vec<String>>,
}

impl SynonymIndex {
    /// Build the index from synonym groups.
    ///
    /// Every lemma in a group becomes a candidate for every other lemma of
    /// the group, excluding the word itself, multi-word lemmas, and anything
    /// the dictionary rejects. A replacement is always exactly one token.
    pub fn build<G, S>(groups: G, vocabulary: &ReferenceVocabulary) -> Self
    where
        G: IntoIterator,
        G::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sets: HashMap<String, BTreeSet<String>> = HashMap::new();

        for group in groups {
            let lemmas: Vec<String> = group
                .into_iter()
                .map(|l| normalize_lemma(l.as_ref()))
                .filter(|l| !l.is_empty())
                .collect();

            for word in &lemmas {
                let candidates = sets.entry(word.clone()).or_default();
                for candidate in &lemmas {
                    if candidate != word
                        && !candidate.contains(' ')
                        && vocabulary.contains(candidate)
                    {
                        candidates.insert(candidate.clone());
                    }
                }
            }
        }

        let entries = sets
            .into_iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(word, set)| (word, set.into_iter().collect()))
            .collect();

        Self { entries }
    }

    /// Replacement candidates for `word`. Empty when there are none.
    pub fn synonyms(&self, word: &str) -> &[String] {
        self.entries.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of words with at least one candidate.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no word has a candidate.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_lemma(lemma: &str) -> String {
    lemma.trim().replace(['_', '-'], " ").to_lowercase()
}

/// Immutable lexical context shared by augmentation.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    vocabulary: ReferenceVocabulary,
    synonyms: SynonymIndex,
}

impl Lexicon {
    /// Create a lexicon from already-built parts.
    pub fn new(vocabulary: ReferenceVocabulary, synonyms: SynonymIndex) -> Self {
        Self {
            vocabulary,
            synonyms,
        }
    }

    /// Build a lexicon from a word list and synonym groups.
    pub fn from_parts<W, S, G, L>(words: W, groups: G) -> Self
    where
        W: IntoIterator<Item = S>,
        S: AsRef<str>,
        G: IntoIterator,
        G::Item: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        let vocabulary = ReferenceVocabulary::from_words(words);
        let synonyms = SynonymIndex::build(groups, &vocabulary);
        Self::new(vocabulary, synonyms)
    }

    /// Load `dictionary.txt` and `synsets.txt` from `dir`.
    ///
    /// Missing files yield an empty table with a warning; augmentation then
    /// finds no synonyms and every candidate is discarded. Read failures on
    /// files that exist are errors.
    pub fn load(dir: &Path) -> Result<Self, CorpusError> {
        let dict_path = dir.join("dictionary.txt");
        let words: Vec<String> = read_lines(&dict_path)?
            .into_iter()
            .filter(|l| !l.starts_with('#'))
            .collect();

        let synsets_path = dir.join("synsets.txt");
        let groups: Vec<Vec<String>> = read_lines(&synsets_path)?
            .into_iter()
            .filter(|l| !l.starts_with('#'))
            .filter_map(|line| {
                let (_, lemmas) = line.split_once('\t')?;
                Some(lemmas.split('|').map(str::to_string).collect())
            })
            .collect();

        let lexicon = Self::from_parts(words, &groups);

        tracing::info!(
            "Loaded lexicon: {} dictionary words, {} synsets, {} words with synonyms",
            lexicon.vocabulary.len(),
            groups.len(),
            lexicon.synonyms.len()
        );

        Ok(lexicon)
    }

    /// The reference dictionary.
    pub fn vocabulary(&self) -> &ReferenceVocabulary {
        &self.vocabulary
    }

    /// Replacement candidates for `word`.
    pub fn synonyms(&self, word: &str) -> &[String] {
        self.synonyms.synonyms(word)
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>, CorpusError> {
    if !path.exists() {
        tracing::warn!(
            "Lexicon file not found: {:?} (expected a WordNet export, see `hashtagger config init`)",
            path
        );
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| CorpusError::Lexicon {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_synonyms_filtered_by_dictionary() {
        let lexicon = Lexicon::from_parts(
            ["happy", "glad", "felicitous"],
            [vec!["happy", "glad", "well_chosen"], vec!["happy", "felicitous"]],
        );
        assert_eq!(lexicon.synonyms("happy"), &["felicitous", "glad"]);
        // "well chosen" is not a dictionary word
        assert_eq!(lexicon.synonyms("glad"), &["happy"]);
    }

    #[test]
    fn test_word_never_its_own_synonym() {
        let lexicon = Lexicon::from_parts(["run"], [vec!["run", "Run", "run"]]);
        assert!(lexicon.synonyms("run").is_empty());
    }

    #[test]
    fn test_lookup_miss_is_empty() {
        let lexicon = Lexicon::default();
        assert!(lexicon.synonyms("anything").is_empty());
    }

    #[test]
    fn test_multi_word_lemmas_never_become_candidates() {
        let lexicon = Lexicon::from_parts(
            ["look up", "search", "seek"],
            [vec!["search", "look_up", "seek"], vec!["e-mail", "mail"]],
        );
        assert_eq!(lexicon.synonyms("search"), &["seek"]);
        // Multi-word keys still resolve to single-word candidates
        assert_eq!(lexicon.synonyms("look up"), &["search", "seek"]);
        assert!(lexicon.synonyms("mail").is_empty());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut f = std::fs::File::create(dir.path().join("dictionary.txt")).unwrap();
        writeln!(f, "# words").unwrap();
        writeln!(f, "Morning\nforenoon\nbeach\nshore").unwrap();
        let mut f = std::fs::File::create(dir.path().join("synsets.txt")).unwrap();
        writeln!(f, "# synsets").unwrap();
        writeln!(f, "morning.n.01\tmorning|morn|forenoon").unwrap();
        writeln!(f, "beach.n.01\tbeach|shore").unwrap();
        writeln!(f, "malformed line without tab").unwrap();

        let lexicon = Lexicon::load(dir.path()).unwrap();
        assert_eq!(lexicon.vocabulary().len(), 4);
        assert_eq!(lexicon.synonyms("morning"), &["forenoon"]);
        assert_eq!(lexicon.synonyms("shore"), &["beach"]);
        assert_eq!(lexicon.synonyms("morn"), &["forenoon", "morning"]);
    }

    #[test]
    fn test_load_missing_files_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let lexicon = Lexicon::load(dir.path()).unwrap();
        assert!(lexicon.vocabulary().is_empty());
        assert!(lexicon.synonyms("morning").is_empty());
    }
}
