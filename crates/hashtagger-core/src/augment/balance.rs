//! Rarity-aware corpus balancing.
//!
//! Records carrying any under-represented hashtag are duplicated through
//! synonym augmentation. The frequency table is computed once and the pass
//! runs once: labels may still sit below the target afterwards, which bounds
//! the number of synthetic records at `variants_per_record` per rare record.

use std::collections::HashMap;

use rand::Rng;
use serde::Serialize;

use crate::config::AugmentationConfig;
use crate::corpus::{Corpus, Record};

use super::lexicon::Lexicon;
use super::synonym::SynonymAugmentor;

/// Label → occurrence count over a set of records.
///
/// A label repeated within one record counts once per repetition.
#[derive(Debug, Clone, Default)]
pub struct TagFrequencyTable {
    counts: HashMap<String, usize>,
}

impl TagFrequencyTable {
    /// Count every label occurrence in `records`.
    pub fn from_records(records: &[Record]) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for label in records.iter().flat_map(|r| &r.labels) {
            *counts.entry(label.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Occurrences of `label` (0 if never seen).
    pub fn count(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    /// Whether any of the record's labels occurs fewer than `target` times.
    pub fn is_rare(&self, record: &Record, target: usize) -> bool {
        record.labels.iter().any(|l| self.count(l) < target)
    }

    /// Labels below `target`, sorted by name.
    pub fn below(&self, target: usize) -> Vec<(&str, usize)> {
        let mut rare: Vec<(&str, usize)> = self
            .counts
            .iter()
            .filter(|(_, c)| **c < target)
            .map(|(l, &c)| (l.as_str(), c))
            .collect();
        rare.sort();
        rare
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no labels were counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Summary of one balancing pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BalanceReport {
    /// Records in the corpus before balancing
    pub original_records: usize,
    /// Records flagged rare
    pub rare_records: usize,
    /// Synthetic candidates produced
    pub candidates_generated: usize,
    /// Candidates kept (text differed from the source)
    pub synthetic_added: usize,
    /// Labels still below the target after the pass
    pub labels_below_target: usize,
}

/// Enlarges under-represented label classes with synthetic records.
pub struct RarityBalancer<'a> {
    augmentor: SynonymAugmentor<'a>,
    target_count: usize,
    variants_per_record: usize,
    replacements: usize,
}

impl<'a> RarityBalancer<'a> {
    /// Create a balancer from the augmentation settings.
    pub fn new(lexicon: &'a Lexicon, config: &AugmentationConfig) -> Self {
        Self {
            augmentor: SynonymAugmentor::new(lexicon),
            target_count: config.target_count,
            variants_per_record: config.variants_per_record,
            replacements: config.replacements,
        }
    }

    /// Run one balancing pass over `corpus`.
    ///
    /// Every rare record yields `variants_per_record` independent candidates;
    /// a candidate identical to its source is dropped. Kept candidates are
    /// appended after all existing records, in generation order.
    pub fn balance<R: Rng + ?Sized>(
        &self,
        mut corpus: Corpus,
        rng: &mut R,
    ) -> (Corpus, BalanceReport) {
        let table = TagFrequencyTable::from_records(corpus.records());
        let mut report = BalanceReport {
            original_records: corpus.len(),
            ..BalanceReport::default()
        };

        let mut synthetic = Vec::new();
        for record in corpus.records() {
            if !table.is_rare(record, self.target_count) {
                continue;
            }
            report.rare_records += 1;

            for _ in 0..self.variants_per_record {
                let text = self
                    .augmentor
                    .augment(&record.cleaned_text, self.replacements, rng);
                report.candidates_generated += 1;
                if text != record.cleaned_text {
                    synthetic.push(Record::synthetic_from(record, text));
                }
            }
        }

        report.synthetic_added = synthetic.len();
        corpus.extend_synthetic(synthetic);

        let after = TagFrequencyTable::from_records(corpus.records());
        report.labels_below_target = after.below(self.target_count).len();

        tracing::info!(
            "Balanced corpus: {} -> {} records ({} rare, {} of {} candidates kept)",
            report.original_records,
            corpus.len(),
            report.rare_records,
            report.synthetic_added,
            report.candidates_generated
        );
        if report.labels_below_target > 0 {
            tracing::warn!(
                "{} labels remain below target count {} after a single pass",
                report.labels_below_target,
                self.target_count
            );
        }

        (corpus, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(text: &str, labels: &[&str]) -> Record {
        Record {
            raw_text: text.to_string(),
            cleaned_text: text.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            synthetic: false,
        }
    }

    fn lexicon() -> Lexicon {
        Lexicon::from_parts(
            ["sunny", "bright", "beach", "shore", "morning", "forenoon"],
            [
                vec!["sunny", "bright"],
                vec!["beach", "shore"],
                vec!["morning", "forenoon"],
            ],
        )
    }

    fn config(target_count: usize) -> AugmentationConfig {
        AugmentationConfig {
            target_count,
            ..AugmentationConfig::default()
        }
    }

    #[test]
    fn test_frequency_counts_duplicates() {
        let records = vec![record("a b c", &["#x", "#x"]), record("d e f", &["#x", "#y"])];
        let table = TagFrequencyTable::from_records(&records);
        assert_eq!(table.count("#x"), 3);
        assert_eq!(table.count("#y"), 1);
        assert_eq!(table.count("#z"), 0);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_rarity_flags_records_with_rare_label() {
        // #a occurs 20 times, #b 3 times
        let mut records: Vec<Record> = (0..17)
            .map(|_| record("common text here", &["#a"]))
            .collect();
        records.extend((0..3).map(|_| record("rare text here", &["#a", "#b"])));
        let table = TagFrequencyTable::from_records(&records);

        for r in &records {
            let has_b = r.labels.iter().any(|l| l == "#b");
            assert_eq!(table.is_rare(r, 15), has_b);
        }
        assert_eq!(table.below(15), vec![("#b", 3)]);
    }

    #[test]
    fn test_balance_bounded_and_labels_preserved() {
        let lex = lexicon();
        let balancer = RarityBalancer::new(&lex, &config(15));
        let corpus = Corpus::new(vec![
            record("sunny beach morning", &["#x"]),
            record("bright shore today", &["#y"]),
            record("beach walk forenoon", &["#x", "#y"]),
        ]);
        let originals = corpus.records().to_vec();
        let mut rng = StdRng::seed_from_u64(7);

        let (balanced, report) = balancer.balance(corpus, &mut rng);

        assert!(balanced.len() <= originals.len() + 6);
        assert_eq!(report.rare_records, 3);
        assert_eq!(report.candidates_generated, 6);
        assert_eq!(balanced.originals(), originals.as_slice());
        for synth in balanced.synthetic() {
            assert!(synth.synthetic);
            let source = originals
                .iter()
                .find(|o| o.labels == synth.labels && o.cleaned_text != synth.cleaned_text)
                .expect("synthetic record must inherit a source's labels");
            assert_eq!(
                synth.cleaned_text.split(' ').count(),
                source.cleaned_text.split(' ').count()
            );
        }
    }

    #[test]
    fn test_identical_candidates_discarded() {
        let lex = Lexicon::default();
        let balancer = RarityBalancer::new(&lex, &config(15));
        let corpus = Corpus::new(vec![record("no synonyms anywhere here", &["#rare"])]);
        let mut rng = StdRng::seed_from_u64(1);

        let (balanced, report) = balancer.balance(corpus, &mut rng);
        assert_eq!(balanced.len(), 1);
        assert_eq!(report.candidates_generated, 2);
        assert_eq!(report.synthetic_added, 0);
        assert_eq!(report.labels_below_target, 1);
    }

    #[test]
    fn test_common_records_not_augmented() {
        let lex = lexicon();
        let balancer = RarityBalancer::new(&lex, &config(2));
        let corpus = Corpus::new(vec![
            record("sunny beach morning", &["#a"]),
            record("sunny beach morning", &["#a"]),
        ]);
        let mut rng = StdRng::seed_from_u64(3);
        let (balanced, report) = balancer.balance(corpus, &mut rng);
        assert_eq!(balanced.len(), 2);
        assert_eq!(report.rare_records, 0);
    }

    #[test]
    fn test_single_pass_does_not_iterate() {
        // One record, target far above reach: still at most two synthetic records
        let lex = lexicon();
        let balancer = RarityBalancer::new(&lex, &config(100));
        let corpus = Corpus::new(vec![record("sunny beach morning", &["#a"])]);
        let mut rng = StdRng::seed_from_u64(11);
        let (balanced, report) = balancer.balance(corpus, &mut rng);
        assert_eq!(report.synthetic_added, 2);
        assert_eq!(balanced.len(), 3);
        assert_eq!(report.labels_below_target, 1);
    }

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_labels_left_below_target_warn() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let lex = lexicon();
        let balancer = RarityBalancer::new(&lex, &config(100));
        let corpus = Corpus::new(vec![record("sunny beach morning", &["#a"])]);
        tracing::subscriber::with_default(subscriber, || {
            balancer.balance(corpus, &mut StdRng::seed_from_u64(2));
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("1 labels remain below target count 100"), "{output}");
    }

    #[test]
    fn test_balance_reproducible_with_seed() {
        let lex = lexicon();
        let balancer = RarityBalancer::new(&lex, &config(15));
        let make = || {
            Corpus::new(vec![
                record("sunny beach morning", &["#x"]),
                record("beach morning", &["#y"]),
            ])
        };
        let (a, _) = balancer.balance(make(), &mut StdRng::seed_from_u64(5));
        let (b, _) = balancer.balance(make(), &mut StdRng::seed_from_u64(5));
        assert_eq!(a.records(), b.records());
    }
}
