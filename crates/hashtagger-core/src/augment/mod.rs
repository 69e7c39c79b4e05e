//! Rarity-aware synthetic data augmentation.
//!
//! Under-represented hashtags get extra training examples generated by
//! swapping words in their posts for dictionary synonyms.

pub mod balance;
pub mod lexicon;
pub mod synonym;

pub use balance::{BalanceReport, RarityBalancer, TagFrequencyTable};
pub use lexicon::{Lexicon, ReferenceVocabulary, SynonymIndex};
pub use synonym::SynonymAugmentor;
