//! Feature and label encoding shared by training and scoring.

pub mod label_index;
pub mod sparse;
pub mod tfidf;

pub use label_index::{LabelIndex, LabelMatrix};
pub use sparse::{FeatureMatrix, SparseVector};
pub use tfidf::TfidfVectorizer;
