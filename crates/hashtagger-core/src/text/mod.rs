//! Text cleaning and label extraction for posts.

pub mod hashtags;
pub mod normalize;

pub use hashtags::HashtagExtractor;
pub use normalize::{NormalizerMode, TextNormalizer};
