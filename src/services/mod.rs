pub mod recommender;
pub mod similarity;

pub use recommender::{RecommendError, Recommender};
pub use similarity::{Similarity, SimilarityKind};
