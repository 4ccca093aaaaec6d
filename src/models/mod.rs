mod rating;
mod recommendation;

pub use rating::{Rating, RatingsMatrix, UserRatings};
pub use recommendation::{RecommendRequest, RecommendResponse, Recommendation};
