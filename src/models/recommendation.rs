use serde::{Deserialize, Serialize};

use super::{Rating, RatingsMatrix};

/// A single suggested location with the rating the similar user gave it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub location: String,
    pub score: Rating,
}

impl Recommendation {
    pub fn new(location: impl Into<String>, score: Rating) -> Self {
        Self {
            location: location.into(),
            score,
        }
    }
}

/// Request body for `POST /recommend`
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub user_id: String,
    pub user_location_matrix: RatingsMatrix,
    /// Maximum number of recommendations, falls back to the configured default
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// Response body for `POST /recommend`
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub user_id: String,
    pub recommendations: Vec<Recommendation>,
}
