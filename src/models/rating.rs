use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A user's rating (or visit count) for a single location
///
/// The incoming JSON number is kept as-is so integer ratings are echoed back
/// as integers. A rating of `0` means "unrated".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(serde_json::Number);

impl Rating {
    /// Numeric value used for similarity and ranking
    pub fn value(&self) -> f64 {
        self.0.as_f64().unwrap_or_default()
    }

    /// Whether the location counts as unrated
    pub fn is_unrated(&self) -> bool {
        self.value() == 0.0
    }
}

#[cfg(test)]
impl From<u64> for Rating {
    fn from(value: u64) -> Self {
        Self(value.into())
    }
}

/// Ratings of a single user, keyed by location identifier
pub type UserRatings = BTreeMap<String, Rating>;

/// All users' ratings, keyed by user identifier
///
/// Ordered maps keep iteration deterministic: users and locations are always
/// visited in lexicographic order.
pub type RatingsMatrix = BTreeMap<String, UserRatings>;
