use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use crate::models::{RatingsMatrix, Recommendation, UserRatings};

use super::similarity::{Cosine, Similarity};

/// Error types for the recommender
#[derive(Debug, Error, PartialEq)]
pub enum RecommendError {
    #[error("User ID not found")]
    UserNotFound,
    #[error("top_n must be a positive integer")]
    InvalidTopN,
}

/// Sorted union of every location rated by any user
pub fn location_universe(matrix: &RatingsMatrix) -> Vec<&str> {
    matrix
        .values()
        .flat_map(|ratings| ratings.keys().map(String::as_str))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Lays out a user's ratings over the location universe, missing locations are `0.0`
pub fn user_vector(ratings: &UserRatings, universe: &[&str]) -> Vec<f64> {
    universe
        .iter()
        .map(|location| ratings.get(*location).map_or(0.0, |r| r.value()))
        .collect()
}

/// Nearest-neighbour location recommender
///
/// Finds the single user most similar to the target and suggests that user's
/// highest-rated locations the target has not rated yet.
pub struct Recommender {
    similarity: Arc<dyn Similarity>,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(Arc::new(Cosine))
    }
}

impl Recommender {
    pub fn new(similarity: Arc<dyn Similarity>) -> Self {
        Self { similarity }
    }

    /// Similarity strategy name, for logging
    pub fn strategy(&self) -> &'static str {
        self.similarity.name()
    }

    /// Returns the other user most similar to `target`, with the score
    ///
    /// Ties go to the first user in identifier order. `None` when the matrix
    /// holds no user besides the target.
    pub fn most_similar_user<'m>(
        &self,
        target: &str,
        matrix: &'m RatingsMatrix,
    ) -> Result<Option<(&'m str, f64)>, RecommendError> {
        let target_ratings = matrix.get(target).ok_or(RecommendError::UserNotFound)?;

        let universe = location_universe(matrix);
        let target_vector = user_vector(target_ratings, &universe);

        let mut best: Option<(&str, f64)> = None;
        for (user, ratings) in matrix.iter().filter(|(user, _)| user.as_str() != target) {
            let score = self
                .similarity
                .similarity(&target_vector, &user_vector(ratings, &universe));
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((user.as_str(), score));
            }
        }

        Ok(best)
    }

    /// Recommends up to `top_n` locations for `target`, best rated first
    #[instrument(skip(self, matrix), fields(users = matrix.len(), strategy = self.strategy()))]
    pub fn recommend(
        &self,
        target: &str,
        matrix: &RatingsMatrix,
        top_n: usize,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        if top_n == 0 {
            return Err(RecommendError::InvalidTopN);
        }

        let Some((similar_user, score)) = self.most_similar_user(target, matrix)? else {
            tracing::debug!("No other users to compare against");
            return Ok(Vec::new());
        };

        tracing::debug!(similar_user, score, "Selected most similar user");

        let target_ratings = &matrix[target];
        let mut candidates: Vec<Recommendation> = matrix[similar_user]
            .iter()
            .filter(|(location, _)| {
                target_ratings
                    .get(location.as_str())
                    .map_or(true, |rating| rating.is_unrated())
            })
            .map(|(location, rating)| Recommendation::new(location.clone(), rating.clone()))
            .collect();

        // Stable, so equal ratings stay in location order
        candidates.sort_by(|a, b| b.score.value().total_cmp(&a.score.value()));
        candidates.truncate(top_n);

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;
    use crate::services::similarity::NormalizedDot;

    fn matrix(value: serde_json::Value) -> RatingsMatrix {
        serde_json::from_value(value).unwrap()
    }

    fn locations(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.location.as_str()).collect()
    }

    #[test]
    fn test_location_universe_is_sorted_union() {
        let m = matrix(serde_json::json!({
            "u1": {"C": 1, "A": 2},
            "u2": {"B": 3, "A": 1},
            "u3": {}
        }));
        assert_eq!(location_universe(&m), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_user_vector_fills_missing_with_zero() {
        let m = matrix(serde_json::json!({"u1": {"B": 4, "D": 1.5}}));
        let v = user_vector(&m["u1"], &["A", "B", "C", "D"]);
        assert_eq!(v, vec![0.0, 4.0, 0.0, 1.5]);
    }

    #[test]
    fn test_scenario_basic_recommendation() {
        let m = matrix(serde_json::json!({
            "u1": {"A": 5, "B": 0},
            "u2": {"A": 4, "B": 3, "C": 2}
        }));
        let recs = Recommender::default().recommend("u1", &m, 2).unwrap();
        assert_eq!(
            recs,
            vec![
                Recommendation::new("B", Rating::from(3u64)),
                Recommendation::new("C", Rating::from(2u64)),
            ]
        );
    }

    #[test]
    fn test_unknown_user() {
        let m = matrix(serde_json::json!({"u1": {"A": 1}}));
        let result = Recommender::default().recommend("ghost", &m, 2);
        assert_eq!(result, Err(RecommendError::UserNotFound));
    }

    #[test]
    fn test_zero_top_n() {
        let m = matrix(serde_json::json!({"u1": {"A": 1}}));
        let result = Recommender::default().recommend("u1", &m, 0);
        assert_eq!(result, Err(RecommendError::InvalidTopN));
    }

    #[test]
    fn test_single_user_gets_nothing() {
        let m = matrix(serde_json::json!({"u1": {"A": 1, "B": 2}}));
        let recs = Recommender::default().recommend("u1", &m, 2).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_identical_users_similarity_is_one() {
        let m = matrix(serde_json::json!({
            "u1": {"A": 2, "B": 1},
            "u2": {"A": 2, "B": 1}
        }));
        let (user, score) = Recommender::default()
            .most_similar_user("u1", &m)
            .unwrap()
            .unwrap();
        assert_eq!(user, "u2");
        assert!((score - 1.0).abs() < 1e-9);

        // Nothing left to suggest
        let recs = Recommender::default().recommend("u1", &m, 2).unwrap();
        assert!(recs.is_empty());
    }

    #[test]
    fn test_picks_most_similar_user() {
        let m = matrix(serde_json::json!({
            "alice": {"park": 5, "museum": 1},
            "bob": {"park": 5, "museum": 1, "zoo": 4},
            "carol": {"beach": 5, "cafe": 4}
        }));
        let recs = Recommender::default().recommend("alice", &m, 5).unwrap();
        assert_eq!(locations(&recs), vec!["zoo"]);
    }

    #[test]
    fn test_ties_go_to_first_user_id() {
        // Both candidates are orthogonal to the target (similarity 0)
        let m = matrix(serde_json::json!({
            "target": {"A": 1},
            "zed": {"Z": 9},
            "amy": {"Y": 1}
        }));
        let (user, score) = Recommender::default()
            .most_similar_user("target", &m)
            .unwrap()
            .unwrap();
        assert_eq!(user, "amy");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_zero_vector_target_still_recommends() {
        let m = matrix(serde_json::json!({
            "new": {},
            "u2": {"A": 1, "B": 3}
        }));
        let recs = Recommender::default().recommend("new", &m, 2).unwrap();
        assert_eq!(locations(&recs), vec!["B", "A"]);
    }

    #[test]
    fn test_never_recommends_rated_locations() {
        let m = matrix(serde_json::json!({
            "u1": {"A": 5, "B": 2, "C": 0},
            "u2": {"A": 5, "B": 2, "C": 4, "D": 1, "E": 3}
        }));
        let recs = Recommender::default().recommend("u1", &m, 10).unwrap();
        for rec in &recs {
            let own = m["u1"].get(&rec.location);
            assert!(own.map_or(true, |r| r.is_unrated()), "{}", rec.location);
        }
        assert_eq!(locations(&recs), vec!["C", "E", "D"]);
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let m = matrix(serde_json::json!({
            "u1": {"A": 1},
            "u2": {"A": 1, "B": 2, "C": 7, "D": 4.5, "E": 3}
        }));
        let recs = Recommender::default().recommend("u1", &m, 3).unwrap();
        assert_eq!(recs.len(), 3);
        assert_eq!(locations(&recs), vec!["C", "D", "E"]);
        assert!(recs
            .windows(2)
            .all(|w| w[0].score.value() >= w[1].score.value()));
    }

    #[test]
    fn test_equal_ratings_keep_location_order() {
        let m = matrix(serde_json::json!({
            "u1": {"A": 1},
            "u2": {"A": 1, "D": 2, "B": 2, "C": 2}
        }));
        let recs = Recommender::default().recommend("u1", &m, 3).unwrap();
        assert_eq!(locations(&recs), vec!["B", "C", "D"]);
    }

    #[test]
    fn test_does_not_mutate_input() {
        let m = matrix(serde_json::json!({
            "u1": {"A": 5, "B": 0},
            "u2": {"A": 4, "B": 3, "C": 2}
        }));
        let before = m.clone();
        let _ = Recommender::default().recommend("u1", &m, 2).unwrap();
        assert_eq!(m, before);
    }

    #[test]
    fn test_large_ratings_pick_aligned_user() {
        let m = matrix(serde_json::json!({
            "t": {"A": 1e200},
            "a": {"B": 1e200, "X": 1},
            "b": {"A": 1e200, "Y": 5}
        }));
        for recommender in [
            Recommender::default(),
            Recommender::new(Arc::new(NormalizedDot)),
        ] {
            let (user, score) = recommender.most_similar_user("t", &m).unwrap().unwrap();
            assert_eq!(user, "b");
            assert!(score.is_finite() && score > 0.99);

            let recs = recommender.recommend("t", &m, 2).unwrap();
            assert_eq!(locations(&recs), vec!["Y"]);
        }
    }

    #[test]
    fn test_strategies_give_same_recommendations() {
        let m = matrix(serde_json::json!({
            "u1": {"A": 5, "B": 1},
            "u2": {"A": 1, "B": 5, "C": 3},
            "u3": {"A": 4, "B": 2, "D": 2, "E": 1}
        }));
        let manual = Recommender::default().recommend("u1", &m, 2).unwrap();
        let kernel = Recommender::new(Arc::new(NormalizedDot))
            .recommend("u1", &m, 2)
            .unwrap();
        assert_eq!(manual, kernel);
        assert_eq!(locations(&manual), vec!["D", "E"]);
    }
}
