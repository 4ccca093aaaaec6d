use std::sync::Arc;

use crate::config::Config;
use crate::services::Recommender;

/// Shared, read-only application state
///
/// Requests carry all the data they need, so nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub recommender: Arc<Recommender>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    /// Builds the state from configuration, selecting the similarity strategy
    pub fn new(config: Config) -> Self {
        let recommender = Recommender::new(config.similarity.into_strategy());
        Self {
            config: Arc::new(config),
            recommender: Arc::new(recommender),
        }
    }
}
