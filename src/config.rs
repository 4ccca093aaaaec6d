use serde::Deserialize;

use crate::services::SimilarityKind;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of recommendations returned when the request doesn't ask for a count
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Similarity strategy: `cosine` or `normalized_dot`
    #[serde(default)]
    pub similarity: SimilarityKind,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_top_n() -> usize {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_top_n: default_top_n(),
            similarity: SimilarityKind::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        if config.default_top_n == 0 {
            anyhow::bail!("DEFAULT_TOP_N must be a positive integer");
        }
        Ok(config)
    }

    /// Socket address to bind, `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
