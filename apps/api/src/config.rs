use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub tavily_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub workflow: WorkflowConfig,
}

/// Tunables for the answering workflow. Every knob has a default; env vars
/// override individually.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Minimum similarity score for the router's embedding heuristic.
    pub similarity_threshold: f32,
    /// Top-k hits fetched per query variant (and by the router heuristic).
    pub retrieval_k: usize,
    /// Number of query rephrasings requested from the expander.
    pub expansion_variations: usize,
    /// Regenerations allowed when grading returns not-supported, after which
    /// the turn force-terminates with a reduced-confidence answer.
    pub max_regenerations: u32,
    /// Timeout applied at every node boundary that makes external calls.
    pub node_timeout: Duration,
    /// How many recent conversation messages a turn sees.
    pub history_window: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.70,
            retrieval_k: 3,
            expansion_variations: 3,
            max_regenerations: 2,
            node_timeout: Duration::from_secs(60),
            history_window: 8,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = WorkflowConfig::default();
        let workflow = WorkflowConfig {
            similarity_threshold: env_parse("ROUTE_SIMILARITY_THRESHOLD")?
                .unwrap_or(defaults.similarity_threshold),
            retrieval_k: env_parse("RETRIEVAL_K")?.unwrap_or(defaults.retrieval_k),
            expansion_variations: env_parse("EXPANSION_VARIATIONS")?
                .unwrap_or(defaults.expansion_variations),
            max_regenerations: env_parse("MAX_REGENERATIONS")?
                .unwrap_or(defaults.max_regenerations),
            node_timeout: env_parse("NODE_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.node_timeout),
            history_window: env_parse("HISTORY_WINDOW")?.unwrap_or(defaults.history_window),
        };

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            tavily_api_key: require_env("TAVILY_API_KEY")?,
            port: env_parse("PORT")?.unwrap_or(8080),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            workflow,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Parses an optional env var, erroring only when it is present but invalid.
fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("'{key}' has an invalid value")),
        Err(_) => Ok(None),
    }
}
