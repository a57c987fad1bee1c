//! Runtime configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

/// Knobs for retrieval, prompting and upstream deadlines. All fields have
/// defaults via [`AdvisorConfig::from_env`].
#[derive(Clone, Debug)]
pub struct AdvisorConfig {
    /// Nearest neighbours fetched per retrieval.
    pub search_limit: u64,
    /// Candidates handed to the model for a recommendation decision.
    pub shortlist_size: usize,
    /// Session turns rendered into prompts.
    pub history_window: usize,
    pub prompts_dir: PathBuf,
    pub retrieval_timeout: Duration,
    pub llm_timeout: Duration,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            search_limit: 5,
            shortlist_size: 3,
            history_window: 4,
            prompts_dir: PathBuf::from("data/prompts"),
            retrieval_timeout: Duration::from_secs(30),
            llm_timeout: Duration::from_secs(120),
        }
    }
}

impl AdvisorConfig {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            search_limit: parse("SEARCH_LIMIT", d.search_limit).max(1),
            shortlist_size: parse("SHORTLIST_SIZE", d.shortlist_size).max(1),
            history_window: parse("HISTORY_WINDOW", d.history_window),
            prompts_dir: std::env::var("PROMPTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(d.prompts_dir),
            retrieval_timeout: Duration::from_secs(parse("RETRIEVAL_TIMEOUT_SECS", 30u64)),
            llm_timeout: Duration::from_secs(parse("LLM_CALL_TIMEOUT_SECS", 120u64)),
        }
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}
