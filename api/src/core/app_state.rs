use std::sync::Arc;

use advisor::{AdvisorConfig, Orchestrator};
use ai_llm_service::LlmService;
use ai_llm_service::config::default_config::{config_chat, config_embedding};
use catalog_store::StoreConfig;

use crate::error_handler::AppError;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Chat/recommendation core; owns the single conversation session.
    pub advisor: Arc<Orchestrator>,
    /// Provider service, used directly by the health probe.
    pub llm: Arc<LlmService>,
    /// Reported by `/api/health`.
    pub version: String,
    pub debug: bool,
}

impl AppState {
    /// Builds every collaborator from environment variables.
    pub async fn from_env() -> Result<Self, AppError> {
        let llm = Arc::new(LlmService::new(config_chat()?, config_embedding()?, Some(5))?);
        let advisor =
            Orchestrator::connect(llm.clone(), &StoreConfig::from_env(), AdvisorConfig::from_env())
                .await?;

        Ok(Self {
            advisor: Arc::new(advisor),
            llm,
            version: std::env::var("APP_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            debug: std::env::var("APP_DEBUG").is_ok_and(|v| v == "true" || v == "1"),
        })
    }
}
