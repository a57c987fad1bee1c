//! Typed error for the advisor crate.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Embedding, vector-store or LLM call failed (network or non-2xx).
    #[error("transport error: {0}")]
    Transport(String),

    /// An upstream call exceeded its deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Retrieval returned no candidates where one was required.
    #[error("no matching products")]
    NotFound,

    /// Invalid advisor configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl From<catalog_store::StoreError> for AdvisorError {
    fn from(e: catalog_store::StoreError) -> Self {
        match e {
            catalog_store::StoreError::Config(msg) => AdvisorError::Config(msg),
            other => AdvisorError::Transport(other.to_string()),
        }
    }
}

impl From<ai_llm_service::AiLlmError> for AdvisorError {
    fn from(e: ai_llm_service::AiLlmError) -> Self {
        match e {
            ai_llm_service::AiLlmError::Timeout(d) => AdvisorError::Timeout(d),
            ai_llm_service::AiLlmError::Config(c) => AdvisorError::Config(c.to_string()),
            other => AdvisorError::Transport(other.to_string()),
        }
    }
}
