//! Unified error type for the crate.

use thiserror::Error;

/// Top-level error for catalog-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Embedding backend failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] ai_llm_service::AiLlmError),

    /// Embedding has an unexpected dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Qdrant client errors (wrapped as text).
    #[error("qdrant error: {0}")]
    Qdrant(String),
}
