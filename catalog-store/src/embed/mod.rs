use futures::future::BoxFuture;

use crate::errors::StoreError;

/// Provider interface for query embeddings.
///
/// Async because real providers (Ollama, OpenAI) perform HTTP requests.
/// Implementations must be deterministic for identical input.
pub trait EmbeddingsProvider: Send + Sync {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, StoreError>>;
}

pub mod llm;
