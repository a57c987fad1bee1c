//! Embedding provider backed by the shared [`LlmService`].

use std::sync::Arc;

use ai_llm_service::LlmService;
use futures::future::BoxFuture;
use tracing::warn;

use crate::{EmbeddingsProvider, StoreError};

/// Embeds text with the service's embedding profile and checks the
/// dimension against the collection.
#[derive(Clone)]
pub struct LlmEmbedder {
    svc: Arc<LlmService>,
    dim: usize,
}

impl LlmEmbedder {
    pub fn new(svc: Arc<LlmService>, dim: usize) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, StoreError>> {
        Box::pin(async move {
            let v = self.svc.embed(text).await?;
            if v.len() != self.dim {
                warn!(got = v.len(), want = self.dim, "embedding dimension mismatch");
                return Err(StoreError::VectorSizeMismatch {
                    got: v.len(),
                    want: self.dim,
                });
            }
            Ok(v)
        })
    }
}
