//! Completion backend seam.

use std::sync::Arc;

use ai_llm_service::{AiLlmError, CompletionOptions, LlmService};
use futures::future::BoxFuture;

/// Single-shot, non-streaming text completion.
pub trait LlmBackend: Send + Sync {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        opts: CompletionOptions,
    ) -> BoxFuture<'a, Result<String, AiLlmError>>;

    /// Sampling defaults used when a caller has no override.
    fn defaults(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(0.7),
            top_p: Some(0.9),
            max_tokens: Some(512),
        }
    }
}

/// [`LlmBackend`] over the shared provider service (chat profile).
#[derive(Clone)]
pub struct ServiceBackend {
    svc: Arc<LlmService>,
}

impl ServiceBackend {
    pub fn new(svc: Arc<LlmService>) -> Self {
        Self { svc }
    }
}

impl LlmBackend for ServiceBackend {
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        opts: CompletionOptions,
    ) -> BoxFuture<'a, Result<String, AiLlmError>> {
        Box::pin(self.svc.complete(prompt, opts))
    }

    fn defaults(&self) -> CompletionOptions {
        self.svc.chat_defaults()
    }
}
