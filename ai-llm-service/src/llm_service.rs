//! Shared LLM service with two profiles: `chat` and `embedding`.
//!
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Caches provider clients per config (provider+endpoint+model+key+timeout).
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{CompletionOptions, LlmService};
//! use ai_llm_service::config::default_config::{config_chat, config_embedding};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmService::new(config_chat()?, config_embedding()?, Some(10))?);
//!
//! let txt = svc.complete("Hello", CompletionOptions::default()).await?;
//! let emb = svc.embed("business laptop").await?;
//! println!("{txt} / dim={}", emb.len());
//! # Ok(()) }
//! ```

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    sync::Arc,
};

use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    config::{
        llm_model_config::{CompletionOptions, LlmModelConfig},
        llm_provider::LlmProvider,
    },
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Chat + embedding profiles with cached provider clients.
pub struct LlmService {
    chat: LlmModelConfig,
    embedding: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,

    health: HealthService,
}

impl LlmService {
    /// Creates the service. `health_timeout_secs` bounds each health probe.
    pub fn new(
        chat: LlmModelConfig,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        Ok(Self {
            chat,
            embedding,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Single-shot completion on the **chat** profile.
    pub async fn complete(
        &self,
        prompt: &str,
        opts: CompletionOptions,
    ) -> Result<String, AiLlmError> {
        debug!(provider = ?self.chat.provider, model = %self.chat.model, "complete");
        match self.chat.provider {
            LlmProvider::Ollama => self.ollama_for(&self.chat).await?.generate(prompt, opts).await,
            LlmProvider::OpenAI => self.openai_for(&self.chat).await?.generate(prompt, opts).await,
        }
    }

    /// Embedding on the **embedding** profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match self.embedding.provider {
            LlmProvider::Ollama => self.ollama_for(&self.embedding).await?.embeddings(input).await,
            LlmProvider::OpenAI => self.openai_for(&self.embedding).await?.embeddings(input).await,
        }
    }

    /// Health snapshot for the distinct profiles (identical configs are probed once).
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut list = vec![&self.chat];
        if self.embedding != self.chat {
            list.push(&self.embedding);
        }
        self.health.check_many(&list).await
    }

    /// Completion defaults of the chat profile.
    pub fn chat_defaults(&self) -> CompletionOptions {
        self.chat.completion_defaults()
    }

    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.chat, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn ollama_for(&self, cfg: &LlmModelConfig) -> Result<Arc<OllamaService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }

    async fn openai_for(&self, cfg: &LlmModelConfig) -> Result<Arc<OpenAiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.openai.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        w.insert(key, cli.clone());
        Ok(cli)
    }
}

/// Cache key identifying a unique client config.
#[derive(Clone, PartialEq, Eq)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout: cfg.timeout_secs,
        }
    }
}

impl Hash for ClientKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provider.hash(state);
        self.endpoint.hash(state);
        self.model.hash(state);
        self.api_key.hash(state);
        self.timeout.hash(state);
    }
}
