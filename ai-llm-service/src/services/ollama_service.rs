//! Thin client for the local Ollama API:
//! - `POST {endpoint}/api/generate`   — non-streaming text generation
//! - `POST {endpoint}/api/embeddings` — single embedding vector
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::{CompletionOptions, LlmModelConfig, LlmProvider};
//! use ai_llm_service::services::ollama_service::OllamaService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = LlmModelConfig {
//!     provider: LlmProvider::Ollama,
//!     model: "llama3.2:3B".into(),
//!     endpoint: "http://localhost:11434".into(),
//!     api_key: None,
//!     max_tokens: Some(512),
//!     temperature: Some(0.7),
//!     top_p: Some(0.9),
//!     timeout_secs: Some(120),
//! };
//!
//! let svc = OllamaService::new(cfg)?;
//! let text = svc.generate("Which laptop is lightest?", CompletionOptions::default()).await?;
//! println!("{text}");
//! # Ok(()) }
//! ```

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::config::llm_model_config::{CompletionOptions, LlmModelConfig};
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{
    AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, make_snippet,
};

/// Ollama client bound to one model config.
#[derive(Debug)]
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
    url_embeddings: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - `InvalidProvider` if `cfg.provider` is not Ollama
    /// - `InvalidEndpoint` if `cfg.endpoint` is empty or lacks http/https
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(
                ProviderError::new(Provider::Ollama, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_generate = format!("{base}/api/generate");
        let url_embeddings = format!("{base}/api/embeddings");

        Ok(Self {
            client,
            cfg,
            url_generate,
            url_embeddings,
        })
    }

    /// Non-streaming generation via `/api/generate`.
    ///
    /// `opts` fields override the profile defaults when set:
    /// `temperature`, `top_p`, `num_predict` (← `max_tokens`).
    /// The returned text is trimmed.
    #[instrument(skip_all, fields(model = %self.cfg.model, prompt_len = prompt.len()))]
    pub async fn generate(
        &self,
        prompt: &str,
        opts: CompletionOptions,
    ) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = GenerateRequest::new(&self.cfg, prompt, opts);

        debug!("POST {}", self.url_generate);
        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(self.status_error(resp, &self.url_generate, started).await);
        }

        let out: GenerateResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::Decode(format!("serde error: {e}; ensure `stream=false` is used")),
            )
        })?;

        debug!(latency_ms = started.elapsed().as_millis(), "generate completed");
        Ok(out.response.trim().to_string())
    }

    /// Retrieves one embedding vector via `/api/embeddings`.
    #[instrument(skip_all, fields(model = %self.cfg.model, input_len = input.len()))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let started = Instant::now();
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            prompt: input,
        };

        debug!("POST {}", self.url_embeddings);
        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(self.status_error(resp, &self.url_embeddings, started).await);
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                Provider::Ollama,
                ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected `{{ embedding: number[] }}`"
                )),
            )
        })?;

        Ok(out.embedding)
    }

    async fn status_error(
        &self,
        resp: reqwest::Response,
        url: &str,
        started: Instant,
    ) -> AiLlmError {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let snippet = make_snippet(&text);

        error!(
            %status,
            %url,
            %snippet,
            model = %self.cfg.model,
            latency_ms = started.elapsed().as_millis(),
            "Ollama returned non-success status"
        );

        ProviderError::new(
            Provider::Ollama,
            ProviderErrorKind::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet,
            }),
        )
        .into()
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/api/generate` (non-streaming).
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

impl<'a> GenerateRequest<'a> {
    fn new(cfg: &'a LlmModelConfig, prompt: &'a str, opts: CompletionOptions) -> Self {
        Self {
            model: &cfg.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: opts.temperature.or(cfg.temperature),
                top_p: opts.top_p.or(cfg.top_p),
                num_predict: opts.max_tokens.or(cfg.max_tokens),
            },
        }
    }
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}
