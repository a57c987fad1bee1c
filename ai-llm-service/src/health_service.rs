//! Health probes for the configured LLM backends.
//!
//! - Ollama: `GET {endpoint}/api/tags`, model must be listed
//! - OpenAI: `GET {endpoint}/v1/models` with Bearer auth, model must be listed
//!
//! [`HealthService::check`] never fails: any error is folded into a
//! `HealthStatus { ok: false, .. }` so it can be served from `/api/health`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{
    AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, make_snippet,
};

/// JSON-serializable health snapshot for one profile.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub ok: bool,
    pub latency_ms: u128,
    pub message: String,
}

impl HealthStatus {
    fn new(cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: impl Into<String>) -> Self {
        Self {
            provider: format!("{:?}", cfg.provider),
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            ok,
            latency_ms,
            message: message.into(),
        }
    }
}

/// Health checker reusing a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds, default 10).
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Probes one profile; never returns an error.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let start = Instant::now();
        let result = match cfg.provider {
            LlmProvider::Ollama => self.probe_ollama(cfg).await,
            LlmProvider::OpenAI => self.probe_openai(cfg).await,
        };
        let latency = start.elapsed().as_millis();

        match result {
            Ok(true) => {
                info!(provider = ?cfg.provider, model = %cfg.model, latency_ms = latency, "health probe ok");
                HealthStatus::new(cfg, true, latency, "backend is healthy; model is available")
            }
            Ok(false) => {
                warn!(provider = ?cfg.provider, model = %cfg.model, "model not listed by backend");
                HealthStatus::new(cfg, false, latency, "backend is up, but model was not found")
            }
            Err(err) => {
                warn!(provider = ?cfg.provider, error = %err, "health probe failed");
                HealthStatus::new(cfg, false, latency, err.to_string())
            }
        }
    }

    /// Probes several profiles sequentially.
    pub async fn check_many(&self, configs: &[&LlmModelConfig]) -> Vec<HealthStatus> {
        let mut out = Vec::with_capacity(configs.len());
        for cfg in configs {
            out.push(self.check(cfg).await);
        }
        out
    }

    async fn probe_ollama(&self, cfg: &LlmModelConfig) -> Result<bool, AiLlmError> {
        #[derive(Deserialize)]
        struct Tag {
            name: String,
        }
        #[derive(Deserialize)]
        struct Tags {
            #[serde(default)]
            models: Vec<Tag>,
        }

        let url = format!("{}/api/tags", cfg.endpoint.trim_end_matches('/'));
        debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout_for(cfg))
            .send()
            .await?;
        let resp = ensure_success(Provider::Ollama, resp, url).await?;

        let tags: Tags = resp.json().await.map_err(|e| {
            ProviderError::new(Provider::Ollama, ProviderErrorKind::Decode(e.to_string()))
        })?;
        Ok(tags.models.iter().any(|m| model_matches(&m.name, &cfg.model)))
    }

    async fn probe_openai(&self, cfg: &LlmModelConfig) -> Result<bool, AiLlmError> {
        #[derive(Deserialize)]
        struct ModelItem {
            id: String,
        }
        #[derive(Deserialize)]
        struct Models {
            data: Vec<ModelItem>,
        }

        let key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::new(Provider::OpenAI, ProviderErrorKind::MissingApiKey))?;

        let url = format!("{}/v1/models", cfg.endpoint.trim_end_matches('/'));
        debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout_for(cfg))
            .header(header::AUTHORIZATION, format!("Bearer {key}"))
            .send()
            .await?;
        let resp = ensure_success(Provider::OpenAI, resp, url).await?;

        let models: Models = resp.json().await.map_err(|e| {
            ProviderError::new(Provider::OpenAI, ProviderErrorKind::Decode(e.to_string()))
        })?;
        Ok(models.data.iter().any(|m| m.id == cfg.model))
    }

    fn timeout_for(&self, cfg: &LlmModelConfig) -> Duration {
        cfg.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout)
            .min(self.default_timeout)
    }
}

async fn ensure_success(
    provider: Provider,
    resp: reqwest::Response,
    url: String,
) -> Result<reqwest::Response, AiLlmError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let snippet = make_snippet(&resp.text().await.unwrap_or_default());
    Err(ProviderError::new(
        provider,
        ProviderErrorKind::HttpStatus(HttpError {
            status,
            url,
            snippet,
        }),
    )
    .into())
}

/// Ollama lists tags with an implicit `:latest` suffix.
fn model_matches(listed: &str, wanted: &str) -> bool {
    listed == wanted || listed.strip_suffix(":latest") == Some(wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_suffix_is_ignored() {
        assert!(model_matches("all-minilm:latest", "all-minilm"));
        assert!(model_matches("llama3.2:3B", "llama3.2:3B"));
        assert!(!model_matches("llama3.2:1B", "llama3.2:3B"));
    }
}
