//! Chat and embedding profiles loaded from environment variables.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`         = `ollama` (default) or `openai`
//! - `LLM_MODEL`        = chat model (default `llama3.2:3B`)
//! - `LLM_TEMPERATURE`  = sampling temperature (default `0.7`)
//! - `LLM_TOP_P`        = nucleus sampling (default `0.9`)
//! - `LLM_MAX_TOKENS`   = generation budget (default `512`)
//! - `LLM_TIMEOUT_SECS` = HTTP timeout for completions (default `120`)
//! - `EMBEDDING_MODEL`  = embedding model (default `all-minilm`)
//!
//! Ollama: `OLLAMA_URL` or `OLLAMA_PORT` (default `http://localhost:11434`).
//!
//! OpenAI: `OPENAI_API_KEY` (required), `OPENAI_URL` (default `https://api.openai.com`).

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, env_opt, env_opt_f32, env_opt_u32, must_env,
        validate_http_endpoint, validate_range_f32,
    },
};

const DEFAULT_CHAT_MODEL: &str = "llama3.2:3B";
const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// Resolves the provider from `LLM_KIND`, defaulting to Ollama.
fn provider() -> Result<LlmProvider, AiLlmError> {
    match env_opt("LLM_KIND") {
        Some(kind) => kind.parse(),
        None => Ok(LlmProvider::Ollama),
    }
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
/// 3. `http://localhost:11434`
fn ollama_endpoint() -> Result<String, AiLlmError> {
    if let Some(url) = env_opt("OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = env_opt("OLLAMA_PORT") {
        port.trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{}", port.trim()));
    }
    Ok(DEFAULT_OLLAMA_URL.to_string())
}

fn endpoint_and_key(provider: LlmProvider) -> Result<(String, Option<String>), AiLlmError> {
    match provider {
        LlmProvider::Ollama => Ok((ollama_endpoint()?, None)),
        LlmProvider::OpenAI => {
            let key = must_env("OPENAI_API_KEY")?;
            let url = env_opt("OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string());
            validate_http_endpoint("OPENAI_URL", &url)?;
            Ok((url, Some(key)))
        }
    }
}

/// Builds the **chat** profile used for every completion.
///
/// # Defaults
/// - `temperature = 0.7`, `top_p = 0.9`, `max_tokens = 512`
/// - `timeout_secs = 120`
pub fn config_chat() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider()?;
    let (endpoint, api_key) = endpoint_and_key(provider)?;
    let model = env_opt("LLM_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());

    let temperature = env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(0.7);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;
    let top_p = env_opt_f32("LLM_TOP_P")?.unwrap_or(0.9);
    validate_range_f32("top_p", top_p, 0.0, 1.0)?;

    let max_tokens = env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(512);
    let timeout_secs = env_opt_u32("LLM_TIMEOUT_SECS")?.unwrap_or(120);

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: Some(max_tokens),
        temperature: Some(temperature),
        top_p: Some(top_p),
        timeout_secs: Some(timeout_secs as u64),
    })
}

/// Builds the **embedding** profile used to vectorize search queries.
///
/// Must match the model the catalog was indexed with.
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    let provider = provider()?;
    let (endpoint, api_key) = endpoint_and_key(provider)?;
    let model = env_opt("EMBEDDING_MODEL").unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: Some(30),
    })
}
