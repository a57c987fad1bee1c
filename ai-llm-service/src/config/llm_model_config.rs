use crate::config::llm_provider::LlmProvider;

/// Configuration for one LLM profile (chat or embedding).
///
/// # Fields
///
/// - `provider`: backend that serves the model.
/// - `model`: model identifier (e.g. `"llama3.2:3B"`, `"gpt-4o-mini"`).
/// - `endpoint`: base URL of the backend, without API path.
/// - `api_key`: required for OpenAI, ignored by Ollama.
/// - `max_tokens`: default generation budget for completions.
/// - `temperature`: default sampling temperature for completions.
/// - `top_p`: nucleus sampling cutoff.
/// - `timeout_secs`: HTTP client timeout.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Ollama,
///     model: "llama3.2:3B".to_string(),
///     endpoint: "http://localhost:11434".to_string(),
///     api_key: None,
///     max_tokens: Some(512),
///     temperature: Some(0.7),
///     top_p: Some(0.9),
///     timeout_secs: Some(120),
/// };
/// assert_eq!(cfg.completion_defaults().max_tokens, Some(512));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Completion options derived from this profile.
    pub fn completion_defaults(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens,
        }
    }
}

/// Per-call sampling knobs for a single, non-streaming completion.
///
/// `None` fields are omitted from the provider request.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
}
