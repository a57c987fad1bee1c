use std::str::FromStr;

use crate::error_handler::{AiLlmError, ConfigError};

/// Backend used for completions and embeddings.
///
/// Selected through `LLM_KIND` (`ollama` or `openai`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local Ollama runtime (`/api/generate`, `/api/embeddings`).
    Ollama,
    /// OpenAI-compatible REST API (`/v1/chat/completions`, `/v1/embeddings`).
    OpenAI,
}

impl FromStr for LlmProvider {
    type Err = AiLlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(LlmProvider::Ollama),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string()).into()),
        }
    }
}
