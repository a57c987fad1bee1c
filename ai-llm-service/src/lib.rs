//! Shared LLM access for the product advisor.
//!
//! - [`llm_service::LlmService`] owns two profiles (`chat`, `embedding`) and
//!   caches one HTTP client per distinct config.
//! - Providers live under [`services`] (Ollama and OpenAI).
//! - [`health_service`] exposes best-effort probes for `/api/health`.
//! - [`telemetry`] ships a crate-scoped `tracing` layer for the binary.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod llm_service;
pub mod services;
pub mod telemetry;

pub use config::llm_model_config::{CompletionOptions, LlmModelConfig};
pub use config::llm_provider::LlmProvider;
pub use error_handler::{AiLlmError, Result};
pub use health_service::HealthStatus;
pub use llm_service::LlmService;
