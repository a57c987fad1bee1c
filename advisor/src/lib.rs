//! Retrieval-and-recommendation orchestrator for product questions.
//!
//! [`Orchestrator`] composes the pieces into two flows:
//! - **chat**: route the message to a prompt template, fill it from the
//!   request context and session history, call the model, remember the
//!   exchange;
//! - **recommend**: retrieve candidates from the catalog, let the model pick
//!   one via the `SELECTED_PRODUCT_ID:` marker, return that product.
//!   [`Orchestrator::advise`] is the model-free variant with a fixed-text
//!   summary.
//!
//! Collaborators sit behind traits ([`catalog_store::EmbeddingsProvider`],
//! [`catalog_store::VectorIndex`], [`LlmBackend`], [`TemplateFileStore`]) so
//! hosts and tests can swap them.

mod api_types;
mod cfg;
mod error;
mod llm;
mod orchestrator;

pub mod advice;
pub mod intent;
pub mod product;
pub mod prompt;
pub mod retrieve;
pub mod select;
pub mod session;
pub mod templates;

pub use api_types::{ChatReply, RecommendError, Recommendation};
pub use cfg::AdvisorConfig;
pub use error::AdvisorError;
pub use intent::TemplateId;
pub use llm::{LlmBackend, ServiceBackend};
pub use orchestrator::{Orchestrator, system_instruction};
pub use product::Product;
pub use retrieve::{RetrievalService, Retrieved, SearchOutcome};
pub use session::{ConversationSession, ConversationTurn, ResetReply, SessionHandle};
pub use templates::{FsTemplateStore, PromptTemplateStore, TemplateFileStore};
