//! Vector-store boundary for the product catalog.
//!
//! This crate provides the two collaborators retrieval needs:
//! - [`EmbeddingsProvider`]: text → fixed-length vector
//! - [`VectorIndex`]: vector → K nearest catalog entries with metadata
//!
//! [`QdrantFacade`] is the production index; [`embed::llm::LlmEmbedder`] is the
//! production embedder. Both are object-safe so callers can hold them as
//! `Arc<dyn ..>` and swap in fakes for tests.

mod config;
mod errors;
mod index;
mod qdrant_facade;

pub mod embed;

pub use config::StoreConfig;
pub use embed::EmbeddingsProvider;
pub use errors::StoreError;
pub use index::{StoreMatch, VectorIndex};
pub use qdrant_facade::QdrantFacade;
