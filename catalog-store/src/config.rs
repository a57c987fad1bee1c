//! Store connection configuration.

use crate::errors::StoreError;

/// Configuration for the catalog collection.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Qdrant gRPC endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Collection holding the product vectors.
    pub collection: String,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
    /// Expected embedding dimension (must match the indexing model).
    pub embedding_dim: usize,
}

impl StoreConfig {
    /// Defaults for a local Qdrant and the `hardware_products` collection.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            exact_search: false,
            embedding_dim: 384,
        }
    }

    /// Reads `QDRANT_URL`, `QDRANT_API_KEY`, `QDRANT_COLLECTION`,
    /// `QDRANT_EXACT_SEARCH` and `EMBEDDING_DIM`, falling back to defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::new_default(
            env("QDRANT_URL", "http://127.0.0.1:6334"),
            env("QDRANT_COLLECTION", "hardware_products"),
        );
        cfg.qdrant_api_key = std::env::var("QDRANT_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        cfg.exact_search = env("QDRANT_EXACT_SEARCH", "false") == "true";
        cfg.embedding_dim = std::env::var("EMBEDDING_DIM")
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(cfg.embedding_dim);
        cfg
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(StoreError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(StoreError::Config("collection is empty".into()));
        }
        if self.embedding_dim == 0 {
            return Err(StoreError::Config("embedding_dim must be > 0".into()));
        }
        Ok(())
    }
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k).unwrap_or_else(|_| dflt.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_fields() {
        let ok = StoreConfig::new_default("http://localhost:6334", "hardware_products");
        assert!(ok.validate().is_ok());

        let mut bad = ok.clone();
        bad.collection = " ".into();
        assert!(bad.validate().is_err());

        let mut bad = ok;
        bad.embedding_dim = 0;
        assert!(bad.validate().is_err());
    }
}
