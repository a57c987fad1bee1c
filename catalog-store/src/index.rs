use std::collections::BTreeMap;

use futures::future::BoxFuture;

use crate::errors::StoreError;

/// One nearest-neighbour hit.
///
/// `metadata` holds the flat, textual catalog fields exactly as indexed.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreMatch {
    pub id: String,
    pub metadata: BTreeMap<String, String>,
    /// Similarity score reported by the store (higher is closer), if any.
    pub score: Option<f32>,
}

/// Nearest-neighbour lookup over the catalog collection.
///
/// Results are ordered by similarity, closest first, and hold at most `k`
/// entries.
pub trait VectorIndex: Send + Sync {
    fn query<'a>(
        &'a self,
        vector: Vec<f32>,
        k: u64,
    ) -> BoxFuture<'a, Result<Vec<StoreMatch>, StoreError>>;
}
