//! Thin adapter around `qdrant-client` for catalog lookups.
//!
//! Keeps the builder API and payload decoding in one place; the rest of the
//! workspace only sees [`VectorIndex`] and [`StoreMatch`].

use std::collections::{BTreeMap, HashMap};

use futures::future::BoxFuture;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind as K;
use qdrant_client::qdrant::{PointId, SearchParamsBuilder, SearchPointsBuilder, Value as QValue};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::errors::StoreError;
use crate::index::{StoreMatch, VectorIndex};

/// Payload keys checked (in order) for the catalog's own product id.
const ID_KEYS: [&str; 2] = ["product_id", "id"];

pub struct QdrantFacade {
    client: Qdrant,
    collection: String,
    exact: bool,
}

impl QdrantFacade {
    pub fn new(cfg: &StoreConfig) -> Result<Self, StoreError> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            exact: cfg.exact_search,
        })
    }

    /// Similarity search with payloads, closest first.
    pub async fn search(&self, vector: Vec<f32>, top_k: u64) -> Result<Vec<StoreMatch>, StoreError> {
        info!(
            collection = %self.collection,
            top_k,
            exact = self.exact,
            "catalog search"
        );

        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);
        if self.exact {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| StoreError::Qdrant(e.to_string()))?;

        let out: Vec<StoreMatch> = res
            .result
            .into_iter()
            .map(|p| to_match(p.id, p.payload, p.score))
            .collect();

        debug!(hits = out.len(), "catalog search done");
        Ok(out)
    }
}

impl VectorIndex for QdrantFacade {
    fn query<'a>(
        &'a self,
        vector: Vec<f32>,
        k: u64,
    ) -> BoxFuture<'a, Result<Vec<StoreMatch>, StoreError>> {
        Box::pin(self.search(vector, k))
    }
}

fn to_match(id: Option<PointId>, payload: HashMap<String, QValue>, score: f32) -> StoreMatch {
    let metadata = payload_to_strings(payload);
    let id = ID_KEYS
        .iter()
        .find_map(|k| metadata.get(*k).cloned())
        .or_else(|| id.and_then(point_id_text))
        .unwrap_or_default();
    StoreMatch {
        id,
        metadata,
        score: Some(score),
    }
}

fn point_id_text(id: PointId) -> Option<String> {
    match id.point_id_options? {
        PointIdOptions::Num(n) => Some(n.to_string()),
        PointIdOptions::Uuid(u) => Some(u),
    }
}

/// Flattens a payload into text. Null values are dropped; numbers and
/// booleans are stringified; lists are joined with `", "`.
fn payload_to_strings(payload: HashMap<String, QValue>) -> BTreeMap<String, String> {
    payload
        .into_iter()
        .filter_map(|(k, v)| value_text(v).map(|s| (k, s)))
        .collect()
}

fn value_text(v: QValue) -> Option<String> {
    match v.kind? {
        K::StringValue(s) => Some(s),
        K::IntegerValue(i) => Some(i.to_string()),
        K::DoubleValue(f) => Some(f.to_string()),
        K::BoolValue(b) => Some(b.to_string()),
        K::NullValue(_) => None,
        K::ListValue(l) => {
            let parts: Vec<String> = l.values.into_iter().filter_map(value_text).collect();
            Some(parts.join(", "))
        }
        K::StructValue(_) => None,
    }
}
