//! Query text → ranked products, via embedding + nearest-neighbour lookup.

use std::sync::Arc;
use std::time::Duration;

use catalog_store::{EmbeddingsProvider, VectorIndex};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::AdvisorError;
use crate::product::{Product, normalize};

/// Products in store order (closest first).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Retrieved {
    pub products: Vec<Product>,
    /// Hits returned by the store before normalization.
    pub raw_count: usize,
}

/// Success-shaped retrieval result. `message` is set on both success and
/// failure; a failed lookup is an empty result with an error message.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub products: Vec<Product>,
    pub raw_count: usize,
    pub message: String,
}

#[derive(Clone)]
pub struct RetrievalService {
    embedder: Arc<dyn EmbeddingsProvider>,
    index: Arc<dyn VectorIndex>,
    timeout: Duration,
}

impl RetrievalService {
    pub fn new(
        embedder: Arc<dyn EmbeddingsProvider>,
        index: Arc<dyn VectorIndex>,
        timeout: Duration,
    ) -> Self {
        Self {
            embedder,
            index,
            timeout,
        }
    }

    /// Embeds `query` and fetches up to `limit` products. No re-ranking.
    pub async fn try_retrieve(&self, query: &str, limit: u64) -> Result<Retrieved, AdvisorError> {
        let work = async {
            let vector = self.embedder.embed(query).await?;
            let hits = self.index.query(vector, limit).await?;
            Ok::<_, AdvisorError>(hits)
        };

        let hits = tokio::time::timeout(self.timeout, work)
            .await
            .map_err(|_| AdvisorError::Timeout(self.timeout))??;

        let raw_count = hits.len();
        let products = hits
            .iter()
            .map(|h| normalize(&h.metadata, &h.id))
            .collect::<Vec<_>>();
        debug!(raw_count, limit, "retrieved products");
        Ok(Retrieved {
            products,
            raw_count,
        })
    }

    /// Like [`Self::try_retrieve`] but never fails; errors become an empty
    /// result carrying the error text in `message`.
    pub async fn retrieve(&self, query: &str, limit: u64) -> SearchOutcome {
        match self.try_retrieve(query, limit).await {
            Ok(r) => SearchOutcome {
                message: format!("{} passende Produkte gefunden", r.products.len()),
                products: r.products,
                raw_count: r.raw_count,
            },
            Err(e) => {
                warn!(error = %e, "retrieval failed");
                SearchOutcome {
                    products: Vec::new(),
                    raw_count: 0,
                    message: format!("Fehler bei der Suche: {e}"),
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use catalog_store::{EmbeddingsProvider, StoreError, StoreMatch, VectorIndex};
    use futures::future::BoxFuture;

    pub struct FixedEmbedder;

    impl EmbeddingsProvider for FixedEmbedder {
        fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, StoreError>> {
            Box::pin(async { Ok(vec![0.1, 0.2, 0.3]) })
        }
    }

    pub struct FailingEmbedder;

    impl EmbeddingsProvider for FailingEmbedder {
        fn embed<'a>(&'a self, _text: &'a str) -> BoxFuture<'a, Result<Vec<f32>, StoreError>> {
            Box::pin(async { Err(StoreError::Qdrant("connection refused".into())) })
        }
    }

    /// Returns canned hits, truncated to `k`.
    pub struct StaticIndex {
        pub hits: Vec<StoreMatch>,
        pub delay: Option<Duration>,
    }

    impl VectorIndex for StaticIndex {
        fn query<'a>(
            &'a self,
            _vector: Vec<f32>,
            k: u64,
        ) -> BoxFuture<'a, Result<Vec<StoreMatch>, StoreError>> {
            Box::pin(async move {
                if let Some(d) = self.delay {
                    tokio::time::sleep(d).await;
                }
                Ok(self.hits.iter().take(k as usize).cloned().collect())
            })
        }
    }

    pub fn hit(id: &str, manufacturer: &str, model: &str) -> StoreMatch {
        let mut metadata = BTreeMap::new();
        metadata.insert("manufacturer".to_string(), manufacturer.to_string());
        metadata.insert("model".to_string(), model.to_string());
        metadata.insert("type".to_string(), "Notebook".to_string());
        metadata.insert("price_chf".to_string(), "1299".to_string());
        metadata.insert("tech_specs".to_string(), "RAM: 16GB, CPU: i7".to_string());
        StoreMatch {
            id: id.to_string(),
            metadata,
            score: Some(0.9),
        }
    }

    pub fn catalog(n: usize) -> Vec<StoreMatch> {
        (0..n)
            .map(|i| hit(&i.to_string(), "HP", &format!("Model {i}")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::*;
    use super::*;

    fn service(embedder: Arc<dyn EmbeddingsProvider>, index: StaticIndex) -> RetrievalService {
        RetrievalService::new(embedder, Arc::new(index), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn keeps_store_order_and_limit() {
        let svc = service(
            Arc::new(FixedEmbedder),
            StaticIndex {
                hits: catalog(8),
                delay: None,
            },
        );
        let r = svc.try_retrieve("laptop", 5).await.expect("retrieve");
        assert_eq!(r.raw_count, 5);
        let ids: Vec<_> = r.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);
        assert_eq!(r.products[1].header.name, "HP Model 1");
    }

    #[tokio::test]
    async fn failure_becomes_empty_result_with_message() {
        let svc = service(
            Arc::new(FailingEmbedder),
            StaticIndex {
                hits: catalog(3),
                delay: None,
            },
        );
        let out = svc.retrieve("laptop", 5).await;
        assert!(out.products.is_empty());
        assert_eq!(out.raw_count, 0);
        assert!(!out.message.is_empty());
        assert!(out.message.contains("connection refused"));

        assert!(matches!(
            svc.try_retrieve("laptop", 5).await,
            Err(AdvisorError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn success_message_counts_products() {
        let svc = service(
            Arc::new(FixedEmbedder),
            StaticIndex {
                hits: catalog(2),
                delay: None,
            },
        );
        let out = svc.retrieve("laptop", 5).await;
        assert_eq!(out.message, "2 passende Produkte gefunden");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_store_times_out() {
        let svc = RetrievalService::new(
            Arc::new(FixedEmbedder),
            Arc::new(StaticIndex {
                hits: catalog(2),
                delay: Some(Duration::from_secs(60)),
            }),
            Duration::from_secs(1),
        );
        assert!(matches!(
            svc.try_retrieve("laptop", 5).await,
            Err(AdvisorError::Timeout(_))
        ));
    }
}
