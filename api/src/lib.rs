//! Thin HTTP layer over the product advisor.
//!
//! Routes (all JSON, wrapped in [`core::http::response_envelope::ApiResponse`]):
//! - `POST /api/chat`
//! - `POST /api/chat/reset`
//! - `POST /api/search`
//! - `POST /api/recommendation`
//! - `GET  /api/health`

use std::{env, sync::Arc};

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        chat::{chat_route::chat, reset_chat_route::reset_chat},
        health::health_route::health,
        product::{recommendation_route::recommendation, search_route::search},
    },
};

const DEFAULT_ADDRESS: &str = "0.0.0.0:8000";

/// Builds state from the environment and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_ADDRESS.to_string());
    let state = Arc::new(AppState::from_env().await?);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// All routes with shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/chat/reset", post(reset_chat))
        .route("/api/search", post(search))
        .route("/api/recommendation", post(recommendation))
        .route("/api/health", get(health))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::io;
    use std::sync::Mutex;
    use std::time::Duration;

    use advisor::{
        AdvisorConfig, LlmBackend, Orchestrator, PromptTemplateStore, RetrievalService,
        TemplateFileStore, TemplateId,
    };
    use ai_llm_service::{
        AiLlmError, CompletionOptions, LlmModelConfig, LlmProvider, LlmService,
    };
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use catalog_store::{EmbeddingsProvider, StoreError, StoreMatch, VectorIndex};
    use futures::future::BoxFuture;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    struct Embed;
    impl EmbeddingsProvider for Embed {
        fn embed<'a>(&'a self, _t: &'a str) -> BoxFuture<'a, Result<Vec<f32>, StoreError>> {
            Box::pin(async { Ok(vec![1.0; 4]) })
        }
    }

    struct Index(Vec<StoreMatch>);
    impl VectorIndex for Index {
        fn query<'a>(
            &'a self,
            _v: Vec<f32>,
            k: u64,
        ) -> BoxFuture<'a, Result<Vec<StoreMatch>, StoreError>> {
            Box::pin(async move { Ok(self.0.iter().take(k as usize).cloned().collect()) })
        }
    }

    struct Echo(&'static str);
    impl LlmBackend for Echo {
        fn complete<'a>(
            &'a self,
            _p: &'a str,
            _o: CompletionOptions,
        ) -> BoxFuture<'a, Result<String, AiLlmError>> {
            Box::pin(async move { Ok(self.0.to_string()) })
        }
    }

    #[derive(Default)]
    struct Templates(Mutex<HashMap<TemplateId, String>>);
    impl TemplateFileStore for Templates {
        fn read<'a>(&'a self, id: TemplateId) -> BoxFuture<'a, io::Result<Option<String>>> {
            Box::pin(async move { Ok(self.0.lock().expect("lock").get(&id).cloned()) })
        }
        fn write<'a>(&'a self, id: TemplateId, t: &'a str) -> BoxFuture<'a, io::Result<()>> {
            Box::pin(async move {
                self.0.lock().expect("lock").insert(id, t.to_string());
                Ok(())
            })
        }
    }

    fn hit(id: &str, model: &str) -> StoreMatch {
        let mut metadata = BTreeMap::new();
        metadata.insert("manufacturer".to_string(), "Dell".to_string());
        metadata.insert("model".to_string(), model.to_string());
        StoreMatch {
            id: id.to_string(),
            metadata,
            score: Some(0.5),
        }
    }

    fn state(hits: Vec<StoreMatch>, reply: &'static str) -> Arc<AppState> {
        let retrieval =
            RetrievalService::new(Arc::new(Embed), Arc::new(Index(hits)), Duration::from_secs(5));
        let templates = Arc::new(PromptTemplateStore::new(Arc::new(Templates::default())));
        let advisor = Orchestrator::new(
            retrieval,
            Arc::new(Echo(reply)),
            templates,
            AdvisorConfig::default(),
        );
        let profile = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "llama3.2:3B".into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: Some(512),
            temperature: Some(0.7),
            top_p: Some(0.9),
            timeout_secs: Some(5),
        };
        let llm = LlmService::new(profile.clone(), profile, Some(1)).expect("llm service");
        Arc::new(AppState {
            advisor: Arc::new(advisor),
            llm: Arc::new(llm),
            version: "test".into(),
            debug: true,
        })
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn json_body(res: axum::response::Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn chat_returns_model_reply() {
        let app = router(state(Vec::new(), "Hello there"));
        let res = app
            .oneshot(post_json("/api/chat", r#"{"message":"hi"}"#))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let v = json_body(res).await;
        assert_eq!(v["success"], Value::Bool(true));
        assert_eq!(v["data"]["response"], "Hello there");
    }

    #[tokio::test]
    async fn recommendation_not_found_is_404() {
        let app = router(state(Vec::new(), "unused"));
        let res = app
            .oneshot(post_json("/api/recommendation", r#"{"query":"tablet"}"#))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let v = json_body(res).await;
        assert_eq!(v["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn recommendation_returns_selected_product() {
        let app = router(state(
            vec![hit("a", "XPS 13"), hit("b", "XPS 15")],
            "SELECTED_PRODUCT_ID: 1\nBigger screen.",
        ));
        let res = app
            .oneshot(post_json("/api/recommendation", r#"{"query":"big laptop"}"#))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let v = json_body(res).await;
        assert_eq!(v["data"]["recommended_product"]["id"], "b");
        assert_eq!(v["data"]["llm_response"], "Bigger screen.");
    }

    #[tokio::test]
    async fn recommendation_with_advice_skips_model() {
        let app = router(state(
            vec![hit("a", "XPS 13"), hit("b", "XPS 15")],
            "SELECTED_PRODUCT_ID: 1",
        ));
        let res = app
            .oneshot(post_json(
                "/api/recommendation",
                r#"{"query":"laptop","include_advice":true,"single_product":false}"#,
            ))
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let v = json_body(res).await;
        assert_eq!(v["data"]["count"], 2);
        let message = v["data"]["message"].as_str().unwrap_or_default();
        assert!(message.contains("1. Dell XPS 13 (Preis auf Anfrage)"));
        assert!(message.contains("2. Dell XPS 15"));
    }

    #[tokio::test]
    async fn search_counts_products() {
        let app = router(state(vec![hit("a", "XPS 13")], "unused"));
        let res = app
            .oneshot(post_json("/api/search", r#"{"query":"laptop"}"#))
            .await
            .expect("response");
        let v = json_body(res).await;
        assert_eq!(v["data"]["count"], 1);
        assert_eq!(v["data"]["products"][0]["header"]["name"], "Dell XPS 13");
    }

    #[tokio::test]
    async fn malformed_body_gets_envelope() {
        let app = router(state(Vec::new(), "unused"));
        let res = app
            .oneshot(post_json("/api/search", r#"{"q":"laptop"}"#))
            .await
            .expect("response");
        assert!(res.status().is_client_error());
        let v = json_body(res).await;
        assert_eq!(v["success"], Value::Bool(false));
        assert_eq!(v["error"]["details"][0]["path"], "query");
    }
}
