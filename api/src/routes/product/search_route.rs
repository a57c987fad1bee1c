//! POST /api/search — nearest catalog products for a query.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::Response};
use serde::Serialize;
use tracing::debug;

use advisor::{Product, SearchOutcome};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    routes::product::product_request::ProductQuery,
};

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub products: Vec<Product>,
    pub count: usize,
    pub message: String,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(out: SearchOutcome) -> Self {
        Self {
            count: out.products.len(),
            products: out.products,
            message: out.message,
        }
    }
}

/// Handler: POST /api/search
///
/// Retrieval failures yield an empty list with the error text in `message`.
pub async fn search(State(state): State<Arc<AppState>>, Json(q): Json<ProductQuery>) -> Response {
    let out = state.advisor.search(&q.query).await;
    debug!(count = out.products.len(), raw = out.raw_count, "search: done");

    ApiResponse::success(SearchResponse::from(out)).into_response_with_status(StatusCode::OK)
}
