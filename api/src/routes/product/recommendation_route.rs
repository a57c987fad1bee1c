//! POST /api/recommendation — one product chosen by the model, or a
//! fixed-text summary when `include_advice` is set.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::Response};
use tracing::{error, info};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::product::{product_request::ProductQuery, search_route::SearchResponse},
};

/// Handler: POST /api/recommendation
///
/// Model path: 404 when nothing matches, 502 when retrieval or the model
/// fails. Advice path: always 200, problems are reported in `message`.
pub async fn recommendation(
    State(state): State<Arc<AppState>>,
    Json(q): Json<ProductQuery>,
) -> AppResult<Response> {
    if q.include_advice {
        let out = state.advisor.advise(&q.query, q.single_product).await;
        info!(count = out.products.len(), "recommendation: advice");
        let body = SearchResponse::from(out);
        return Ok(ApiResponse::success(body).into_response_with_status(StatusCode::OK));
    }

    let rec = state.advisor.recommend(&q.query).await.map_err(|e| {
        error!(error = %e, "recommendation failed");
        AppError::from(e)
    })?;

    info!(product = %rec.recommended_product.id, "recommendation: done");
    Ok(ApiResponse::success(rec).into_response_with_status(StatusCode::OK))
}
