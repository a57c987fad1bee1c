//! GET /api/health — liveness plus LLM backend probes.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use ai_llm_service::HealthStatus;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub environment: &'static str,
    pub llm: Vec<HealthStatus>,
}

/// Always 200 while the process is up; `status` is `degraded` when a probe
/// fails.
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let llm = state.llm.health_all().await;
    let status = if llm.iter().all(|h| h.ok) {
        "ok"
    } else {
        "degraded"
    };

    let body = HealthResponse {
        status,
        version: state.version.clone(),
        environment: if state.debug {
            "development"
        } else {
            "production"
        },
        llm,
    };
    ApiResponse::success(body).into_response()
}
