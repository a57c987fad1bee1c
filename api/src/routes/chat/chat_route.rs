//! POST /api/chat — one conversational turn.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::Response};
use tracing::{debug, warn};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    routes::chat::chat_request::ChatRequest,
};

/// Handler: POST /api/chat
///
/// Model failures are not HTTP errors: the reply carries `error` instead of
/// `response` and the status stays 200.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/api/chat \
///   -H 'content-type: application/json' \
///   -d '{"message":"Which laptop for video editing?","role_type":"general"}'
/// ```
pub async fn chat(State(state): State<Arc<AppState>>, Json(body): Json<ChatRequest>) -> Response {
    debug!(role = ?body.role_type, "chat: start");

    let reply = state
        .advisor
        .chat(
            &body.message,
            body.history,
            body.role_type.as_deref(),
            body.context,
        )
        .await;

    if let Some(err) = &reply.error {
        warn!(error = %err, "chat: model call failed");
    }

    ApiResponse::with_flag(reply.is_ok(), reply).into_response_with_status(StatusCode::OK)
}
