//! POST /api/chat/reset — forget the conversation.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

pub async fn reset_chat(State(state): State<Arc<AppState>>) -> Response {
    let reply = state.advisor.reset_chat().await;
    info!("conversation reset");
    ApiResponse::success(reply).into_response()
}
