//! Rewrites plain-text 400/422 bodies (axum's JSON rejections) into the
//! [`ApiResponse`] envelope.

use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use crate::core::http::response_envelope::{ApiError, ApiErrorDetail, ApiResponse};

/// Request fields worth pointing at in an error detail.
const KNOWN_FIELDS: [&str; 7] = [
    "message",
    "query",
    "context",
    "history",
    "role_type",
    "include_advice",
    "single_product",
];

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

fn guess_path(msg: &str) -> Option<String> {
    KNOWN_FIELDS
        .iter()
        .find(|k| msg.contains(&format!("`{k}`")) || msg.contains(*k))
        .map(|k| k.to_string())
}

fn hint_for(msg: &str) -> Option<String> {
    if msg.contains("missing field") {
        Some("Add the missing field to the JSON body.".into())
    } else if msg.contains("expected a map") || msg.contains("expected struct") {
        Some("Expected a JSON object here (e.g. { \"field\": \"value\" }).".into())
    } else if msg.contains("expected a sequence") {
        Some("Expected an array for this field.".into())
    } else if msg.contains("Content-Type") {
        Some("Send the body with `Content-Type: application/json`.".into())
    } else {
        None
    }
}

fn ensure_request_id(parts: &mut axum::http::response::Parts) -> String {
    if let Some(v) = parts
        .headers
        .get("X-Request-Id")
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
    {
        return v.to_string();
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    let id = format!("req-{nanos}");
    if let Ok(v) = HeaderValue::from_str(&id) {
        parts.headers.insert("X-Request-Id", v);
    }
    id
}

pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    if !(status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY) {
        return res;
    }
    // Already enveloped by a handler.
    if res
        .headers()
        .get(axum::http::header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"))
    {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    let original = String::from_utf8_lossy(&bytes);
    let req_id = ensure_request_id(&mut parts);
    debug!(request_id = %req_id, status = %status, "rejected request body");

    let detail = ApiErrorDetail {
        path: guess_path(&original),
        hint: hint_for(&original),
    };

    let code = if status == StatusCode::BAD_REQUEST {
        "BAD_REQUEST"
    } else {
        "UNPROCESSABLE_ENTITY"
    };
    let envelope =
        ApiResponse::<()>::failure(ApiError::new(code, original.trim()).with_detail(detail));

    let body = match serde_json::to_vec(&envelope) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts.headers.insert(
        axum::http::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);

    Response::from_parts(parts, body.into())
}
