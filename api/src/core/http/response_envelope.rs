//! JSON envelope for every advisor route:
//! `{"success": bool, "data"?: T, "error"?: {code, message, details?}}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// `data` and `error` are both optional on the wire. Chat replies are the
/// only case with `success: false` next to a `data` payload, since the
/// advisor reports model failures inside its own reply at HTTP 200.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Serialize)]
pub struct ApiError {
    /// `NOT_FOUND`, `UPSTREAM_ERROR`, `BAD_REQUEST`, ...
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ApiErrorDetail>,
}

/// Points a client at the request field that was rejected.
#[derive(Serialize)]
pub struct ApiErrorDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ApiError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Adds a detail unless it carries neither path nor hint.
    pub fn with_detail(mut self, detail: ApiErrorDetail) -> Self {
        if detail.path.is_some() || detail.hint.is_some() {
            self.details.push(detail);
        }
        self
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::with_flag(true, data)
    }

    /// Payload whose own shape decides success (chat replies).
    pub fn with_flag(success: bool, data: T) -> Self {
        Self {
            success,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Plain 200.
impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        self.into_response_with_status(StatusCode::OK)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn chat_failure_keeps_payload() {
        let v = serde_json::to_value(ApiResponse::with_flag(false, json!({"error": "down"})))
            .expect("json");
        assert_eq!(v, json!({"success": false, "data": {"error": "down"}}));
    }

    #[test]
    fn empty_details_are_dropped() {
        let err = ApiError::new("NOT_FOUND", "nothing").with_detail(ApiErrorDetail {
            path: None,
            hint: None,
        });
        let v = serde_json::to_value(ApiResponse::<()>::failure(err)).expect("json");
        assert_eq!(
            v,
            json!({"success": false, "error": {"code": "NOT_FOUND", "message": "nothing"}})
        );
    }
}
