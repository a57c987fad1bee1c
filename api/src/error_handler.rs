use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use advisor::{AdvisorError, RecommendError};
use ai_llm_service::AiLlmError;

use crate::core::http::response_envelope::{ApiError, ApiResponse};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    #[error(transparent)]
    Advisor(#[from] AdvisorError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("{0}")]
    NotFound(String),

    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,

            // startup-only
            AppError::Llm(_)
            | AppError::Advisor(_)
            | AppError::Bind(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Llm(_) => "LLM_CONFIG_ERROR",
            AppError::Advisor(_) => "ADVISOR_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ApiResponse::<()>::failure(ApiError::new(self.error_code(), self.to_string()))
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<RecommendError> for AppError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::NotFound => AppError::NotFound(
                "Es wurden keine passenden Produkte gefunden. Bitte versuchen Sie es mit anderen Suchbegriffen."
                    .into(),
            ),
            RecommendError::Upstream(msg) => AppError::Upstream(msg),
        }
    }
}
