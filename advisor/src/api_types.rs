use serde::Serialize;
use thiserror::Error;

use crate::product::Product;

/// Chat outcome: exactly one of `response` or `error` is set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatReply {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            response: None,
            error: Some(msg.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.response.is_some()
    }
}

/// One chosen product plus the model's explanation (marker removed).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recommendation {
    pub recommended_product: Product,
    pub llm_response: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecommendError {
    #[error("no matching products found")]
    NotFound,

    #[error("upstream failure: {0}")]
    Upstream(String),
}
