use serde::Deserialize;
use serde_json::Value;

/// Request payload for `POST /api/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Free-form context: `product`, `products`, `available_products`,
    /// `user_requirements`, `single_product`, `system_context`, `history`.
    #[serde(default)]
    pub context: Option<Value>,
    /// Caller-side history, `[{type|role, content}]` or `[{user, assistant}]`.
    #[serde(default)]
    pub history: Option<Value>,
    /// `general`, `product_specific`, `recommendation`, `order_instructions`
    /// or `clarification` (camelCase accepted). Defaults to general.
    #[serde(default)]
    pub role_type: Option<String>,
}
