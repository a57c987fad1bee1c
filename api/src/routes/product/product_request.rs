use serde::Deserialize;

/// Request payload for `/api/search` and `/api/recommendation`.
#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    /// Free-text description of what the user needs.
    pub query: String,
    /// Recommendation only: answer with a fixed-text summary instead of
    /// asking the model.
    #[serde(default)]
    pub include_advice: bool,
    /// Summary covers one product (default) or up to five.
    #[serde(default = "default_single")]
    pub single_product: bool,
}

fn default_single() -> bool {
    true
}
