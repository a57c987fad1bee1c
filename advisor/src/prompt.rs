//! Template bindings per [`TemplateId`].
//!
//! The request context is loose JSON coming from the caller (`product`,
//! `products`, `available_products`, `user_requirements`, `single_product`,
//! `history`, `system_context`). Everything here tolerates missing or
//! oddly-shaped keys and falls back to empty text.

use serde_json::{Map, Value, json};

use crate::intent::TemplateId;
use crate::product::{NA, Product, format_price_text};
use crate::session::{ConversationTurn, Role};

pub type Bindings = Map<String, Value>;

const HISTORY_HEADER: &str = "--- CONVERSATION HISTORY ---";
const NO_PRODUCTS: &str = "No products available";

/// Builds template bindings from the message, request context and session.
pub struct PromptContextBuilder;

impl PromptContextBuilder {
    /// `session_history` should already be cut to the rendering window.
    pub fn build(
        id: TemplateId,
        message: &str,
        context: &Value,
        session_history: &[ConversationTurn],
    ) -> Bindings {
        let history = format_history(session_history);

        let v = match id {
            TemplateId::General => json!({
                "history": history,
                "message": message,
                "system_context": text_of(context.get("system_context")),
            }),
            TemplateId::ProductSpecific => {
                let p = product_from(context.get("product"));
                json!({
                    "manufacturer": p.header.manufacturer,
                    "model": p.header.model,
                    "name": p.header.name,
                    "type": p.header.kind,
                    "price": p.header.price,
                    "price_text": format_price_text(&p.header.price),
                    "link": p.header.link,
                    "os": p.specifications.os,
                    "specifications": spec_lines(&p, "- "),
                    "users": p.target_audience.users.join(", "),
                    "ideal_for": p.target_audience.ideal_for.join(", "),
                    "not_recommended": p.target_audience.not_recommended.join(", "),
                    "qualification": p.target_audience.qualification,
                    "history": history,
                    "message": message,
                })
            }
            TemplateId::ProductRecommendation => json!({
                "user_requirements": user_requirements(context),
                "available_products": available_products(context),
                "history": history,
                "message": message,
                "single_product": context
                    .get("single_product")
                    .and_then(Value::as_bool)
                    .unwrap_or(true),
            }),
            TemplateId::OrderInstructions => {
                let header = context.get("product").and_then(|p| p.get("header"));
                let field = |k: &str| text_of(header.and_then(|h| h.get(k)));
                let history = match context.get("history") {
                    Some(h) if has_entries(h) => format_external_history(h),
                    _ => history,
                };
                json!({
                    "manufacturer": field("manufacturer"),
                    "model": field("model"),
                    "user_query": message,
                    "history": history,
                })
            }
            TemplateId::Clarification => json!({
                "history": history,
                "message": message,
            }),
        };

        match v {
            Value::Object(m) => m,
            _ => Bindings::new(),
        }
    }
}

/// True when the context carries a non-null `product`.
pub fn has_product(context: &Value) -> bool {
    context.get("product").is_some_and(|p| !p.is_null())
}

/// `User:` / `Assistant:` lines under a header; empty history → `""`.
pub fn format_history(turns: &[ConversationTurn]) -> String {
    if turns.is_empty() {
        return String::new();
    }
    let mut out = format!("\n{HISTORY_HEADER}\n");
    for t in turns {
        let who = match t.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
        };
        out.push_str(&format!("{who}: {}\n", t.content));
    }
    out
}

/// Formats caller-supplied history: `[{type|role, content}]` or legacy
/// `[{user, assistant}]` pairs. Unknown shapes render empty.
pub fn format_external_history(history: &Value) -> String {
    let Some(entries) = history.as_array().filter(|a| !a.is_empty()) else {
        return String::new();
    };

    let mut out = format!("\n{HISTORY_HEADER}\n");
    let first = &entries[0];
    if first.get("type").is_some() || first.get("role").is_some() {
        for e in entries {
            let role = e.get("type").or_else(|| e.get("role")).and_then(Value::as_str);
            let who = if role == Some("user") { "User" } else { "Assistant" };
            out.push_str(&format!("{who}: {}\n", text_of(e.get("content"))));
        }
    } else if first.is_object() {
        for e in entries {
            out.push_str(&format!("User: {}\n", text_of(e.get("user"))));
            out.push_str(&format!("Assistant: {}\n\n", text_of(e.get("assistant"))));
        }
    }
    out
}

/// One summary line per product followed by indented spec lines. Products
/// are numbered from 0.
pub fn format_products(products: &[Product]) -> String {
    if products.is_empty() {
        return NO_PRODUCTS.to_string();
    }
    products
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let h = &p.header;
            let mut s = format!(
                "Product {i}: {} | Type: {} | Price: {}",
                format!("{} {}", h.manufacturer, h.model).trim(),
                h.kind,
                h.price
            );
            let specs = spec_lines(p, "    - ");
            if !specs.is_empty() {
                s.push('\n');
                s.push_str(&specs);
            }
            s
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn spec_lines(p: &Product, prefix: &str) -> String {
    p.specifications
        .system
        .iter()
        .filter(|(_, v)| !v.is_empty() && *v != NA)
        .map(|(k, v)| format!("{prefix}{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn available_products(context: &Value) -> String {
    match context.get("available_products") {
        Some(Value::String(s)) => return s.clone(),
        Some(v @ Value::Array(_)) => return format_products(&products_from(v)),
        _ => {}
    }
    match context.get("products") {
        Some(v) => format_products(&products_from(v)),
        None => NO_PRODUCTS.to_string(),
    }
}

fn user_requirements(context: &Value) -> String {
    match context.get("user_requirements") {
        Some(Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
        None if context.is_null() => String::new(),
        None => context.to_string(),
    }
}

fn product_from(v: Option<&Value>) -> Product {
    v.and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default()
}

fn products_from(v: &Value) -> Vec<Product> {
    v.as_array()
        .map(|a| a.iter().map(|p| product_from(Some(p))).collect())
        .unwrap_or_default()
}

fn has_entries(v: &Value) -> bool {
    v.as_array().is_some_and(|a| !a.is_empty())
}

fn text_of(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::normalize;
    use crate::templates::{PromptTemplateStore, fakes::MemoryTemplates};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn product(id: &str, manufacturer: &str, model: &str, specs: &str) -> Product {
        let mut raw = BTreeMap::new();
        raw.insert("manufacturer".to_string(), manufacturer.to_string());
        raw.insert("model".to_string(), model.to_string());
        raw.insert("type".to_string(), "Notebook".to_string());
        raw.insert("price_chf".to_string(), "999".to_string());
        raw.insert("tech_specs".to_string(), specs.to_string());
        normalize(&raw, id)
    }

    #[test]
    fn history_format() {
        assert_eq!(format_history(&[]), "");
        let h = format_history(&[
            ConversationTurn::user("hi"),
            ConversationTurn::assistant("hello"),
        ]);
        assert_eq!(h, "\n--- CONVERSATION HISTORY ---\nUser: hi\nAssistant: hello\n");
    }

    #[test]
    fn external_history_both_shapes() {
        let modern = json!([
            {"type": "user", "content": "q"},
            {"role": "assistant", "content": "a"}
        ]);
        assert!(format_external_history(&modern).ends_with("User: q\nAssistant: a\n"));

        let legacy = json!([{"user": "q", "assistant": "a"}]);
        assert!(format_external_history(&legacy).ends_with("User: q\nAssistant: a\n\n"));

        assert_eq!(format_external_history(&json!([])), "");
        assert_eq!(format_external_history(&json!("text")), "");
    }

    #[test]
    fn product_list_skips_empty_specs() {
        let list = format_products(&[
            product("1", "HP", "EliteBook", "RAM: 16GB, GPU: N/A, Color:"),
            product("2", "", "ThinkPad", ""),
        ]);
        assert_eq!(
            list,
            "Product 0: HP EliteBook | Type: Notebook | Price: 999\n    - RAM: 16GB\n\
             Product 1: ThinkPad | Type: Notebook | Price: 999"
        );
        assert_eq!(format_products(&[]), "No products available");
    }

    #[test]
    fn recommendation_bindings() {
        let ctx = json!({"products": [product("1", "Dell", "XPS 13", "")], "budget": 1500});
        let b = PromptContextBuilder::build(TemplateId::ProductRecommendation, "light laptop", &ctx, &[]);
        assert_eq!(b["single_product"], json!(true));
        assert!(b["available_products"].as_str().unwrap_or("").contains("Dell XPS 13"));
        // No explicit requirements: the context itself is passed on.
        assert!(b["user_requirements"].as_str().unwrap_or("").contains("budget"));
        assert_eq!(b["history"], json!(""));

        let ctx = json!({"available_products": "verbatim list", "user_requirements": "silent", "single_product": false});
        let b = PromptContextBuilder::build(TemplateId::ProductRecommendation, "m", &ctx, &[]);
        assert_eq!(b["available_products"], json!("verbatim list"));
        assert_eq!(b["user_requirements"], json!("silent"));
        assert_eq!(b["single_product"], json!(false));
    }

    #[test]
    fn product_specific_flattens_product() {
        let p = product("5", "Lenovo", "T14", "RAM: 32GB");
        let ctx = json!({ "product": p });
        let b = PromptContextBuilder::build(TemplateId::ProductSpecific, "battery?", &ctx, &[]);
        assert_eq!(b["manufacturer"], json!("Lenovo"));
        assert_eq!(b["name"], json!("Lenovo T14"));
        assert_eq!(b["type"], json!("Notebook"));
        assert_eq!(b["price_text"], json!("CHF 999"));
        assert_eq!(b["specifications"], json!("- RAM: 32GB"));
        assert_eq!(b["message"], json!("battery?"));
    }

    #[test]
    fn order_bindings_prefer_explicit_history() {
        let ctx = json!({
            "product": {"header": {"manufacturer": "Apple", "model": "MacBook Air"}},
            "history": [{"user": "price?", "assistant": "CHF 1299"}]
        });
        let session = [ConversationTurn::user("old"), ConversationTurn::assistant("older")];
        let b = PromptContextBuilder::build(TemplateId::OrderInstructions, "buy it", &ctx, &session);
        assert_eq!(b["manufacturer"], json!("Apple"));
        assert_eq!(b["model"], json!("MacBook Air"));
        assert_eq!(b["user_query"], json!("buy it"));
        let h = b["history"].as_str().unwrap_or("");
        assert!(h.contains("User: price?"));
        assert!(!h.contains("old"));

        let ctx = json!({"product": {"header": {"model": "X1"}}});
        let b = PromptContextBuilder::build(TemplateId::OrderInstructions, "order", &ctx, &session);
        assert!(b["history"].as_str().unwrap_or("").contains("User: old"));
        assert_eq!(b["manufacturer"], json!(""));
    }

    #[tokio::test]
    async fn formatted_list_round_trips_into_prompt() {
        let products = vec![
            product("1", "HP", "EliteBook 840", "RAM: 16GB"),
            product("2", "Dell", "Latitude 7440", "CPU: i7 (13th Gen, 10-core)"),
            product("3", "Lenovo", "ThinkPad X1", ""),
        ];
        let ctx = json!({ "available_products": format_products(&products) });
        let b = PromptContextBuilder::build(TemplateId::ProductRecommendation, "q", &ctx, &[]);

        let store = PromptTemplateStore::new(Arc::new(MemoryTemplates::default()));
        let prompt = store.render(TemplateId::ProductRecommendation, &b).await;
        for p in &products {
            assert!(prompt.contains(&p.header.manufacturer));
            assert!(prompt.contains(&p.header.model));
        }
    }
}
