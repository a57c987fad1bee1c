//! Order-intent detection and template routing.

use std::fmt;
use std::str::FromStr;

/// Lower-case keywords (English + German) that mark an order/purchase query.
const ORDER_KEYWORDS: &[&str] = &[
    "order",
    "purchase",
    "buy",
    "get",
    "acquire",
    "request",
    "availability",
    "stock",
    "place an order",
    "delivery",
    "shipping",
    "lead time",
    "bestellen",
    "kaufen",
    "erwerben",
    "verfügbarkeit",
    "lieferung",
    "bestellung",
    "einkaufen",
    "where can i get",
    "wie kann ich kaufen",
    "wie bestelle ich",
];

/// Prompt template selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemplateId {
    General,
    ProductSpecific,
    ProductRecommendation,
    OrderInstructions,
    Clarification,
}

impl TemplateId {
    pub const ALL: [TemplateId; 5] = [
        TemplateId::General,
        TemplateId::ProductSpecific,
        TemplateId::ProductRecommendation,
        TemplateId::OrderInstructions,
        TemplateId::Clarification,
    ];

    /// File stem under the prompts directory.
    pub fn file_stem(self) -> &'static str {
        match self {
            TemplateId::General => "general",
            TemplateId::ProductSpecific => "product_specific",
            TemplateId::ProductRecommendation => "product_recommendation",
            TemplateId::OrderInstructions => "order_instructions",
            TemplateId::Clarification => "clarification",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

/// Caller-requested conversational mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleType {
    General,
    ProductSpecific,
    Recommendation,
    OrderInstructions,
    Clarification,
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl FromStr for RoleType {
    type Err = UnknownRole;

    /// Accepts snake_case and camelCase, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "general" => Ok(RoleType::General),
            "productspecific" => Ok(RoleType::ProductSpecific),
            "recommendation" | "productrecommendation" => Ok(RoleType::Recommendation),
            "orderinstructions" => Ok(RoleType::OrderInstructions),
            "clarification" => Ok(RoleType::Clarification),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// True if the message mentions any order keyword (case-insensitive substring).
pub fn classify_order_intent(message: &str) -> bool {
    let lower = message.to_lowercase();
    ORDER_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Picks the template for a request.
///
/// Order intent with a product in context always routes to
/// [`TemplateId::OrderInstructions`], whatever the caller asked for.
pub fn resolve_template(
    requested: Option<&str>,
    order_intent: bool,
    has_product: bool,
) -> TemplateId {
    if order_intent && has_product {
        return TemplateId::OrderInstructions;
    }
    match requested.and_then(|r| r.parse::<RoleType>().ok()) {
        Some(RoleType::ProductSpecific) if has_product => TemplateId::ProductSpecific,
        Some(RoleType::Recommendation) => TemplateId::ProductRecommendation,
        Some(RoleType::OrderInstructions) if has_product => TemplateId::OrderInstructions,
        Some(RoleType::Clarification) => TemplateId::Clarification,
        _ => TemplateId::General,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_intent_bilingual() {
        assert!(classify_order_intent("Wie kann ich das bestellen?"));
        assert!(classify_order_intent("Is it in STOCK?"));
        assert!(classify_order_intent("Verfügbarkeit bitte"));
        assert!(!classify_order_intent("What's the weather?"));
    }

    #[test]
    fn order_intent_needs_product() {
        assert_eq!(
            resolve_template(Some("recommendation"), true, true),
            TemplateId::OrderInstructions
        );
        assert_eq!(
            resolve_template(Some("recommendation"), true, false),
            TemplateId::ProductRecommendation
        );
        assert_eq!(resolve_template(None, true, false), TemplateId::General);
    }

    #[test]
    fn role_routing() {
        assert_eq!(
            resolve_template(Some("product_specific"), false, true),
            TemplateId::ProductSpecific
        );
        assert_eq!(
            resolve_template(Some("productSpecific"), false, false),
            TemplateId::General
        );
        assert_eq!(
            resolve_template(Some("productRecommendation"), false, false),
            TemplateId::ProductRecommendation
        );
        assert_eq!(
            resolve_template(Some("order_instructions"), false, false),
            TemplateId::General
        );
        assert_eq!(
            resolve_template(Some("Clarification"), false, false),
            TemplateId::Clarification
        );
        assert_eq!(resolve_template(Some("poetry"), false, true), TemplateId::General);
    }
}
