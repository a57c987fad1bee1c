//! Deterministic advice text for a shortlist, no model involved.

use crate::product::{Product, format_price_text};

pub const NO_MATCHES: &str =
    "Es wurden keine passenden Produkte gefunden. Bitte versuchen Sie es mit anderen Suchbegriffen.";
pub const ADVICE_FAILED: &str =
    "Entschuldigung, es gab ein Problem bei der Suche nach Empfehlungen.";

/// How many products the summary covers.
pub fn advice_limit(single_product: bool) -> usize {
    if single_product { 1 } else { 5 }
}

/// Numbered summary: name and price, type, key specs, first two `ideal_for`
/// tags. Lines for empty sections are left out.
pub fn advice_summary(products: &[Product], single_product: bool) -> String {
    let mut out = if single_product {
        String::from("Basierend auf Ihren Anforderungen empfehle ich dieses Produkt:\n")
    } else {
        String::from("Basierend auf Ihren Anforderungen empfehle ich diese Produkte:\n")
    };

    for (i, p) in products.iter().enumerate() {
        let h = &p.header;
        out.push_str(&format!(
            "\n{}. {} ({})",
            i + 1,
            h.name,
            format_price_text(&h.price)
        ));
        out.push_str(&format!("\n   Typ: {}", h.kind));

        let key_specs = key_specs(p);
        if !key_specs.is_empty() {
            out.push_str(&format!("\n   Spezifikationen: {}", key_specs.join(", ")));
        }

        let ideal = &p.target_audience.ideal_for;
        if !ideal.is_empty() {
            let first: Vec<&str> = ideal.iter().take(2).map(String::as_str).collect();
            out.push_str(&format!("\n   Ideal für: {}", first.join(", ")));
        }
    }
    out
}

fn key_specs(p: &Product) -> Vec<String> {
    let system = &p.specifications.system;
    [("RAM", "RAM"), ("CPU", "CPU"), ("Storage", "Speicher")]
        .into_iter()
        .filter_map(|(key, label)| system.get(key).map(|v| format!("{label}: {v}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::product::normalize;

    fn product(id: &str, pairs: &[(&str, &str)]) -> Product {
        let raw: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        normalize(&raw, id)
    }

    #[test]
    fn single_product_summary() {
        let p = product(
            "7",
            &[
                ("manufacturer", "Lenovo"),
                ("model", "ThinkPad T14"),
                ("type", "Notebook"),
                ("price_chf", "1499"),
                ("tech_specs", "CPU: Ryzen 7, GPU: Radeon, RAM: 32GB, Storage: 1TB SSD"),
                ("ideal_for", "Office, Travel, Development"),
            ],
        );
        let text = advice_summary(&[p], true);
        assert_eq!(
            text,
            "Basierend auf Ihren Anforderungen empfehle ich dieses Produkt:\n\
             \n1. Lenovo ThinkPad T14 (CHF 1499)\
             \n   Typ: Notebook\
             \n   Spezifikationen: RAM: 32GB, CPU: Ryzen 7, Speicher: 1TB SSD\
             \n   Ideal für: Office, Travel"
        );
    }

    #[test]
    fn sparse_products_skip_optional_lines() {
        let a = product("a", &[("manufacturer", "HP"), ("model", "Elite")]);
        let b = product("b", &[("model", "Mini"), ("price_chf", "PCLCM")]);
        let text = advice_summary(&[a, b], false);

        assert!(text.starts_with("Basierend auf Ihren Anforderungen empfehle ich diese Produkte:\n"));
        assert!(text.contains("\n1. HP Elite (Preis auf Anfrage)\n   Typ: N/A"));
        assert!(text.contains("\n2. Mini (Preis auf Anfrage (PCLCM))"));
        assert!(!text.contains("Spezifikationen"));
        assert!(!text.contains("Ideal für"));
    }

    #[test]
    fn limit_follows_flag() {
        assert_eq!(advice_limit(true), 1);
        assert_eq!(advice_limit(false), 5);
    }
}
