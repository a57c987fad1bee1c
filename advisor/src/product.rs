//! Structured product view built from flat catalog metadata.
//!
//! The store keeps every product as a flat string map (see
//! `catalog_store::StoreMatch`). [`normalize`] turns that into a [`Product`]
//! where every field is populated, either with a real value or the `"N/A"`
//! sentinel, so downstream formatting never branches on missing keys.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sentinel for absent text fields.
pub const NA: &str = "N/A";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: String,
    pub header: ProductHeader,
    pub target_audience: TargetAudience,
    pub specifications: Specifications,
    pub metadata: ProductMetadata,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductHeader {
    pub manufacturer: String,
    pub model: String,
    /// `"{manufacturer} {model}"`, trimmed.
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Numeric text or a sentinel such as `N/A` / `PCLCM`.
    pub price: String,
    pub link: String,
}

impl Default for ProductHeader {
    fn default() -> Self {
        Self {
            manufacturer: String::new(),
            model: NA.into(),
            name: NA.into(),
            kind: NA.into(),
            price: NA.into(),
            link: NA.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetAudience {
    pub users: Vec<String>,
    pub ideal_for: Vec<String>,
    pub not_recommended: Vec<String>,
    pub qualification: String,
}

impl Default for TargetAudience {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            ideal_for: Vec::new(),
            not_recommended: Vec::new(),
            qualification: NA.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Specifications {
    pub system: SpecMap,
    pub os: String,
}

impl Default for Specifications {
    fn default() -> Self {
        Self {
            system: SpecMap::default(),
            os: NA.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductMetadata {
    pub id: String,
    pub qualification: String,
    pub last_updated: String,
}

impl Default for ProductMetadata {
    fn default() -> Self {
        Self {
            id: String::new(),
            qualification: NA.into(),
            last_updated: NA.into(),
        }
    }
}

/// Ordered `name -> value` specification list.
///
/// Serializes as a JSON object in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpecMap(Vec<(String, String)>);

impl SpecMap {
    /// Inserts or overwrites in place, keeping the first position of a key.
    pub fn insert(&mut self, key: String, value: String) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SpecMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SpecMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SpecVisitor;

        impl<'de> Visitor<'de> for SpecVisitor {
            type Value = SpecMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of specification names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SpecMap, A::Error> {
                let mut out = SpecMap::default();
                while let Some((k, v)) = access.next_entry::<String, serde_json::Value>()? {
                    let v = match v {
                        serde_json::Value::String(s) => s,
                        serde_json::Value::Null => continue,
                        other => other.to_string(),
                    };
                    out.insert(k, v);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(SpecVisitor)
    }
}

/// Builds a [`Product`] from flat store metadata. Never fails.
pub fn normalize(raw: &BTreeMap<String, String>, id: &str) -> Product {
    let get = |k: &str| raw.get(k).map(String::as_str);
    let or_na = |k: &str| get(k).unwrap_or(NA).to_string();

    let model = get("model")
        .unwrap_or(NA)
        .replace('\n', " ")
        .trim()
        .to_string();
    let manufacturer = get("manufacturer").unwrap_or("").to_string();
    let name = format!("{manufacturer} {model}").trim().to_string();

    Product {
        id: id.to_string(),
        header: ProductHeader {
            manufacturer,
            model,
            name,
            kind: or_na("type"),
            price: or_na("price_chf"),
            link: or_na("link"),
        },
        target_audience: TargetAudience {
            users: split_list(get("user_profile").unwrap_or("")),
            ideal_for: split_list(get("ideal_for").unwrap_or("")),
            not_recommended: split_list(get("not_recommended_for").unwrap_or("")),
            qualification: or_na("qualification"),
        },
        specifications: Specifications {
            system: parse_tech_specs(get("tech_specs").unwrap_or("")),
            os: get("os").unwrap_or(NA).trim().to_string(),
        },
        metadata: ProductMetadata {
            id: id.to_string(),
            qualification: or_na("qualification"),
            last_updated: or_na("last_updated"),
        },
    }
}

/// Splits `key: value, key: value` text into an ordered map.
///
/// Commas inside `(..)` or `[..]` do not split. The grouping flag is a plain
/// boolean, not a depth counter. Segments without `:` are dropped.
pub fn parse_tech_specs(text: &str) -> SpecMap {
    let mut out = SpecMap::default();
    if text.is_empty() {
        return out;
    }

    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut grouped = false;

    for ch in text.chars() {
        match ch {
            '(' | '[' => grouped = true,
            ')' | ']' => grouped = false,
            _ => {}
        }
        if ch == ',' && !grouped {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    for seg in segments {
        if let Some((k, v)) = seg.split_once(':') {
            out.insert(k.trim().to_string(), v.trim().to_string());
        }
    }
    out
}

/// Splits on newlines and commas; `"N/A"` and empty input give an empty list.
pub fn split_list(text: &str) -> Vec<String> {
    if text.is_empty() || text == NA {
        return Vec::new();
    }
    text.split(['\n', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Display text for a price field.
pub fn format_price_text(price: &str) -> String {
    let p = price.trim();
    if p.is_empty() || p == NA {
        "Preis auf Anfrage".to_string()
    } else if p.eq_ignore_ascii_case("PCLCM") {
        "Preis auf Anfrage (PCLCM)".to_string()
    } else {
        format!("CHF {p}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn tech_specs_keep_grouped_commas() {
        let specs =
            parse_tech_specs("RAM: 16GB, CPU: Intel i7 (10th Gen, 8-core), Storage: 512GB SSD");
        assert_eq!(specs.len(), 3);
        assert_eq!(specs.get("RAM"), Some("16GB"));
        assert_eq!(specs.get("CPU"), Some("Intel i7 (10th Gen, 8-core)"));
        assert_eq!(specs.get("Storage"), Some("512GB SSD"));
    }

    #[test]
    fn tech_specs_edge_cases() {
        let specs = parse_tech_specs("Ports: [USB-C, HDMI], junk, Display: 14\", Ports: 3x USB");
        let keys: Vec<_> = specs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Ports", "Display"]);
        assert_eq!(specs.get("Ports"), Some("3x USB"));

        // Keys keep their case; only the first ':' splits.
        let specs = parse_tech_specs("refresh Rate: 60Hz: nominal");
        assert_eq!(specs.get("refresh Rate"), Some("60Hz: nominal"));

        assert!(parse_tech_specs("").is_empty());
    }

    #[test]
    fn empty_metadata_fills_sentinels() {
        let p = normalize(&BTreeMap::new(), "7");
        assert_eq!(p.id, "7");
        assert_eq!(p.header.manufacturer, "");
        assert_eq!(p.header.model, NA);
        assert_eq!(p.header.name, NA);
        assert_eq!(p.header.kind, NA);
        assert_eq!(p.header.price, NA);
        assert_eq!(p.header.link, NA);
        assert!(p.target_audience.users.is_empty());
        assert_eq!(p.target_audience.qualification, NA);
        assert!(p.specifications.system.is_empty());
        assert_eq!(p.specifications.os, NA);
        assert_eq!(p.metadata.id, "7");
        assert_eq!(p.metadata.last_updated, NA);
    }

    #[test]
    fn full_metadata_is_structured() {
        let p = normalize(
            &raw(&[
                ("manufacturer", "HP"),
                ("model", "EliteBook\n840 G10 "),
                ("type", "Notebook"),
                ("price_chf", "1299"),
                ("user_profile", "Office\nDeveloper, Sales"),
                ("ideal_for", "N/A"),
                ("not_recommended_for", "Gaming,, CAD"),
                ("tech_specs", "RAM: 16GB, CPU: i7"),
                ("os", " Windows 11 "),
            ]),
            "42",
        );
        assert_eq!(p.header.model, "EliteBook 840 G10");
        assert_eq!(p.header.name, "HP EliteBook 840 G10");
        assert_eq!(p.target_audience.users, vec!["Office", "Developer", "Sales"]);
        assert!(p.target_audience.ideal_for.is_empty());
        assert_eq!(p.target_audience.not_recommended, vec!["Gaming", "CAD"]);
        assert_eq!(p.specifications.os, "Windows 11");
        assert_eq!(p.specifications.system.get("CPU"), Some("i7"));
    }

    #[test]
    fn product_json_keeps_spec_order() {
        let p = normalize(&raw(&[("tech_specs", "Zeta: 1, Alpha: 2")]), "1");
        let json = serde_json::to_string(&p).expect("serialize");
        let z = json.find("\"Zeta\"").expect("zeta");
        let a = json.find("\"Alpha\"").expect("alpha");
        assert!(z < a);
        assert!(json.contains("\"type\":\"N/A\""));

        let back: Product = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, p);
    }

    #[test]
    fn price_text() {
        assert_eq!(format_price_text(""), "Preis auf Anfrage");
        assert_eq!(format_price_text("N/A"), "Preis auf Anfrage");
        assert_eq!(format_price_text("pclcm"), "Preis auf Anfrage (PCLCM)");
        assert_eq!(format_price_text("1299"), "CHF 1299");
    }
}
