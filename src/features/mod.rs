pub mod email;
pub mod enhancer;
pub mod url;

use serde::Serialize;
use std::collections::HashMap;

/// Flat mapping from feature name to numeric value. Counts and 0/1 booleans
/// are stored as f64 alongside float scores; missing keys read as 0.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FeatureMap {
    values: HashMap<String, f64>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn add(&mut self, name: &str, delta: f64) {
        *self.values.entry(name.to_string()).or_insert(0.0) += delta;
    }

    pub fn set_flag(&mut self, name: &str, flag: bool) {
        self.set(name, if flag { 1.0 } else { 0.0 });
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Domain components parsed from a URL host. With fewer than two labels the
/// whole host is the domain and tld stays empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainParts {
    pub domain: String,
    pub tld: String,
    pub subdomain_count: usize,
    pub full_domain: String,
}

/// Count how many list entries occur in the text (lower-cased substring
/// match, at most one hit per entry). Overlapping entries such as "secure"
/// and "security" count independently.
pub fn count_keyword_hits(text: &str, keywords: &[String]) -> usize {
    let text_lower = text.to_lowercase();
    keywords
        .iter()
        .filter(|keyword| text_lower.contains(keyword.to_lowercase().as_str()))
        .count()
}
