use crate::config::UrlAnalysisConfig;
use crate::features::{count_keyword_hits, DomainParts, FeatureMap};
use regex::Regex;
use std::collections::HashMap;
use url::Url;

const SPECIAL_CHARS: [char; 12] = ['@', '!', '$', '%', '&', '*', '+', '=', ';', '?', '-', '_'];

/// Extracts the fixed URL feature vocabulary from a raw URL string. Works
/// entirely offline; domain age and redirect count are heuristic stand-ins
/// for the unavailable WHOIS / redirect-following lookups.
pub struct UrlAnalyzer {
    config: UrlAnalysisConfig,
    ip_pattern: Regex,
}

impl UrlAnalyzer {
    pub fn new(config: UrlAnalysisConfig) -> anyhow::Result<Self> {
        let ip_pattern = Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b")?;
        Ok(Self { config, ip_pattern })
    }

    /// Total function: malformed URLs degrade to empty/zero domain fields
    /// instead of erroring.
    pub fn extract(&self, url: &str) -> FeatureMap {
        let mut features = FeatureMap::new();

        features.set("url_length", url.chars().count() as f64);
        features.set_flag("has_https", url.starts_with("https"));
        features.set_flag("has_ip", self.has_ip_address(url));
        features.set("special_chars_count", count_special_chars(url) as f64);
        features.set(
            "digit_count",
            url.chars().filter(|c| c.is_ascii_digit()).count() as f64,
        );
        features.set("dot_count", url.matches('.').count() as f64);

        let domain_info = self.parse_domain(url);
        features.set("domain_length", domain_info.domain.chars().count() as f64);
        features.set("subdomain_count", domain_info.subdomain_count as f64);
        features.set_flag(
            "suspicious_tld",
            self.config.suspicious_tlds.contains(&domain_info.tld),
        );
        features.set_flag("has_hyphen", domain_info.domain.contains('-'));

        features.set("domain_age_days", self.estimate_domain_age(&domain_info.full_domain));
        features.set_flag("is_trusted_domain", self.is_trusted_domain(&domain_info));
        // No live redirect probing in offline mode.
        features.set("redirect_count", 0.0);

        features.set(
            "suspicious_keywords",
            count_keyword_hits(url, &self.config.suspicious_keywords) as f64,
        );
        features.set("entropy", shannon_entropy(url));
        features.set_flag("is_shortened", self.is_shortened(url));

        log::debug!("URL features for {}: {} keys", url, features.len());
        features
    }

    pub fn parse_domain(&self, url: &str) -> DomainParts {
        let hostname = match extract_host(url) {
            Some(host) => host,
            None => return DomainParts::default(),
        };

        let labels: Vec<&str> = hostname.split('.').collect();
        if labels.len() >= 2 {
            DomainParts {
                domain: labels[labels.len() - 2].to_string(),
                tld: labels[labels.len() - 1].to_string(),
                subdomain_count: labels.len().saturating_sub(2),
                full_domain: hostname,
            }
        } else {
            DomainParts {
                domain: hostname.clone(),
                tld: String::new(),
                subdomain_count: 0,
                full_domain: hostname,
            }
        }
    }

    fn has_ip_address(&self, url: &str) -> bool {
        let hostname = match extract_host(url) {
            Some(host) => host,
            None => return false,
        };
        self.ip_pattern.is_match(&hostname) || hostname.parse::<std::net::Ipv4Addr>().is_ok()
    }

    fn estimate_domain_age(&self, full_domain: &str) -> f64 {
        if self
            .config
            .trusted_domains
            .iter()
            .any(|trusted| full_domain.contains(trusted.as_str()))
        {
            self.config.trusted_domain_age_days
        } else if self
            .config
            .suspicious_tlds
            .iter()
            .any(|tld| full_domain.contains(tld.as_str()))
        {
            self.config.suspicious_domain_age_days
        } else {
            self.config.default_domain_age_days
        }
    }

    fn is_trusted_domain(&self, domain_info: &DomainParts) -> bool {
        self.config
            .trusted_domains
            .iter()
            .any(|trusted| domain_info.full_domain.contains(trusted.as_str()))
    }

    fn is_shortened(&self, url: &str) -> bool {
        self.config
            .shortener_domains
            .iter()
            .any(|shortener| url.contains(shortener.as_str()))
    }
}

/// Pull the host out of a URL, tolerating scheme-less input by taking the
/// leading path segment, the way a lenient parser would.
fn extract_host(url: &str) -> Option<String> {
    if let Ok(parsed) = Url::parse(url) {
        if let Some(host) = parsed.host_str() {
            return Some(host.to_string());
        }
    }

    let without_scheme = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url,
    };
    let host = without_scheme.split('/').next().unwrap_or("");
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

fn count_special_chars(url: &str) -> usize {
    url.chars().filter(|c| SPECIAL_CHARS.contains(c)).count()
}

/// Shannon entropy (base 2) over the character frequency distribution.
pub fn shannon_entropy(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }

    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in text.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }

    let total = total as f64;
    counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}
