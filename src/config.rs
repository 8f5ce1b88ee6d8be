use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level detector configuration. Every tunable table lives here so the
/// analyzers and scorers themselves stay stateless. The defaults are the
/// shipped tables; a YAML file can override any section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub url_analysis: UrlAnalysisConfig,
    pub email_analysis: EmailAnalysisConfig,
    pub enhancer: EnhancerConfig,
    pub rule_weights: RuleWeightsConfig,
    pub simulated_model: SimulatedModelConfig,
    pub ensemble: EnsembleConfig,
}

impl DetectorConfig {
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: DetectorConfig =
            serde_yaml::from_str(&content).with_context(|| format!("Invalid config: {}", path))?;
        Ok(config)
    }

    pub fn generate_default(path: &str) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(&DetectorConfig::default())?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UrlAnalysisConfig {
    pub suspicious_tlds: Vec<String>,
    pub trusted_domains: Vec<String>,
    pub suspicious_keywords: Vec<String>,
    pub shortener_domains: Vec<String>,
    /// Offline stand-ins for WHOIS domain age (days). A future live lookup
    /// can replace these without touching scoring logic.
    pub trusted_domain_age_days: f64,
    pub suspicious_domain_age_days: f64,
    pub default_domain_age_days: f64,
}

impl Default for UrlAnalysisConfig {
    fn default() -> Self {
        Self {
            suspicious_tlds: to_strings(&[
                "tk", "ml", "ga", "cf", "xyz", "top", "club", "loan", "work", "site", "online",
                "stream",
            ]),
            trusted_domains: to_strings(&[
                "google.com",
                "microsoft.com",
                "apple.com",
                "amazon.com",
                "facebook.com",
                "paypal.com",
                "github.com",
            ]),
            suspicious_keywords: to_strings(&[
                "login",
                "verify",
                "account",
                "secure",
                "update",
                "banking",
                "paypal",
                "ebay",
                "amazon",
                "apple",
                "microsoft",
                "confirm",
                "password",
                "validation",
                "authenticate",
                "security",
            ]),
            shortener_domains: to_strings(&[
                "bit.ly",
                "goo.gl",
                "tinyurl.com",
                "t.co",
                "ow.ly",
                "is.gd",
                "buff.ly",
                "adf.ly",
            ]),
            trusted_domain_age_days: 1000.0,
            suspicious_domain_age_days: 5.0,
            default_domain_age_days: 100.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmailAnalysisConfig {
    /// Urgency / social-engineering vocabulary shared by subject and body
    /// keyword counts.
    pub suspicious_keywords: Vec<String>,
    /// Sender domains known to impersonate support/security teams.
    pub suspicious_domains: Vec<String>,
    /// Brands commonly spoofed in display names.
    pub impersonated_brands: Vec<String>,
    /// Canonical domains of the impersonated brands.
    pub brand_domains: Vec<String>,
    pub scam_indicators: Vec<String>,
    pub immigration_keywords: Vec<String>,
    pub urgency_phrases: Vec<String>,
}

impl Default for EmailAnalysisConfig {
    fn default() -> Self {
        Self {
            suspicious_keywords: to_strings(&[
                "urgent",
                "immediately",
                "action required",
                "verify your account",
                "suspended",
                "security alert",
                "password reset",
                "click here",
                "unusual activity",
                "confirm your identity",
                "account verification",
                "limited time",
                "offer expires",
                "dear customer",
                "valued member",
                "immigration",
                "eligibility",
                "consultation",
                "spot",
                "expire",
                "last chance",
                "incomplete application",
                "restart the process",
                "higher costs",
                "longer wait times",
                "secure your",
                "book now",
                "confirm your spot",
                "don't let",
                "opportunity expire",
            ]),
            suspicious_domains: to_strings(&[
                "paypal-security.com",
                "apple-support.net",
                "amazon-help.com",
                "microsoft-update.com",
                "banking-alert.com",
                "verify-login.com",
                "account-security.com",
                "online-verification.com",
                "canamigrate.com",
            ]),
            impersonated_brands: to_strings(&[
                "paypal", "apple", "microsoft", "amazon", "google", "bank", "ebay", "netflix",
            ]),
            brand_domains: to_strings(&[
                "paypal.com",
                "apple.com",
                "microsoft.com",
                "amazon.com",
                "google.com",
            ]),
            scam_indicators: to_strings(&[
                "immigration opportunity",
                "eligibility review",
                "last chance",
                "incomplete application",
                "restart the process",
                "higher costs",
                "confirm your spot",
                "book my interview",
                "secure your",
            ]),
            immigration_keywords: to_strings(&[
                "immigration",
                "visa",
                "canada",
                "canadian",
                "eligibility",
                "application",
                "consultation",
                "interview",
                "migration",
            ]),
            urgency_phrases: to_strings(&[
                "last chance",
                "don't let",
                "expire",
                "limited time",
                "act now",
                "immediately",
                "today only",
                "final opportunity",
            ]),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnhancerConfig {
    /// All terms must appear together for the account-lockout boost.
    pub account_lockout_terms: Vec<String>,
    /// Any single term triggers the immigration-scam boost.
    pub immigration_terms: Vec<String>,
    /// Each matching phrase adds 1 to urgency_pressure.
    pub pressure_phrases: Vec<String>,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            account_lockout_terms: to_strings(&["urgent", "account", "suspended"]),
            immigration_terms: to_strings(&[
                "immigration",
                "eligibility",
                "consultation",
                "spot",
                "expire",
            ]),
            pressure_phrases: to_strings(&[
                "last chance",
                "don't let",
                "expire",
                "act now",
                "today only",
            ]),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RuleWeightsConfig {
    pub url: HashMap<String, f64>,
    pub email: HashMap<String, f64>,
    pub url_threshold: f64,
    pub email_threshold: f64,
    /// Flat discount applied to the raw URL score when the domain is
    /// trusted, floored at zero.
    pub trusted_domain_discount: f64,
}

impl Default for RuleWeightsConfig {
    fn default() -> Self {
        Self {
            url: weight_map(&[
                ("has_ip", 25.0),
                ("suspicious_tld", 20.0),
                ("url_length", 0.1),
                ("special_chars_count", 10.0),
                ("digit_count", 5.0),
                ("suspicious_keywords", 15.0),
                ("has_https", -15.0),
                ("is_trusted_domain", -25.0),
                ("domain_age_days", -0.01),
                ("dot_count", 2.0),
                ("has_hyphen", 8.0),
                ("entropy", 0.5),
                ("is_shortened", 20.0),
            ]),
            email: weight_map(&[
                ("suspicious_sender", 30.0),
                ("urgent_subject", 15.0),
                ("urgent_body", 10.0),
                ("suspicious_keywords_count", 10.0),
                ("grammar_errors", 10.0),
                ("link_count", 15.0),
                ("has_spf", -15.0),
                ("has_dkim", -15.0),
                ("body_length", 0.0),
                ("subject_length", 0.0),
                ("has_display_name", 5.0),
                ("scam_indicators_count", 12.0),
                ("immigration_related", 8.0),
                ("urgency_pressure", 10.0),
            ]),
            url_threshold: 25.0,
            email_threshold: 20.0,
            trusted_domain_discount: 30.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulatedModelConfig {
    pub url: SimulatedModelParams,
    pub email: SimulatedModelParams,
}

impl Default for SimulatedModelConfig {
    fn default() -> Self {
        Self {
            url: SimulatedModelParams {
                feature_order: to_strings(&[
                    "has_ip",
                    "suspicious_tld",
                    "url_length",
                    "special_chars_count",
                    "digit_count",
                    "suspicious_keywords",
                    "has_https",
                    "is_trusted_domain",
                    "domain_age_days",
                    "dot_count",
                    "has_hyphen",
                    "entropy",
                    "is_shortened",
                ]),
                weights: vec![
                    0.15, 0.12, 0.10, 0.08, 0.05, 0.12, -0.08, -0.15, -0.02, 0.08, 0.06, 0.04,
                    0.10,
                ],
                bias: 0.1,
                noise_amplitude: 0.1,
            },
            email: SimulatedModelParams {
                feature_order: to_strings(&[
                    "suspicious_sender",
                    "urgent_subject",
                    "urgent_body",
                    "suspicious_keywords_count",
                    "grammar_errors",
                    "link_count",
                    "has_spf",
                    "has_dkim",
                    "body_length",
                    "subject_length",
                    "has_display_name",
                ]),
                weights: vec![0.25, 0.12, 0.08, 0.07, 0.06, 0.12, -0.12, -0.12, 0.0, 0.0, 0.03],
                bias: 0.05,
                noise_amplitude: 0.08,
            },
        }
    }
}

/// Fixed-weight linear model parameters. The feature order defines the
/// vector layout; it must stay in lockstep with the weight vector.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulatedModelParams {
    pub feature_order: Vec<String>,
    pub weights: Vec<f64>,
    pub bias: f64,
    pub noise_amplitude: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnsembleConfig {
    pub rule_weight: f64,
    pub model_weight: f64,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            rule_weight: 0.6,
            model_weight: 0.4,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn weight_map(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries
        .iter()
        .map(|(name, weight)| (name.to_string(), *weight))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_tables() {
        let config = DetectorConfig::default();
        assert_eq!(config.url_analysis.suspicious_tlds.len(), 12);
        assert_eq!(config.url_analysis.suspicious_keywords.len(), 16);
        assert_eq!(config.rule_weights.url.len(), 13);
        assert_eq!(config.rule_weights.email.len(), 14);
        assert_eq!(config.ensemble.rule_weight, 0.6);
        assert_eq!(config.ensemble.model_weight, 0.4);
    }

    #[test]
    fn simulated_model_vectors_are_aligned() {
        let config = SimulatedModelConfig::default();
        assert_eq!(config.url.feature_order.len(), config.url.weights.len());
        assert_eq!(config.email.feature_order.len(), config.email.weights.len());
    }

    #[test]
    fn config_round_trips_through_yaml() {
        let config = DetectorConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let reloaded: DetectorConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(
            reloaded.rule_weights.url_threshold,
            config.rule_weights.url_threshold
        );
        assert_eq!(
            reloaded.email_analysis.suspicious_domains,
            config.email_analysis.suspicious_domains
        );
    }
}
