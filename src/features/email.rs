use crate::config::EmailAnalysisConfig;
use crate::features::{count_keyword_hits, FeatureMap};
use mail_parser::{Message, MessageParser};
use regex::Regex;

const URGENT_LANGUAGE_CAP: usize = 5;
const GRAMMAR_ERROR_CAP: usize = 5;

/// Extracts the fixed email feature vocabulary from either a bare address
/// or a full RFC 5322 message with headers and body.
pub struct EmailAnalyzer {
    config: EmailAnalysisConfig,
    sentence_split: Regex,
}

impl EmailAnalyzer {
    pub fn new(config: EmailAnalysisConfig) -> anyhow::Result<Self> {
        let sentence_split = Regex::new(r"[.!?]+")?;
        Ok(Self {
            config,
            sentence_split,
        })
    }

    /// Total function. Bare addresses (has `@` and `.`, no whitespace) get
    /// address-only analysis; content with `Subject:` or `From:` headers
    /// gets full-message analysis; anything else falls back to address-only
    /// treatment of the raw string.
    pub fn extract(&self, content: &str) -> FeatureMap {
        if content.contains('@')
            && content.contains('.')
            && !content.contains(char::is_whitespace)
        {
            self.analyze_address(content)
        } else if content.contains("Subject:") || content.contains("From:") {
            self.analyze_full_message(content)
        } else {
            self.analyze_address(content)
        }
    }

    fn analyze_full_message(&self, content: &str) -> FeatureMap {
        match MessageParser::default().parse(content.as_bytes()) {
            Some(message) => {
                let mut features = FeatureMap::new();
                self.analyze_headers(&message, &mut features);
                self.analyze_body(&message, &mut features);
                self.apply_overall_scores(&mut features);
                features
            }
            None => {
                log::warn!("Message parse failed, falling back to address analysis");
                self.analyze_address(content)
            }
        }
    }

    fn analyze_headers(&self, message: &Message, features: &mut FeatureMap) {
        let sender = sender_string(message);
        features.set_flag(
            "suspicious_sender",
            self.is_suspicious_sender(&sender),
        );
        features.set_flag(
            "has_display_name",
            sender.contains('<') && sender.contains('>'),
        );

        // mail-parser decodes RFC 2047 encoded words; a missing or
        // undecodable subject degrades to the empty string.
        let subject = message.subject().unwrap_or("");
        features.set("subject_length", subject.chars().count() as f64);
        features.set(
            "urgent_subject",
            self.urgent_language_count(subject) as f64,
        );
        features.set(
            "suspicious_subject",
            count_keyword_hits(subject, &self.config.suspicious_keywords) as f64,
        );

        // No live mail-server verification in offline mode.
        features.set("has_spf", 0.0);
        features.set("has_dkim", 0.0);
        features.set("has_dmarc", 0.0);
    }

    fn analyze_body(&self, message: &Message, features: &mut FeatureMap) {
        // Concatenate every text/plain part; attachment parts are not
        // listed as text bodies.
        let mut body_text = String::new();
        let mut index = 0;
        while let Some(part) = message.body_text(index) {
            body_text.push_str(&part);
            index += 1;
        }

        features.set("body_length", body_text.chars().count() as f64);
        features.set("urgent_body", self.urgent_language_count(&body_text) as f64);
        features.set(
            "suspicious_keywords_count",
            count_keyword_hits(&body_text, &self.config.suspicious_keywords) as f64,
        );
        features.set(
            "grammar_errors",
            self.estimate_grammar_errors(&body_text) as f64,
        );
        features.set("link_count", body_text.matches("http").count() as f64);
        features.set(
            "scam_indicators_count",
            count_keyword_hits(&body_text, &self.config.scam_indicators) as f64,
        );
        features.set(
            "immigration_related",
            count_keyword_hits(&body_text, &self.config.immigration_keywords) as f64,
        );
        features.set(
            "urgency_pressure",
            count_keyword_hits(&body_text, &self.config.urgency_phrases) as f64,
        );
    }

    fn analyze_address(&self, address: &str) -> FeatureMap {
        let mut features = FeatureMap::new();
        features.set_flag("suspicious_sender", self.is_suspicious_sender(address));
        features.set("subject_length", 0.0);
        features.set("urgent_subject", 0.0);
        features.set("body_length", 0.0);
        features.set("urgent_body", 0.0);
        features.set("suspicious_keywords_count", 0.0);
        self.apply_overall_scores(&mut features);
        features
    }

    /// A sender is suspicious when it uses a known bad domain, when a brand
    /// display name does not match the address domain, or when the address
    /// domain mimics a brand without being its canonical domain.
    fn is_suspicious_sender(&self, sender: &str) -> bool {
        let sender_lower = sender.to_lowercase();

        if self
            .config
            .suspicious_domains
            .iter()
            .any(|domain| sender_lower.contains(domain.as_str()))
        {
            return true;
        }

        if sender.contains('<') && sender.contains('>') {
            if let Some((display_name, rest)) = sender.split_once('<') {
                let address = rest.trim_end_matches('>');
                let email_domain = address.rsplit('@').next().unwrap_or("").to_lowercase();
                let display_lower = display_name.to_lowercase();

                for brand in &self.config.impersonated_brands {
                    if display_lower.contains(brand.as_str())
                        && !email_domain.contains(brand.as_str())
                    {
                        return true;
                    }
                }
            }
        }

        let parts: Vec<&str> = sender_lower.split('@').collect();
        if parts.len() == 2 {
            let domain = parts[1];
            let mimics_brand = ["paypal", "apple", "microsoft", "amazon", "google"]
                .iter()
                .any(|brand| domain.contains(brand));
            if mimics_brand
                && !self
                    .config
                    .brand_domains
                    .iter()
                    .any(|canonical| domain.contains(canonical.as_str()))
            {
                return true;
            }
        }

        false
    }

    fn urgent_language_count(&self, text: &str) -> usize {
        count_keyword_hits(text, &self.config.suspicious_keywords).min(URGENT_LANGUAGE_CAP)
    }

    /// Rough proxy for the sloppy writing common in phishing mail: sentences
    /// shouting in ALL CAPS or stacked with exclamation marks. Bodies under
    /// ten words are too short to judge.
    fn estimate_grammar_errors(&self, text: &str) -> usize {
        if text.split_whitespace().count() < 10 {
            return 0;
        }

        let mut errors = 0;
        for sentence in self.sentence_split.split(text) {
            let words: Vec<&str> = sentence.split_whitespace().collect();
            if words.len() <= 1 {
                continue;
            }

            let all_caps = words.iter().filter(|word| is_shouted_word(word)).count();
            if all_caps > 2 {
                errors += 1;
            }
            if sentence.matches('!').count() > 2 {
                errors += 1;
            }
        }

        errors.min(GRAMMAR_ERROR_CAP)
    }

    /// Informational roll-up of the header and body signals; the classifiers
    /// recompute their own weighted sums from the raw features.
    fn apply_overall_scores(&self, features: &mut FeatureMap) {
        let header_score = features.get("suspicious_sender") * 10.0
            + features.get("urgent_subject") * 3.0
            + features.get("suspicious_subject") * 2.0;

        let body_score = features.get("urgent_body") * 3.0
            + features.get("suspicious_keywords_count") * 2.0
            + features.get("grammar_errors") * 4.0
            + features.get("link_count") * 2.0;

        let phishing_score = header_score + body_score;
        features.set("phishing_score", phishing_score);
        features.set("phishing_confidence", (phishing_score / 70.0).min(1.0));
    }
}

/// Rebuild the From header as "Display Name <address>" so display-name
/// impersonation checks see the same shape the wire header had.
fn sender_string(message: &Message) -> String {
    message
        .from()
        .and_then(|from| from.first())
        .map(|addr| match (addr.name(), addr.address()) {
            (Some(name), Some(address)) => format!("{} <{}>", name, address),
            (None, Some(address)) => address.to_string(),
            (Some(name), None) => name.to_string(),
            (None, None) => String::new(),
        })
        .unwrap_or_default()
}

/// Mirrors a "word is fully upper-cased" check: at least one letter, none
/// lower-case, longer than three characters.
fn is_shouted_word(word: &str) -> bool {
    word.chars().count() > 3
        && word.chars().any(|c| c.is_alphabetic())
        && !word.chars().any(|c| c.is_lowercase())
}
