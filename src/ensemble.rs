use crate::classifiers::rule_based::RuleBasedClassifier;
use crate::classifiers::simulated::SimulatedMlModel;
use crate::classifiers::{ClassifierVerdict, Scorer};
use crate::config::DetectorConfig;
use crate::features::FeatureMap;
use crate::report::{DetectionReport, InputKind, RiskLevel};
use chrono::Utc;

/// Combines the rule-based and simulated-model verdicts by weighted
/// majority vote, blends their confidences, and generates the explanation.
/// Ties are impossible: with weights 0.6/0.4 a disagreement lands at ±0.2,
/// never exactly zero.
pub struct EnsembleDetector {
    kind: InputKind,
    rule_classifier: Box<dyn Scorer>,
    ml_model: Box<dyn Scorer>,
    rule_weight: f64,
    model_weight: f64,
}

impl EnsembleDetector {
    pub fn for_url(config: &DetectorConfig) -> Self {
        Self {
            kind: InputKind::Url,
            rule_classifier: Box::new(RuleBasedClassifier::for_url(&config.rule_weights)),
            ml_model: Box::new(SimulatedMlModel::new(
                "simulated_url",
                config.simulated_model.url.clone(),
            )),
            rule_weight: config.ensemble.rule_weight,
            model_weight: config.ensemble.model_weight,
        }
    }

    pub fn for_email(config: &DetectorConfig) -> Self {
        Self {
            kind: InputKind::Email,
            rule_classifier: Box::new(RuleBasedClassifier::for_email(&config.rule_weights)),
            ml_model: Box::new(SimulatedMlModel::new(
                "simulated_email",
                config.simulated_model.email.clone(),
            )),
            rule_weight: config.ensemble.rule_weight,
            model_weight: config.ensemble.model_weight,
        }
    }

    pub fn analyze(&self, input: &str, features: &FeatureMap) -> DetectionReport {
        let rule_verdict = self.rule_classifier.score(features);
        let ml_verdict = self.ml_model.score(features);
        let (is_phishing, confidence) = self.combine(&rule_verdict, &ml_verdict);

        let explanation = match self.kind {
            InputKind::Url => url_explanation(features, is_phishing),
            InputKind::Email => email_explanation(features, is_phishing),
        };

        log::info!(
            "{} analysis: phishing={}, confidence={:.2} (rule={}, model={})",
            self.kind,
            is_phishing,
            confidence,
            rule_verdict.is_phishing,
            ml_verdict.is_phishing
        );

        DetectionReport {
            is_phishing,
            confidence: confidence.min(1.0),
            risk_level: RiskLevel::from_confidence(confidence),
            rule_based_result: rule_verdict.is_phishing,
            rule_based_confidence: rule_verdict.confidence,
            ml_result: ml_verdict.is_phishing,
            ml_confidence: ml_verdict.confidence,
            explanation,
            input: input.to_string(),
            kind: self.kind,
            timestamp: Utc::now(),
        }
    }

    /// Weighted majority vote plus confidence blend with the same weights.
    pub fn combine(
        &self,
        rule_verdict: &ClassifierVerdict,
        ml_verdict: &ClassifierVerdict,
    ) -> (bool, f64) {
        let rule_vote = if rule_verdict.is_phishing { 1.0 } else { -1.0 };
        let ml_vote = if ml_verdict.is_phishing { 1.0 } else { -1.0 };

        let ensemble_score = rule_vote * self.rule_weight + ml_vote * self.model_weight;
        let is_phishing = ensemble_score > 0.0;

        let confidence =
            rule_verdict.confidence * self.rule_weight + ml_verdict.confidence * self.model_weight;

        (is_phishing, confidence)
    }
}

/// Features that signal safety rather than suspicion; they never appear as
/// phishing reasons.
const URL_SAFETY_FEATURES: [&str; 3] = ["has_https", "is_trusted_domain", "domain_age_days"];

fn url_explanation(features: &FeatureMap, is_phishing: bool) -> String {
    if is_phishing {
        let mut explanation = String::from("This URL was flagged as POTENTIAL PHISHING because:\n");

        let mut suspicious: Vec<(&str, f64)> = features
            .iter()
            .filter(|(name, value)| *value > 0.0 && !URL_SAFETY_FEATURES.contains(name))
            .collect();
        // Highest raw value first; name breaks ties so output is stable.
        suspicious.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(b.0))
        });

        for (name, value) in suspicious.iter().take(3) {
            explanation.push_str(&format!(
                "• {} (score: {})\n",
                title_case(name),
                format_value(*value)
            ));
        }

        if features.get("has_https") == 0.0 {
            explanation.push_str("• No HTTPS Encryption (connection not secure)\n");
        }
        if features.get("is_trusted_domain") == 0.0 {
            explanation.push_str("• Not a Trusted Domain\n");
        }

        explanation
    } else {
        let mut explanation = String::from("This URL appears to be SAFE because:\n");
        let mut safe_indicators = Vec::new();

        if features.get("has_https") == 1.0 {
            safe_indicators.push("Uses HTTPS Encryption");
        }
        if features.get("is_trusted_domain") == 1.0 {
            safe_indicators.push("From Trusted Domain");
        }
        if features.get("has_ip") == 0.0 {
            safe_indicators.push("No IP Address in URL");
        }
        if features.get("suspicious_tld") == 0.0 {
            safe_indicators.push("Uses Common TLD");
        }

        for indicator in safe_indicators.iter().take(3) {
            explanation.push_str(&format!("• {}\n", indicator));
        }
        if safe_indicators.is_empty() {
            explanation.push_str("• No strong phishing indicators detected\n");
        }

        explanation
    }
}

fn email_explanation(features: &FeatureMap, is_phishing: bool) -> String {
    if is_phishing {
        let mut explanation =
            String::from("This email was flagged as POTENTIAL PHISHING because:\n");
        let mut indicators = Vec::new();

        if features.get("suspicious_sender") == 1.0 {
            indicators.push("Suspicious Sender Domain".to_string());
        }

        let urgent_count = features.get("urgent_subject") + features.get("urgent_body");
        if urgent_count > 0.0 {
            indicators.push(format!(
                "Urgent Language ({} instances)",
                format_value(urgent_count)
            ));
        }

        if features.get("suspicious_keywords_count") > 0.0 {
            indicators.push("Suspicious Keywords in content".to_string());
        }
        if features.get("grammar_errors") > 0.0 {
            indicators.push("Poor Grammar/Spelling".to_string());
        }
        if features.get("link_count") > 3.0 {
            indicators.push("Multiple Suspicious Links".to_string());
        }

        for indicator in indicators.iter().take(4) {
            explanation.push_str(&format!("• {}\n", indicator));
        }
        if indicators.is_empty() {
            explanation.push_str("• Combined signals exceeded the phishing threshold\n");
        }

        explanation
    } else {
        let mut explanation = String::from("This email appears to be SAFE because:\n");
        let mut indicators = Vec::new();

        if features.get("suspicious_sender") == 0.0 {
            indicators.push("Legitimate-looking Sender");
        }
        if features.get("urgent_subject") == 0.0 {
            indicators.push("No Urgent Language in subject");
        }
        if features.get("link_count") <= 2.0 {
            indicators.push("Reasonable Number of Links");
        }

        for indicator in indicators.iter().take(3) {
            explanation.push_str(&format!("• {}\n", indicator));
        }
        if indicators.is_empty() {
            explanation.push_str("• No strong phishing indicators detected\n");
        }

        explanation
    }
}

/// "suspicious_keywords" -> "Suspicious Keywords"
fn title_case(feature_name: &str) -> String {
    feature_name
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Counts print as integers, real-valued scores with two decimals.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
