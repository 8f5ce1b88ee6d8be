use crate::classifiers::{ClassifierVerdict, ScoreDetail, Scorer};
use crate::config::RuleWeightsConfig;
use crate::features::FeatureMap;
use std::collections::HashMap;

/// Hand-tuned weighted-sum classifier. The weight table is fixed per input
/// domain; the raw score is thresholded into the decision and its magnitude
/// drives the confidence.
pub struct RuleBasedClassifier {
    name: &'static str,
    weights: HashMap<String, f64>,
    threshold: f64,
    /// URL only: flat discount when the domain is trusted, floored at zero.
    trusted_domain_discount: f64,
}

impl RuleBasedClassifier {
    pub fn for_url(config: &RuleWeightsConfig) -> Self {
        Self {
            name: "rule_based_url",
            weights: config.url.clone(),
            threshold: config.url_threshold,
            trusted_domain_discount: config.trusted_domain_discount,
        }
    }

    pub fn for_email(config: &RuleWeightsConfig) -> Self {
        Self {
            name: "rule_based_email",
            weights: config.email.clone(),
            threshold: config.email_threshold,
            trusted_domain_discount: 0.0,
        }
    }
}

impl Scorer for RuleBasedClassifier {
    fn score(&self, features: &FeatureMap) -> ClassifierVerdict {
        let mut raw_score = 0.0;
        let mut details = ScoreDetail::new();

        for (feature, weight) in &self.weights {
            let contribution = features.get(feature) * weight;
            raw_score += contribution;
            details.insert(feature.clone(), contribution);
        }

        if self.trusted_domain_discount > 0.0 && features.get("is_trusted_domain") >= 1.0 {
            raw_score = (raw_score - self.trusted_domain_discount).max(0.0);
        }

        let is_phishing = raw_score > self.threshold;
        let confidence = (raw_score.abs() / 100.0).min(1.0);
        log::debug!(
            "{}: raw score {:.2}, phishing: {}",
            self.name,
            raw_score,
            is_phishing
        );

        ClassifierVerdict {
            is_phishing,
            confidence,
            details,
        }
    }

    fn name(&self) -> &str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleWeightsConfig;

    fn url_classifier() -> RuleBasedClassifier {
        RuleBasedClassifier::for_url(&RuleWeightsConfig::default())
    }

    fn email_classifier() -> RuleBasedClassifier {
        RuleBasedClassifier::for_email(&RuleWeightsConfig::default())
    }

    #[test]
    fn confidence_stays_in_unit_interval() {
        let classifier = url_classifier();

        let mut extreme = FeatureMap::new();
        extreme.set("has_ip", 1.0);
        extreme.set("url_length", 5000.0);
        extreme.set("digit_count", 200.0);
        let verdict = classifier.score(&extreme);
        assert!(verdict.confidence >= 0.0 && verdict.confidence <= 1.0);

        let verdict = classifier.score(&FeatureMap::new());
        assert!(verdict.confidence >= 0.0 && verdict.confidence <= 1.0);
    }

    #[test]
    fn url_threshold_is_25() {
        let classifier = url_classifier();

        // has_ip alone scores exactly 25, which is not over the threshold.
        let mut features = FeatureMap::new();
        features.set("has_ip", 1.0);
        assert!(!classifier.score(&features).is_phishing);

        features.set("dot_count", 1.0);
        assert!(classifier.score(&features).is_phishing);
    }

    #[test]
    fn trusted_domain_discount_floors_at_zero() {
        let classifier = url_classifier();
        let mut features = FeatureMap::new();
        features.set("is_trusted_domain", 1.0);
        features.set("has_https", 1.0);
        features.set("domain_age_days", 1000.0);

        let verdict = classifier.score(&features);
        assert!(!verdict.is_phishing);
        // -25 - 15 - 10 - 30 clamps to 0, so confidence is 0 too.
        assert_eq!(verdict.confidence, 0.0);
    }

    #[test]
    fn email_threshold_is_20() {
        let classifier = email_classifier();

        let mut features = FeatureMap::new();
        features.set("urgent_subject", 1.0);
        // 15 points, under the threshold
        assert!(!classifier.score(&features).is_phishing);

        features.set("urgent_body", 1.0);
        // 25 points, over
        assert!(classifier.score(&features).is_phishing);
    }

    #[test]
    fn spf_and_dkim_pull_the_score_down() {
        let classifier = email_classifier();
        let mut features = FeatureMap::new();
        features.set("suspicious_sender", 1.0);
        features.set("has_spf", 1.0);
        features.set("has_dkim", 1.0);

        // 30 - 15 - 15 = 0
        let verdict = classifier.score(&features);
        assert!(!verdict.is_phishing);
    }

    #[test]
    fn details_carry_signed_contributions() {
        let classifier = url_classifier();
        let mut features = FeatureMap::new();
        features.set("has_https", 1.0);
        features.set("suspicious_keywords", 2.0);

        let verdict = classifier.score(&features);
        assert_eq!(verdict.details["has_https"], -15.0);
        assert_eq!(verdict.details["suspicious_keywords"], 30.0);
        // every weighted feature appears, even at zero
        assert_eq!(verdict.details.len(), 13);
    }
}
