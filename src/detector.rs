use crate::config::DetectorConfig;
use crate::ensemble::EnsembleDetector;
use crate::features::email::EmailAnalyzer;
use crate::features::enhancer::FeatureEnhancer;
use crate::features::url::UrlAnalyzer;
use crate::report::{DetectionFailure, DetectionOutcome, DetectionReport};

/// Facade over the full extract -> score -> combine pipeline. Each analysis
/// is an independent, synchronous, request-scoped computation; the only
/// shared state is the read-only configuration tables.
pub struct PhishingDetector {
    url_analyzer: UrlAnalyzer,
    email_analyzer: EmailAnalyzer,
    enhancer: FeatureEnhancer,
    url_ensemble: EnsembleDetector,
    email_ensemble: EnsembleDetector,
}

impl PhishingDetector {
    pub fn new(config: DetectorConfig) -> anyhow::Result<Self> {
        Ok(Self {
            url_analyzer: UrlAnalyzer::new(config.url_analysis.clone())?,
            email_analyzer: EmailAnalyzer::new(config.email_analysis.clone())?,
            enhancer: FeatureEnhancer::new(config.enhancer.clone()),
            url_ensemble: EnsembleDetector::for_url(&config),
            email_ensemble: EnsembleDetector::for_email(&config),
        })
    }

    /// Never fails: any internal error is converted into a failure outcome.
    pub fn detect_phishing_url(&self, url: &str) -> DetectionOutcome {
        match self.analyze_url(url) {
            Ok(report) => DetectionOutcome::Report(report),
            Err(error) => {
                log::error!("URL analysis failed for {}: {}", url, error);
                DetectionOutcome::Failure(DetectionFailure::from_error(&error))
            }
        }
    }

    /// Never fails. Accepts a bare address or a full message; the feature
    /// enhancer runs before scoring.
    pub fn detect_phishing_email(&self, content: &str) -> DetectionOutcome {
        match self.analyze_email(content) {
            Ok(report) => DetectionOutcome::Report(report),
            Err(error) => {
                log::error!("Email analysis failed: {}", error);
                DetectionOutcome::Failure(DetectionFailure::from_error(&error))
            }
        }
    }

    fn analyze_url(&self, url: &str) -> anyhow::Result<DetectionReport> {
        let features = self.url_analyzer.extract(url);
        Ok(self.url_ensemble.analyze(url, &features))
    }

    fn analyze_email(&self, content: &str) -> anyhow::Result<DetectionReport> {
        let features = self.email_analyzer.extract(content);
        let features = self.enhancer.enhance(features, content);
        Ok(self.email_ensemble.analyze(content, &features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RiskLevel;

    fn detector() -> PhishingDetector {
        PhishingDetector::new(DetectorConfig::default()).unwrap()
    }

    #[test]
    fn trusted_https_url_is_safe() {
        let detector = detector();
        let outcome = detector.detect_phishing_url("https://www.google.com");
        assert!(!outcome.is_phishing());
        assert!(matches!(
            outcome.risk_level(),
            RiskLevel::Low | RiskLevel::VeryLow
        ));
        let report = outcome.as_report().unwrap();
        assert!(!report.rule_based_result);
        assert!(!report.explanation.is_empty());
    }

    #[test]
    fn ip_login_url_is_phishing() {
        let detector = detector();
        let outcome = detector.detect_phishing_url("http://192.168.1.1/login");
        assert!(outcome.is_phishing());
        let report = outcome.as_report().unwrap();
        assert!(report.rule_based_result);
    }

    #[test]
    fn shortened_suspicious_url_is_phishing() {
        let detector = detector();
        let outcome = detector.detect_phishing_url("http://bit.ly/secure-login-verify123");
        assert!(outcome.is_phishing());
    }

    #[test]
    fn suspicious_sender_address_is_phishing() {
        let detector = detector();
        let outcome = detector.detect_phishing_email("security@paypal-security.com");
        assert!(outcome.is_phishing());
        let report = outcome.as_report().unwrap();
        assert!(report.rule_based_result);
        assert!(report.confidence > 0.0 && report.confidence <= 1.0);
    }

    #[test]
    fn immigration_scam_text_is_phishing() {
        let detector = detector();
        let content = "Confirm Your Spot\nDon't let your immigration opportunity expire \
                       — secure your eligibility review now.";
        let outcome = detector.detect_phishing_email(content);
        assert!(outcome.is_phishing());
    }

    #[test]
    fn plain_benign_address_is_safe() {
        let detector = detector();
        let outcome = detector.detect_phishing_email("friend@example.org");
        assert!(!outcome.is_phishing());
    }

    #[test]
    fn reports_carry_input_and_kind() {
        let detector = detector();
        let report = detector
            .detect_phishing_url("https://www.google.com")
            .as_report()
            .cloned()
            .unwrap();
        assert_eq!(report.input, "https://www.google.com");
        assert_eq!(report.kind.to_string(), "url");

        let report = detector
            .detect_phishing_email("friend@example.org")
            .as_report()
            .cloned()
            .unwrap();
        assert_eq!(report.kind.to_string(), "email");
    }

    #[test]
    fn reports_serialize_to_json() {
        let detector = detector();
        let outcome = detector.detect_phishing_url("https://www.google.com");
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"type\":\"url\""));
        assert!(json.contains("\"risk_level\""));
    }
}
