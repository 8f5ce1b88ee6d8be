use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Coarse four-bucket mapping of blended confidence, plus the Unknown
/// bucket reserved for failed analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "MEDIUM")]
    Medium,
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "VERY LOW")]
    VeryLow,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl RiskLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            RiskLevel::High
        } else if confidence >= 0.6 {
            RiskLevel::Medium
        } else if confidence >= 0.4 {
            RiskLevel::Low
        } else {
            RiskLevel::VeryLow
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskLevel::High => "HIGH",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::Low => "LOW",
            RiskLevel::VeryLow => "VERY LOW",
            RiskLevel::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Url,
    Email,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Url => f.write_str("url"),
            InputKind::Email => f.write_str("email"),
        }
    }
}

/// Final product of one analysis call. Created once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub is_phishing: bool,
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub rule_based_result: bool,
    pub rule_based_confidence: f64,
    pub ml_result: bool,
    pub ml_confidence: f64,
    pub explanation: String,
    pub input: String,
    #[serde(rename = "type")]
    pub kind: InputKind,
    pub timestamp: DateTime<Utc>,
}

/// Returned instead of propagating any failure out of the entry points.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionFailure {
    pub error: String,
    pub is_phishing: bool,
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub explanation: String,
}

impl DetectionFailure {
    pub fn from_error(error: &anyhow::Error) -> Self {
        Self {
            error: error.to_string(),
            is_phishing: false,
            confidence: 0.0,
            risk_level: RiskLevel::Unknown,
            explanation: format!("Analysis failed: {}", error),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DetectionOutcome {
    Report(DetectionReport),
    Failure(DetectionFailure),
}

impl DetectionOutcome {
    pub fn is_phishing(&self) -> bool {
        match self {
            DetectionOutcome::Report(report) => report.is_phishing,
            DetectionOutcome::Failure(failure) => failure.is_phishing,
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            DetectionOutcome::Report(report) => report.confidence,
            DetectionOutcome::Failure(failure) => failure.confidence,
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        match self {
            DetectionOutcome::Report(report) => report.risk_level,
            DetectionOutcome::Failure(failure) => failure.risk_level,
        }
    }

    pub fn explanation(&self) -> &str {
        match self {
            DetectionOutcome::Report(report) => &report.explanation,
            DetectionOutcome::Failure(failure) => &failure.explanation,
        }
    }

    pub fn as_report(&self) -> Option<&DetectionReport> {
        match self {
            DetectionOutcome::Report(report) => Some(report),
            DetectionOutcome::Failure(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_buckets() {
        assert_eq!(RiskLevel::from_confidence(0.95), RiskLevel::High);
        assert_eq!(RiskLevel::from_confidence(0.8), RiskLevel::High);
        assert_eq!(RiskLevel::from_confidence(0.7), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_confidence(0.6), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_confidence(0.5), RiskLevel::Low);
        assert_eq!(RiskLevel::from_confidence(0.4), RiskLevel::Low);
        assert_eq!(RiskLevel::from_confidence(0.39), RiskLevel::VeryLow);
        assert_eq!(RiskLevel::from_confidence(0.0), RiskLevel::VeryLow);
    }

    #[test]
    fn risk_level_serializes_as_screaming_labels() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::VeryLow).unwrap(),
            "\"VERY LOW\""
        );
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"HIGH\"");
    }

    #[test]
    fn failure_carries_the_error_message() {
        let failure = DetectionFailure::from_error(&anyhow::anyhow!("boom"));
        assert_eq!(failure.error, "boom");
        assert!(!failure.is_phishing);
        assert_eq!(failure.confidence, 0.0);
        assert_eq!(failure.risk_level, RiskLevel::Unknown);
        assert!(failure.explanation.contains("boom"));
    }
}
