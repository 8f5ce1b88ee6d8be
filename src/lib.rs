pub mod classifiers;
pub mod config;
pub mod detector;
pub mod ensemble;
pub mod features;
pub mod history;
pub mod report;

pub use config::DetectorConfig;
pub use detector::PhishingDetector;
pub use history::AnalysisHistory;
pub use report::{DetectionOutcome, DetectionReport, InputKind, RiskLevel};
