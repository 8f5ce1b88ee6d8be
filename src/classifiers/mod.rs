pub mod rule_based;
pub mod simulated;

use crate::features::FeatureMap;
use serde::Serialize;
use std::collections::HashMap;

/// Per-feature signed contribution (value × weight) to a classifier's raw
/// score. Used for explanation generation only, never for the decision.
pub type ScoreDetail = HashMap<String, f64>;

/// Immutable verdict produced independently by each classifier.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifierVerdict {
    pub is_phishing: bool,
    pub confidence: f64,
    pub details: ScoreDetail,
}

/// Capability interface over the two scoring strategies. A classifier is
/// configured for one input domain at construction and holds no mutable
/// state, so one instance can serve any number of analyses.
pub trait Scorer: Send + Sync {
    fn score(&self, features: &FeatureMap) -> ClassifierVerdict;
    fn name(&self) -> &str;
}
