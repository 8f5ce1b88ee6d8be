use crate::config::EnhancerConfig;
use crate::features::FeatureMap;

/// Post-extraction boosts for scam phrase combinations the plain keyword
/// counts underweight. Applies to email features only. The three checks are
/// independent and cumulative.
pub struct FeatureEnhancer {
    config: EnhancerConfig,
}

impl FeatureEnhancer {
    pub fn new(config: EnhancerConfig) -> Self {
        Self { config }
    }

    pub fn enhance(&self, mut features: FeatureMap, raw_content: &str) -> FeatureMap {
        let content_lower = raw_content.to_lowercase();

        // Account-lockout pressure: all terms must co-occur.
        if self
            .config
            .account_lockout_terms
            .iter()
            .all(|term| content_lower.contains(term.as_str()))
        {
            features.add("urgent_body", 3.0);
            features.add("suspicious_keywords_count", 2.0);
        }

        // Immigration scam vocabulary: any single term triggers the boost.
        if self
            .config
            .immigration_terms
            .iter()
            .any(|term| content_lower.contains(term.as_str()))
        {
            features.add("suspicious_keywords_count", 2.0);
            features.add("scam_indicators_count", 1.0);
        }

        // Pressure tactics: every matching phrase counts.
        let pressure_count = self
            .config
            .pressure_phrases
            .iter()
            .filter(|phrase| content_lower.contains(phrase.as_str()))
            .count();
        if pressure_count > 0 {
            features.add("urgency_pressure", pressure_count as f64);
        }

        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enhancer() -> FeatureEnhancer {
        FeatureEnhancer::new(EnhancerConfig::default())
    }

    #[test]
    fn account_lockout_needs_all_terms() {
        let enhancer = enhancer();

        let boosted = enhancer.enhance(
            FeatureMap::new(),
            "URGENT: your account has been suspended",
        );
        assert_eq!(boosted.get("urgent_body"), 3.0);
        assert_eq!(boosted.get("suspicious_keywords_count"), 2.0);

        let unboosted = enhancer.enhance(FeatureMap::new(), "your account statement is ready");
        assert_eq!(unboosted.get("urgent_body"), 0.0);
    }

    #[test]
    fn immigration_terms_boost_scam_indicators() {
        let enhancer = enhancer();
        let boosted = enhancer.enhance(FeatureMap::new(), "free eligibility consultation");
        assert_eq!(boosted.get("suspicious_keywords_count"), 2.0);
        assert_eq!(boosted.get("scam_indicators_count"), 1.0);
    }

    #[test]
    fn pressure_phrases_accumulate() {
        let enhancer = enhancer();
        let boosted = enhancer.enhance(
            FeatureMap::new(),
            "Last chance! Don't let this offer expire, act now.",
        );
        // last chance, don't let, expire, act now
        assert_eq!(boosted.get("urgency_pressure"), 4.0);
    }

    #[test]
    fn boosts_are_cumulative_on_existing_values() {
        let enhancer = enhancer();
        let mut features = FeatureMap::new();
        features.set("urgency_pressure", 2.0);
        features.set("suspicious_keywords_count", 1.0);

        let boosted = enhancer.enhance(features, "last chance to book your consultation");
        // immigration term boost on top of the existing count
        assert_eq!(boosted.get("suspicious_keywords_count"), 3.0);
        // one pressure phrase added to the existing two
        assert_eq!(boosted.get("urgency_pressure"), 3.0);
    }
}
