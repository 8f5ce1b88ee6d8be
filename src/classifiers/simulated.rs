use crate::classifiers::{ClassifierVerdict, ScoreDetail, Scorer};
use crate::config::SimulatedModelParams;
use crate::features::FeatureMap;
use rand::Rng;

/// Source of the bounded noise injected into each prediction. Kept behind a
/// trait so tests can pin the noise to a fixed value.
pub trait NoiseSource: Send + Sync {
    /// Sample a value in [-amplitude, amplitude].
    fn sample(&self, amplitude: f64) -> f64;
}

/// Default source: uniform noise from the thread-local RNG.
pub struct UniformNoise;

impl NoiseSource for UniformNoise {
    fn sample(&self, amplitude: f64) -> f64 {
        if amplitude == 0.0 {
            return 0.0;
        }
        rand::thread_rng().gen_range(-amplitude..=amplitude)
    }
}

/// Deterministic source returning a constant offset.
pub struct FixedNoise(pub f64);

impl NoiseSource for FixedNoise {
    fn sample(&self, _amplitude: f64) -> f64 {
        self.0
    }
}

/// Stand-in for a trained model: a fixed-weight linear scorer over an
/// ordered feature vector, with a bias term, bounded noise, and a logistic
/// transform. The noise makes confidence values non-reproducible across
/// calls; the decision is robust to it because the sigmoid saturates away
/// from 0.5 for all but borderline scores.
pub struct SimulatedMlModel {
    name: &'static str,
    params: SimulatedModelParams,
    noise: Box<dyn NoiseSource>,
}

impl SimulatedMlModel {
    pub fn new(name: &'static str, params: SimulatedModelParams) -> Self {
        Self::with_noise_source(name, params, Box::new(UniformNoise))
    }

    pub fn with_noise_source(
        name: &'static str,
        params: SimulatedModelParams,
        noise: Box<dyn NoiseSource>,
    ) -> Self {
        Self { name, params, noise }
    }
}

impl Scorer for SimulatedMlModel {
    fn score(&self, features: &FeatureMap) -> ClassifierVerdict {
        // The read order must match the weight vector exactly.
        let feature_vector: Vec<f64> = self
            .params
            .feature_order
            .iter()
            .map(|name| features.get(name))
            .collect();

        let mut raw_score: f64 = feature_vector
            .iter()
            .zip(&self.params.weights)
            .map(|(value, weight)| value * weight)
            .sum();
        raw_score += self.params.bias;
        raw_score += self.noise.sample(self.params.noise_amplitude);

        let probability = sigmoid(raw_score);
        let is_phishing = probability > 0.5;
        let confidence = if is_phishing {
            probability
        } else {
            1.0 - probability
        };

        log::debug!(
            "{}: raw score {:.4}, probability {:.4}",
            self.name,
            raw_score,
            probability
        );

        let mut details = ScoreDetail::new();
        details.insert("ml_score".to_string(), raw_score);
        details.insert("probability".to_string(), probability);

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

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulatedModelConfig;

    fn url_model_with_noise(noise: f64) -> SimulatedMlModel {
        SimulatedMlModel::with_noise_source(
            "simulated_url",
            SimulatedModelConfig::default().url,
            Box::new(FixedNoise(noise)),
        )
    }

    fn email_model_with_noise(noise: f64) -> SimulatedMlModel {
        SimulatedMlModel::with_noise_source(
            "simulated_email",
            SimulatedModelConfig::default().email,
            Box::new(FixedNoise(noise)),
        )
    }

    #[test]
    fn sigmoid_is_centered_and_bounded() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(20.0) > 0.999);
        assert!(sigmoid(-20.0) < 0.001);
    }

    #[test]
    fn confidence_stays_in_unit_interval() {
        let model = url_model_with_noise(0.0);

        let mut features = FeatureMap::new();
        features.set("url_length", 10_000.0);
        let verdict = model.score(&features);
        assert!(verdict.confidence >= 0.0 && verdict.confidence <= 1.0);

        let mut features = FeatureMap::new();
        features.set("domain_age_days", 10_000.0);
        let verdict = model.score(&features);
        assert!(verdict.confidence >= 0.0 && verdict.confidence <= 1.0);
    }

    #[test]
    fn fixed_noise_makes_predictions_deterministic() {
        let model = url_model_with_noise(0.02);
        let mut features = FeatureMap::new();
        features.set("has_ip", 1.0);
        features.set("suspicious_keywords", 2.0);

        let first = model.score(&features);
        let second = model.score(&features);
        assert_eq!(first.is_phishing, second.is_phishing);
        assert_eq!(first.confidence, second.confidence);
    }

    #[test]
    fn empty_features_lean_phishing_from_bias_alone() {
        // bias 0.1 puts the probability just over 0.5
        let model = url_model_with_noise(0.0);
        let verdict = model.score(&FeatureMap::new());
        assert!(verdict.is_phishing);
        assert!(verdict.confidence > 0.5 && verdict.confidence < 0.6);
    }

    #[test]
    fn suspicious_sender_dominates_email_prediction() {
        let model = email_model_with_noise(0.0);
        let mut features = FeatureMap::new();
        features.set("suspicious_sender", 1.0);

        let verdict = model.score(&features);
        assert!(verdict.is_phishing);
        assert_eq!(verdict.confidence, verdict.details["probability"]);
    }

    #[test]
    fn safe_verdict_confidence_is_complement_of_probability() {
        let model = url_model_with_noise(0.0);
        let mut features = FeatureMap::new();
        features.set("is_trusted_domain", 1.0);
        features.set("has_https", 1.0);
        features.set("domain_age_days", 1000.0);

        let verdict = model.score(&features);
        assert!(!verdict.is_phishing);
        let probability = verdict.details["probability"];
        assert!((verdict.confidence - (1.0 - probability)).abs() < 1e-12);
    }

    #[test]
    fn uniform_noise_stays_within_amplitude() {
        let noise = UniformNoise;
        for _ in 0..100 {
            let sample = noise.sample(0.1);
            assert!((-0.1..=0.1).contains(&sample));
        }
        assert_eq!(noise.sample(0.0), 0.0);
    }
}
