//! Linear scoring over standardized features.

use crate::domain::{FEATURE_COUNT, FEATURES};
use crate::error::ScoreError;

/// Weight vector (index-aligned with `FEATURES`) plus bias.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    weights: [f64; FEATURE_COUNT],
    bias: f64,
}

impl ModelParameters {
    pub fn new(weights: [f64; FEATURE_COUNT], bias: f64) -> Result<Self, ScoreError> {
        if let Some(i) = weights.iter().position(|w| !w.is_finite()) {
            return Err(ScoreError::configuration(format!(
                "weight for `{}` is not finite ({})",
                FEATURES[i].name, weights[i]
            )));
        }
        if !bias.is_finite() {
            return Err(ScoreError::configuration(format!("bias is not finite ({bias})")));
        }
        Ok(Self { weights, bias })
    }

    pub fn weights(&self) -> &[f64; FEATURE_COUNT] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// `Σ weights[i] * scaled[i] + bias`, summed left to right.
    pub fn score(&self, scaled: &[f64; FEATURE_COUNT]) -> f64 {
        self.weights
            .iter()
            .zip(scaled)
            .fold(0.0, |acc, (w, z)| acc + w * z)
            + self.bias
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_weighted_sum_plus_bias() {
        let mut weights = [0.0; FEATURE_COUNT];
        weights[0] = 1.0;
        weights[3] = -2.0;
        weights[9] = 0.5;
        let model = ModelParameters::new(weights, 0.25).unwrap();

        let mut z = [0.0; FEATURE_COUNT];
        z[0] = 5.0;
        z[3] = 1.5;
        z[9] = 2.0;
        z[4] = 100.0;
        assert!((model.score(&z) - (5.0 - 3.0 + 1.0 + 0.25)).abs() < 1e-12);
    }

    #[test]
    fn score_is_deterministic() {
        let weights = [0.1, -0.2, 0.3, -0.4, 0.5, -0.6, 0.7, -0.8, 0.9, -1.0];
        let model = ModelParameters::new(weights, -0.05).unwrap();
        let z = [1.1, 2.2, 3.3, 4.4, 5.5, 6.6, 7.7, 8.8, 9.9, 10.1];
        let first = model.score(&z);
        for _ in 0..100 {
            assert_eq!(model.score(&z).to_bits(), first.to_bits());
        }
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        let mut weights = [0.0; FEATURE_COUNT];
        weights[2] = f64::NAN;
        let err = ModelParameters::new(weights, 0.0).unwrap_err();
        assert!(err.to_string().contains("number_of_gst_paid_transactions"));
        assert!(ModelParameters::new([0.0; FEATURE_COUNT], f64::INFINITY).is_err());
    }
}
