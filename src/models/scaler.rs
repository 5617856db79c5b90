//! Per-feature standardization.

use crate::domain::{FEATURE_COUNT, FEATURES, FeatureVector};
use crate::error::ScoreError;
use crate::math::{mean, population_std};

/// Precomputed mean / standard deviation for each feature, in `FEATURES` order.
///
/// Construction validates every entry, so `standardize` never divides by zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalerParameters {
    mean: [f64; FEATURE_COUNT],
    std: [f64; FEATURE_COUNT],
}

impl ScalerParameters {
    /// Validate and build scaler parameters.
    ///
    /// Fails with `Configuration` if any mean is non-finite or any standard
    /// deviation is zero or non-finite.
    pub fn new(mean: [f64; FEATURE_COUNT], std: [f64; FEATURE_COUNT]) -> Result<Self, ScoreError> {
        for (i, desc) in FEATURES.iter().enumerate() {
            if !mean[i].is_finite() {
                return Err(ScoreError::configuration(format!(
                    "scaler mean for `{}` is not finite ({})",
                    desc.name, mean[i]
                )));
            }
            if !std[i].is_finite() || std[i] == 0.0 {
                return Err(ScoreError::configuration(format!(
                    "scaler standard deviation for `{}` must be finite and non-zero (got {})",
                    desc.name, std[i]
                )));
            }
        }
        Ok(Self { mean, std })
    }

    /// Fit population mean / standard deviation over training rows.
    pub fn fit(rows: &[[f64; FEATURE_COUNT]]) -> Result<Self, ScoreError> {
        if rows.is_empty() {
            return Err(ScoreError::configuration("cannot fit scaler on zero rows"));
        }

        let mut means = [0.0; FEATURE_COUNT];
        let mut stds = [0.0; FEATURE_COUNT];
        let mut column = Vec::with_capacity(rows.len());
        for i in 0..FEATURE_COUNT {
            column.clear();
            column.extend(rows.iter().map(|r| r[i]));
            means[i] = mean(&column).unwrap_or(0.0);
            stds[i] = population_std(&column).unwrap_or(0.0);
            // Rounding noise on a constant column is still zero variance.
            if stds[i] <= f64::EPSILON * means[i].abs().max(1.0) {
                stds[i] = 0.0;
            }
        }

        Self::new(means, stds).map_err(|e| match e {
            ScoreError::Configuration(msg) => {
                ScoreError::configuration(format!("{msg}; the training data has no variance in this feature"))
            }
            other => other,
        })
    }

    pub fn mean(&self) -> &[f64; FEATURE_COUNT] {
        &self.mean
    }

    pub fn std(&self) -> &[f64; FEATURE_COUNT] {
        &self.std
    }

    /// `(x - mean) / std` per feature.
    pub fn transform(&self, x: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            out[i] = (x[i] - self.mean[i]) / self.std[i];
        }
        out
    }

    pub fn standardize(&self, v: &FeatureVector) -> [f64; FEATURE_COUNT] {
        self.transform(&v.to_array())
    }

    /// `scaled * std + mean` per feature.
    pub fn destandardize(&self, scaled: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            out[i] = scaled[i] * self.std[i] + self.mean[i];
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardization_round_trip() {
        let scaler = ScalerParameters::new([10.0; FEATURE_COUNT], [2.0; FEATURE_COUNT]).unwrap();
        let x = [14.0; FEATURE_COUNT];
        let z = scaler.transform(&x);
        assert!(z.iter().all(|v| (*v - 2.0).abs() < 1e-12));

        let back = scaler.destandardize(&z);
        assert!(back.iter().all(|v| (*v - 14.0).abs() < 1e-12));
    }

    #[test]
    fn zero_std_is_a_configuration_error() {
        let mut std = [1.0; FEATURE_COUNT];
        std[4] = 0.0;
        let err = ScalerParameters::new([0.0; FEATURE_COUNT], std).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("operating_profit_margins"));
    }

    #[test]
    fn non_finite_parameters_are_rejected() {
        let mut mean = [0.0; FEATURE_COUNT];
        mean[0] = f64::NAN;
        assert!(ScalerParameters::new(mean, [1.0; FEATURE_COUNT]).is_err());

        let mut std = [1.0; FEATURE_COUNT];
        std[9] = f64::INFINITY;
        assert!(ScalerParameters::new([0.0; FEATURE_COUNT], std).is_err());
    }

    #[test]
    fn fit_uses_population_statistics() {
        let mut rows = Vec::new();
        for v in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            rows.push([v; FEATURE_COUNT]);
        }
        let scaler = ScalerParameters::fit(&rows).unwrap();
        assert!((scaler.mean()[0] - 5.0).abs() < 1e-12);
        assert!((scaler.std()[7] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn fit_rejects_constant_columns() {
        let mut rows = vec![[1.0; FEATURE_COUNT], [2.0; FEATURE_COUNT]];
        rows[0][5] = 0.0;
        rows[1][5] = 0.0;
        let err = ScalerParameters::fit(&rows).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("use_of_overdraft"));
    }
}
