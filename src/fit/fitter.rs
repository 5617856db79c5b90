//! Offline fitting of the scaler + linear scorer.
//!
//! Given labelled records with scores in [0, 1], we:
//! - split rows into train / validation / test (seeded)
//! - fit standardization parameters on the training rows only
//! - regress `logit(score)` on the standardized features (OLS with intercept)
//! - report MAE / RMSE / R² per split on the calibrated scale
//!
//! The result is a validated `ModelBundle`; persisting it is the caller's job.

use nalgebra::{DMatrix, DVector};

use crate::domain::{BusinessRecord, FEATURE_COUNT, FEATURES, FitMetrics, SplitMetrics};
use crate::error::{AppError, EXIT_DATA, EXIT_NUMERIC};
use crate::fit::split::split_indices;
use crate::io::artifact::ModelArtifact;
use crate::math::{LOGIT_EPS, calibrate, logit, mae, r_squared, rmse, solve_least_squares};
use crate::models::{ModelBundle, ModelParameters, ScalerParameters};

/// Fewest labelled rows a fit will accept.
pub const MIN_FIT_ROWS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    pub seed: u64,
    pub test_fraction: f64,
    /// Fraction of the post-test remainder held out for validation.
    pub validation_fraction: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            test_fraction: 0.15,
            validation_fraction: 0.176,
        }
    }
}

/// One fitted weight, for importance listings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientRank {
    pub feature: &'static str,
    pub weight: f64,
}

#[derive(Debug, Clone)]
pub struct FitOutcome {
    pub bundle: ModelBundle,
    pub metrics: FitMetrics,
    /// Weights ordered by descending magnitude.
    pub ranking: Vec<CoefficientRank>,
}

impl FitOutcome {
    pub fn to_artifact(&self) -> ModelArtifact {
        self.bundle.to_artifact(Some(self.metrics))
    }
}

pub fn fit_model(records: &[BusinessRecord], opts: &FitOptions) -> Result<FitOutcome, AppError> {
    if records.len() < MIN_FIT_ROWS {
        return Err(AppError::new(
            EXIT_DATA,
            format!("Need at least {MIN_FIT_ROWS} labelled rows to fit, got {}.", records.len()),
        ));
    }

    let split = split_indices(records.len(), opts.test_fraction, opts.validation_fraction, opts.seed);
    let train = select(records, &split.train);
    let validation = select(records, &split.validation);
    let test = select(records, &split.test);

    // Design rows need at least as many observations as unknowns.
    if train.len() <= FEATURE_COUNT {
        return Err(AppError::new(
            EXIT_DATA,
            format!("Training split has {} rows; need more than {FEATURE_COUNT}.", train.len()),
        ));
    }

    let train_rows: Vec<[f64; FEATURE_COUNT]> = train.iter().map(|r| r.features.to_array()).collect();
    let scaler = ScalerParameters::fit(&train_rows)?;

    let (x, y) = design_system(&scaler, &train_rows, &train);
    let beta = solve_least_squares(&x, &y)
        .ok_or_else(|| AppError::new(EXIT_NUMERIC, "Least squares solve failed (ill-conditioned system)."))?;

    let mut weights = [0.0; FEATURE_COUNT];
    for (w, b) in weights.iter_mut().zip(beta.iter().skip(1)) {
        *w = *b;
    }
    let model = ModelParameters::new(weights, beta[0])
        .map_err(|e| AppError::new(EXIT_NUMERIC, format!("Fitted parameters are unusable: {e}")))?;
    let bundle = ModelBundle::new(scaler, model).with_label("fit");

    let metrics = FitMetrics {
        train: evaluate(&bundle, &train)?,
        validation: evaluate(&bundle, &validation)?,
        test: evaluate(&bundle, &test)?,
    };

    let mut ranking: Vec<CoefficientRank> = FEATURES
        .iter()
        .zip(weights)
        .map(|(f, weight)| CoefficientRank { feature: f.name, weight })
        .collect();
    ranking.sort_by(|a, b| b.weight.abs().total_cmp(&a.weight.abs()));

    tracing::info!(
        rows = records.len(),
        train = train.len(),
        validation = validation.len(),
        test = test.len(),
        test_r2 = metrics.test.r2,
        "model fitted"
    );

    Ok(FitOutcome {
        bundle,
        metrics,
        ranking,
    })
}

fn select<'a>(records: &'a [BusinessRecord], idx: &[usize]) -> Vec<&'a BusinessRecord> {
    idx.iter().map(|&i| &records[i]).collect()
}

/// Intercept column first, then the standardized features; target on the logit scale.
fn design_system(
    scaler: &ScalerParameters,
    rows: &[[f64; FEATURE_COUNT]],
    records: &[&BusinessRecord],
) -> (DMatrix<f64>, DVector<f64>) {
    let n = rows.len();
    let mut x = DMatrix::<f64>::zeros(n, FEATURE_COUNT + 1);
    let mut y = DVector::<f64>::zeros(n);

    for (i, (row, record)) in rows.iter().zip(records).enumerate() {
        x[(i, 0)] = 1.0;
        for (j, v) in scaler.transform(row).iter().enumerate() {
            x[(i, j + 1)] = *v;
        }
        y[i] = logit(record.performance_score, LOGIT_EPS);
    }

    (x, y)
}

fn evaluate(bundle: &ModelBundle, records: &[&BusinessRecord]) -> Result<SplitMetrics, AppError> {
    let actual: Vec<f64> = records.iter().map(|r| r.performance_score).collect();
    let predicted: Vec<f64> = records
        .iter()
        .map(|r| calibrate(bundle.raw_score(&r.features)))
        .collect();

    let metric = |v: Option<f64>| v.ok_or_else(|| AppError::new(EXIT_DATA, "Cannot evaluate an empty split."));
    Ok(SplitMetrics {
        n: records.len(),
        mae: metric(mae(&actual, &predicted))?,
        rmse: metric(rmse(&actual, &predicted))?,
        r2: metric(r_squared(&actual, &predicted))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_dataset;
    use crate::domain::FeatureVector;

    const TRUE_WEIGHTS: [f64; FEATURE_COUNT] = [0.4, -0.2, 0.3, -0.5, 0.6, -0.1, -0.25, 0.35, -0.45, -0.3];
    const TRUE_BIAS: f64 = 0.2;

    /// Records whose score is exactly `calibrate(bias + w · x)` on raw features.
    fn noiseless(n: usize) -> Vec<BusinessRecord> {
        generate_dataset(n, 11)
            .unwrap()
            .into_iter()
            .map(|mut r| {
                let mut f = r.features;
                // Rescale so the raw linear predictor stays in a well-conditioned range.
                f.average_monthly_balance /= 100_000.0;
                let x = f.to_array();
                let z = TRUE_BIAS
                    + x.iter()
                        .zip(TRUE_WEIGHTS.iter())
                        .enumerate()
                        .map(|(j, (v, w))| if j == 1 || j == 2 || j == 6 { v / 100.0 * w } else { v * w })
                        .sum::<f64>();
                r.performance_score = calibrate(z);
                r.features = f;
                r
            })
            .collect()
    }

    #[test]
    fn recovers_known_linear_weights() {
        let records = noiseless(400);
        let outcome = fit_model(&records, &FitOptions::default()).unwrap();

        // Undo standardization: raw weight = scaled weight / std.
        let scaler = outcome.bundle.scaler();
        let model = outcome.bundle.model();
        for j in 0..FEATURE_COUNT {
            let expected = if j == 1 || j == 2 || j == 6 {
                TRUE_WEIGHTS[j] / 100.0
            } else {
                TRUE_WEIGHTS[j]
            };
            let recovered = model.weights()[j] / scaler.std()[j];
            assert!(
                (recovered - expected).abs() < 1e-6,
                "feature {j}: expected {expected}, got {recovered}"
            );
        }

        assert!(outcome.metrics.test.rmse < 1e-8);
        assert!(outcome.metrics.test.r2 > 0.999_999);
    }

    #[test]
    fn fit_on_synthetic_dataset_is_sane() {
        let records = generate_dataset(300, 42).unwrap();
        let outcome = fit_model(&records, &FitOptions::default()).unwrap();

        let m = &outcome.metrics;
        assert_eq!(m.train.n + m.validation.n + m.test.n, 300);
        assert!(m.train.r2 > 0.3, "train r2 {}", m.train.r2);
        assert!(m.test.mae < 0.12, "test mae {}", m.test.mae);

        assert_eq!(outcome.ranking.len(), FEATURE_COUNT);
        for pair in outcome.ranking.windows(2) {
            assert!(pair[0].weight.abs() >= pair[1].weight.abs());
        }

        let artifact = outcome.to_artifact();
        assert_eq!(artifact.metrics, Some(outcome.metrics));
        let back = ModelBundle::from_artifact(&artifact).unwrap();
        assert_eq!(back.model(), outcome.bundle.model());
    }

    #[test]
    fn too_few_rows_is_an_error() {
        let records = generate_dataset(MIN_FIT_ROWS - 1, 1).unwrap();
        let err = fit_model(&records, &FitOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_DATA);
    }

    #[test]
    fn constant_feature_is_an_error() {
        let records: Vec<BusinessRecord> = generate_dataset(60, 3)
            .unwrap()
            .into_iter()
            .map(|mut r| {
                r.features = FeatureVector {
                    use_of_overdraft: false,
                    ..r.features
                };
                r
            })
            .collect();
        let err = fit_model(&records, &FitOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_DATA);
        assert!(err.message().contains("use_of_overdraft"));
    }
}
