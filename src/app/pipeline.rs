//! Shared scoring pipeline used by every front-end (single score, batch, fit evaluation).
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! raw input -> coercion -> standardization -> linear score -> calibration -> rating
//!
//! The CLI commands can then focus on presentation (printing vs exporting).

use std::sync::Arc;

use rayon::prelude::*;

use crate::domain::{CoercionMode, CreditAssessment, FEATURES, FeatureVector, RawValue};
use crate::error::ScoreError;
use crate::io::coerce::coerce;
use crate::math::calibrate;
use crate::models::{ModelBundle, classify};

/// Scores inputs against one immutable bundle snapshot.
#[derive(Debug, Clone)]
pub struct ScoringPipeline {
    bundle: Arc<ModelBundle>,
    mode: CoercionMode,
}

impl ScoringPipeline {
    pub fn new(bundle: Arc<ModelBundle>, mode: CoercionMode) -> Self {
        Self { bundle, mode }
    }

    pub fn bundle(&self) -> &ModelBundle {
        &self.bundle
    }

    pub fn mode(&self) -> CoercionMode {
        self.mode
    }

    /// Calibrated performance score for a typed feature vector.
    ///
    /// Finite inputs can still overflow once standardized or weighted; those
    /// are rejected rather than calibrated from NaN or infinity.
    pub fn performance_score(&self, features: &FeatureVector) -> Result<f64, ScoreError> {
        let scaled = self.bundle.scaler().standardize(features);
        if let Some(pos) = scaled.iter().position(|v| !v.is_finite()) {
            return Err(ScoreError::validation(format!(
                "`{}` (position {}): value overflows after standardization",
                FEATURES[pos].name,
                pos + 1
            )));
        }

        let raw = self.bundle.model().score(&scaled);
        if !raw.is_finite() {
            return Err(ScoreError::validation("linear score is not finite"));
        }
        Ok(calibrate(raw))
    }

    pub fn assess_features(&self, features: &FeatureVector) -> Result<CreditAssessment, ScoreError> {
        Ok(classify(self.performance_score(features)?))
    }

    /// Full pipeline over ten raw input cells.
    pub fn assess(&self, raw: &[RawValue]) -> Result<CreditAssessment, ScoreError> {
        let features = coerce(raw, self.mode)?;
        self.assess_features(&features)
    }

    /// Score many inputs in parallel. Results are returned in input order and a
    /// bad row only fails its own slot.
    pub fn assess_batch(&self, rows: &[Vec<RawValue>]) -> Vec<Result<CreditAssessment, ScoreError>> {
        rows.par_iter().map(|row| self.assess(row)).collect()
    }
}
