//! Score-to-rating classification.
//!
//! The credit score is a linear remap of the performance score onto the
//! familiar 300–850 scale. The category comes from a fixed threshold ladder,
//! evaluated top-down with inclusive lower bounds.

use crate::domain::{CreditAssessment, RiskCategory};

pub const CREDIT_SCORE_MIN: i64 = 300;
pub const CREDIT_SCORE_MAX: i64 = 850;

/// Lower bounds, highest first. Anything below the last bound is `VeryPoor`.
pub const RATING_LADDER: [(f64, RiskCategory); 4] = [
    (0.75, RiskCategory::Excellent),
    (0.60, RiskCategory::Good),
    (0.45, RiskCategory::Fair),
    (0.30, RiskCategory::Poor),
];

/// `round(300 + score * 550)`, clamped to [300, 850].
pub fn credit_score(score: f64) -> i64 {
    let span = (CREDIT_SCORE_MAX - CREDIT_SCORE_MIN) as f64;
    let raw = (CREDIT_SCORE_MIN as f64 + score * span).round();
    if raw.is_nan() {
        return CREDIT_SCORE_MIN;
    }
    raw.clamp(CREDIT_SCORE_MIN as f64, CREDIT_SCORE_MAX as f64) as i64
}

pub fn risk_category(score: f64) -> RiskCategory {
    RATING_LADDER
        .iter()
        .find(|(bound, _)| score >= *bound)
        .map(|(_, category)| *category)
        .unwrap_or(RiskCategory::VeryPoor)
}

/// Derive the full assessment from a calibrated score.
pub fn classify(score: f64) -> CreditAssessment {
    let category = risk_category(score);
    CreditAssessment {
        performance_score: score,
        credit_score: credit_score(score),
        risk_category: category,
        risk_level: category.risk_level(),
        recommendation: category.recommendation().to_string(),
    }
}
