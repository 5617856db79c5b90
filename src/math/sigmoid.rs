//! Logistic calibration and its inverse.
//!
//! Numerical notes:
//! - `1 / (1 + e^{-x})` overflows `e^{-x}` for very negative `x`, so negative
//!   inputs use the algebraically equal `e^{x} / (1 + e^{x})`.
//! - Each branch only exponentiates a non-positive number, so the result is
//!   always finite. It can still round to exactly 0.0 or 1.0 at extreme inputs;
//!   we do not clip.

/// Clip applied to targets before taking the logit during fitting.
pub const LOGIT_EPS: f64 = 1e-7;

/// Map an unbounded linear score into (0, 1).
pub fn calibrate(raw: f64) -> f64 {
    if raw >= 0.0 {
        1.0 / (1.0 + (-raw).exp())
    } else {
        let e = raw.exp();
        e / (1.0 + e)
    }
}

/// Inverse of `calibrate`, with `p` clipped into `[eps, 1 - eps]`.
pub fn logit(p: f64, eps: f64) -> f64 {
    let p = p.clamp(eps, 1.0 - eps);
    (p / (1.0 - p)).ln()
}
