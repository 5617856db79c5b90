//! Model fitting.
//!
//! Responsibilities:
//!
//! - partition labelled rows into train / validation / test (seeded)
//! - fit the scaler and the linear scorer on the training rows
//! - evaluate each split on the calibrated scale

pub mod fitter;
pub mod split;

pub use fitter::*;
pub use split::*;
