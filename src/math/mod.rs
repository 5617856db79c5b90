//! Mathematical utilities: logistic calibration, least squares, summary statistics.

pub mod ols;
pub mod sigmoid;
pub mod stats;

pub use ols::*;
pub use sigmoid::*;
pub use stats::*;
