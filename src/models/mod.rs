//! Model stages and parameter holders.
//!
//! Every stage is a small, pure function over immutable parameters so the
//! pipeline can compose them without shared mutable state:
//! - `scaler`: per-feature standardization
//! - `linear`: weighted sum plus bias
//! - `rating`: calibrated score to credit score and risk category
//! - `bundle`: the validated parameter set and its swap handle

pub mod bundle;
pub mod linear;
pub mod rating;
pub mod scaler;

pub use bundle::*;
pub use linear::*;
pub use rating::*;
pub use scaler::*;
