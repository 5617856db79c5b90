//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the ordered feature registry (`FEATURES`, `FeatureKind`)
//! - raw and typed inputs (`RawValue`, `FeatureVector`)
//! - assessment outputs (`CreditAssessment`, `RiskCategory`, `RiskLevel`)

pub mod features;
pub mod types;

pub use features::*;
pub use types::*;
