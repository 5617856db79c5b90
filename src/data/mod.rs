//! Data sources.
//!
//! - `synth`: seeded synthetic business datasets for fitting and demos

pub mod synth;

pub use synth::*;
