//! Read/write model artifact JSON files.
//!
//! The artifact is the only contract between the offline fitter and the online
//! pipeline:
//! - the feature ordering the parameters were fit against
//! - scaler parameters (mean / std per feature)
//! - model parameters (weights + bias)
//! - optional fit metrics, informational only
//!
//! Reading an artifact only checks that it parses. Structural validation
//! (version, ordering, lengths, finiteness, zero std) happens when it is turned
//! into a `ModelBundle`.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::FitMetrics;
use crate::error::{AppError, EXIT_INPUT, ScoreError};

/// Artifact schema version understood by this build.
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Name written into the `tool` field.
pub const ARTIFACT_TOOL: &str = "bizscore";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerSection {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSection {
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// A saved model file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub tool: String,
    pub created_at: DateTime<Utc>,
    /// Feature names in the order the parameters are aligned to.
    pub features: Vec<String>,
    pub scaler: ScalerSection,
    pub model: ModelSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<FitMetrics>,
}

/// Read a model artifact JSON file.
///
/// Any failure is a `Configuration` error: a process that cannot read its
/// model must not start serving.
pub fn read_artifact(path: &Path) -> Result<ModelArtifact, ScoreError> {
    let file = File::open(path).map_err(|e| {
        ScoreError::configuration(format!("failed to open model artifact '{}': {e}", path.display()))
    })?;
    let artifact: ModelArtifact = serde_json::from_reader(file).map_err(|e| {
        ScoreError::configuration(format!("malformed model artifact '{}': {e}", path.display()))
    })?;
    Ok(artifact)
}

/// Write a model artifact JSON file.
pub fn write_artifact(path: &Path, artifact: &ModelArtifact) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(EXIT_INPUT, format!("Failed to create model artifact '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, artifact)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write model artifact: {e}")))?;

    Ok(())
}
