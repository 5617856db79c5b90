//! Immutable parameter bundle and the shared handle used to swap it.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;

use crate::domain::{FEATURE_COUNT, FEATURES, FeatureVector, FitMetrics, feature_names};
use crate::error::ScoreError;
use crate::io::artifact::{
    ARTIFACT_FORMAT_VERSION, ARTIFACT_TOOL, ModelArtifact, ModelSection, ScalerSection, read_artifact,
};
use crate::models::linear::ModelParameters;
use crate::models::scaler::ScalerParameters;

/// Validated scaler + model parameters, fixed for the lifetime of the value.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBundle {
    scaler: ScalerParameters,
    model: ModelParameters,
    /// Human-readable origin, e.g. the artifact timestamp.
    label: String,
}

impl ModelBundle {
    pub fn new(scaler: ScalerParameters, model: ModelParameters) -> Self {
        Self {
            scaler,
            model,
            label: "in-memory".to_string(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Validate an artifact and build a bundle from it.
    ///
    /// Rejects: unknown format version, feature names that differ from
    /// `FEATURES` in content or order, wrong section lengths, non-finite
    /// numbers, and zero standard deviations.
    pub fn from_artifact(artifact: &ModelArtifact) -> Result<Self, ScoreError> {
        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ScoreError::configuration(format!(
                "unsupported artifact format version {} (expected {ARTIFACT_FORMAT_VERSION})",
                artifact.format_version
            )));
        }

        if artifact.features.len() != FEATURE_COUNT {
            return Err(ScoreError::configuration(format!(
                "artifact lists {} features, expected {FEATURE_COUNT}",
                artifact.features.len()
            )));
        }
        for (pos, (got, want)) in artifact.features.iter().zip(FEATURES.iter()).enumerate() {
            if got != want.name {
                return Err(ScoreError::configuration(format!(
                    "feature ordering mismatch at position {}: artifact has `{got}`, expected `{}`",
                    pos + 1,
                    want.name
                )));
            }
        }

        let mean = fixed("scaler.mean", &artifact.scaler.mean)?;
        let std = fixed("scaler.std", &artifact.scaler.std)?;
        let weights = fixed("model.weights", &artifact.model.weights)?;

        let scaler = ScalerParameters::new(mean, std)?;
        let model = ModelParameters::new(weights, artifact.model.bias)?;

        Ok(Self::new(scaler, model).with_label(artifact.created_at.to_rfc3339()))
    }

    /// Serialize this bundle as a fresh artifact.
    pub fn to_artifact(&self, metrics: Option<FitMetrics>) -> ModelArtifact {
        ModelArtifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            tool: ARTIFACT_TOOL.to_string(),
            created_at: Utc::now(),
            features: feature_names(),
            scaler: ScalerSection {
                mean: self.scaler.mean().to_vec(),
                std: self.scaler.std().to_vec(),
            },
            model: ModelSection {
                weights: self.model.weights().to_vec(),
                bias: self.model.bias(),
            },
            metrics,
        }
    }

    pub fn scaler(&self) -> &ScalerParameters {
        &self.scaler
    }

    pub fn model(&self) -> &ModelParameters {
        &self.model
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Standardize and score one feature vector (pre-calibration).
    pub fn raw_score(&self, v: &FeatureVector) -> f64 {
        self.model.score(&self.scaler.standardize(v))
    }
}

/// Read and validate an artifact in one step.
pub fn load_bundle(path: &Path) -> Result<ModelBundle, ScoreError> {
    let artifact = read_artifact(path)?;
    ModelBundle::from_artifact(&artifact)
}

fn fixed(section: &str, values: &[f64]) -> Result<[f64; FEATURE_COUNT], ScoreError> {
    <[f64; FEATURE_COUNT]>::try_from(values).map_err(|_| {
        ScoreError::configuration(format!(
            "`{section}` has {} entries, expected {FEATURE_COUNT}",
            values.len()
        ))
    })
}

/// Cloneable handle to the bundle currently in service.
///
/// Readers take an `Arc` snapshot and score against it without holding the
/// lock; a reload replaces the whole `Arc`, so a request never sees a mix of
/// old and new parameters.
#[derive(Debug, Clone)]
pub struct SharedModel {
    inner: Arc<RwLock<Arc<ModelBundle>>>,
}

impl SharedModel {
    pub fn new(bundle: ModelBundle) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(bundle))),
        }
    }

    /// The bundle currently in service.
    pub fn snapshot(&self) -> Arc<ModelBundle> {
        // The slot only ever holds a complete Arc, so a poisoned lock still
        // guards a consistent value.
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Put `next` in service and return the bundle it replaced.
    pub fn swap(&self, next: ModelBundle) -> Arc<ModelBundle> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(next))
    }

    /// Load, validate and swap in a new artifact.
    ///
    /// On any error the current bundle stays in service.
    pub fn reload_from(&self, path: &Path) -> Result<(), ScoreError> {
        match load_bundle(path) {
            Ok(next) => {
                let label = next.label().to_string();
                let previous = self.swap(next);
                tracing::info!(
                    path = %path.display(),
                    previous = previous.label(),
                    current = %label,
                    "model bundle reloaded"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "model reload rejected; keeping current bundle");
                Err(e)
            }
        }
    }
}
