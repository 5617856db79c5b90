//! Resolved runtime configuration.
//!
//! `.env` is loaded once at startup; clap then reads `BIZSCORE_MODEL` and
//! `BIZSCORE_STRICT_BOOLEANS` as fallbacks for the matching flags.

use std::path::{Path, PathBuf};

use crate::cli::ModelArgs;
use crate::domain::CoercionMode;
use crate::error::{AppError, EXIT_DATA};
use crate::models::{SharedModel, load_bundle};

pub const DEFAULT_MODEL_PATH: &str = "model.json";

/// Env var consulted before `RUST_LOG` for the log filter.
pub const LOG_ENV: &str = "BIZSCORE_LOG";

/// Load `.env` from the working directory, if present.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// What the scoring commands need: which artifact, and how to coerce input.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub model_path: PathBuf,
    pub coercion_mode: CoercionMode,
}

impl ScoringConfig {
    pub fn new(model_path: impl Into<PathBuf>, strict_booleans: bool) -> Self {
        Self {
            model_path: model_path.into(),
            coercion_mode: coercion_mode(strict_booleans),
        }
    }

    /// Load and validate the configured artifact.
    pub fn load_model(&self) -> Result<SharedModel, AppError> {
        let bundle = load_bundle(&self.model_path).map_err(|e| model_error(&self.model_path, e))?;
        tracing::info!(path = %self.model_path.display(), label = bundle.label(), "model loaded");
        Ok(SharedModel::new(bundle))
    }
}

impl From<&ModelArgs> for ScoringConfig {
    fn from(args: &ModelArgs) -> Self {
        Self::new(&args.model, args.strict_booleans)
    }
}

pub fn coercion_mode(strict_booleans: bool) -> CoercionMode {
    if strict_booleans {
        CoercionMode::Strict
    } else {
        CoercionMode::Permissive
    }
}

pub(crate) fn model_error(path: &Path, err: impl std::fmt::Display) -> AppError {
    AppError::new(EXIT_DATA, format!("Failed to load model '{}': {err}", path.display()))
}
