//! Error types.
//!
//! Two layers:
//!
//! - `ScoreError` is the library-level error raised by the scoring core
//!   (coercion, parameter validation, artifact loading).
//! - `AppError` is the process-level error carried to `main`, pairing a message
//!   with the exit code the binary should terminate with.

/// Errors raised by the scoring core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    /// Malformed, missing or wrong-arity input. Rejects one request only.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Corrupt or incomplete model parameters. Fatal at startup.
    #[error("Invalid model configuration: {0}")]
    Configuration(String),
}

impl ScoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Exit code for bad user input and I/O failures.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for an unusable model artifact or an empty dataset.
pub const EXIT_DATA: u8 = 3;
/// Exit code for numeric failures while fitting.
pub const EXIT_NUMERIC: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ScoreError> for AppError {
    fn from(err: ScoreError) -> Self {
        let exit_code = match err {
            ScoreError::Validation(_) => EXIT_INPUT,
            ScoreError::Configuration(_) => EXIT_DATA,
        };
        Self::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
