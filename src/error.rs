//! Error handling for the comparison harness
//!
//! Structural errors (unknown models, misaligned signals, empty model lists)
//! abort a run. Numeric degeneracies inside transforms are never errors; they
//! are resolved by the power floor in [`crate::analysis`].

use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, CompareError>;

/// Main error type for the comparison harness
#[derive(Error, Debug)]
pub enum CompareError {
    // Registry / Runner Errors
    #[error("Model not found: {model}")]
    ModelNotFound { model: String },

    #[error("Model '{model}' failed: {reason}")]
    ModelFailed { model: String, reason: String },

    #[error("No models to compare")]
    EmptyModelList,

    // Shape Errors
    #[error("Shape mismatch in {context}: expected {expected} samples, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    #[error("Length mismatch: {names} model names but {outputs} outputs")]
    LengthMismatch { names: usize, outputs: usize },

    #[error("Signal contains no samples")]
    EmptySignal,

    // Parameter Errors
    #[error("Invalid sample rate: {sample_rate}")]
    InvalidSampleRate { sample_rate: f64 },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    // Output Errors
    #[error("Failed to render panel: {0}")]
    Render(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for CompareError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        CompareError::Render(format!("{value:?}"))
    }
}

impl CompareError {
    /// Shorthand for a shape mismatch at a named boundary
    pub fn shape(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        CompareError::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Shorthand for an invalid parameter
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CompareError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            CompareError::ModelNotFound { .. } => "MODEL_NOT_FOUND",
            CompareError::ModelFailed { .. } => "MODEL_FAILED",
            CompareError::EmptyModelList => "EMPTY_MODEL_LIST",
            CompareError::ShapeMismatch { .. } => "SHAPE_MISMATCH",
            CompareError::LengthMismatch { .. } => "LENGTH_MISMATCH",
            CompareError::EmptySignal => "EMPTY_SIGNAL",
            CompareError::InvalidSampleRate { .. } => "INVALID_SAMPLE_RATE",
            CompareError::InvalidParameter { .. } => "INVALID_PARAMETER",
            CompareError::Render(_) => "RENDER_ERROR",
            CompareError::Wav(_) => "WAV_ERROR",
            CompareError::Io(_) => "IO_ERROR",
            CompareError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Structural errors invalidate the whole comparison
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            CompareError::ModelNotFound { .. }
                | CompareError::EmptyModelList
                | CompareError::ShapeMismatch { .. }
                | CompareError::LengthMismatch { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            CompareError::ModelNotFound { .. } => vec![
                "Check the model name for typos",
                "Run 'circuit-compare models' to list registered models",
            ],
            CompareError::EmptyModelList => vec!["Add at least one model name to the run"],
            CompareError::ShapeMismatch { .. } => vec![
                "Build the stimulus and control from the same time base",
                "Check that the model returns one sample per input sample",
            ],
            CompareError::LengthMismatch { .. } => {
                vec!["Pass exactly one model name per output signal"]
            }
            CompareError::InvalidSampleRate { .. } => {
                vec!["Use a finite sample rate greater than zero"]
            }
            CompareError::Render(_) => vec![
                "Check the output directory is writable",
                "Try the JSON sink to inspect the panel data",
            ],
            _ => vec![],
        }
    }
}
