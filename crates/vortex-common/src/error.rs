//! Error types for vortex center estimation.

use thiserror::Error;

/// Result type alias using VortexError.
pub type VortexResult<T> = Result<T, VortexError>;

/// Primary error type for center-finding operations.
///
/// Only structural problems with the inputs are reported here. Numerical
/// degeneracies (no data, no convergence, empty annuli) never raise; they
/// surface as NaN outputs and a search status instead.
#[derive(Debug, Error)]
pub enum VortexError {
    // === Input Errors ===
    #[error("Shape mismatch for {what}: expected {expected:?}, found {found:?}")]
    InputShapeMismatch {
        what: String,
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Invalid coordinate grid: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl VortexError {
    /// Create an InputShapeMismatch error.
    pub fn shape_mismatch(
        what: impl Into<String>,
        expected: (usize, usize),
        found: (usize, usize),
    ) -> Self {
        Self::InputShapeMismatch {
            what: what.into(),
            expected,
            found,
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Whether the error was caused by the caller's input arrays.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            VortexError::InputShapeMismatch { .. } | VortexError::InvalidCoordinates(_)
        )
    }
}

impl From<std::io::Error> for VortexError {
    fn from(err: std::io::Error) -> Self {
        VortexError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for VortexError {
    fn from(err: serde_json::Error) -> Self {
        VortexError::Json(err.to_string())
    }
}
