//! Error types for the dehazing pipeline.
//!
//! Structural problems (bad image shape, mismatched artifacts, degenerate
//! airlight selection, out-of-domain parameters) are reported as errors.
//! Numeric boundary conditions such as near-zero airlight or transmission
//! are clamped inside the stages and never surface here.

use thiserror::Error;

/// Result type alias for dehazing operations
pub type Result<T> = std::result::Result<T, DehazeError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the pipeline stages and their collaborators
#[derive(Error, Debug)]
pub enum DehazeError {
    /// Image could not be decoded or does not satisfy the RGB float contract
    #[error("Invalid input image: {reason}")]
    InvalidInput {
        reason: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// A 2-D artifact does not match the spatial shape of the image
    #[error("Shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Atmospheric light selection has no pixels to average
    #[error("Degenerate estimate: {reason}")]
    DegenerateEstimate { reason: String },

    /// Parameter outside of its valid domain
    #[error("Invalid parameter: {parameter} = {value} ({reason})")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
        reason: &'static str,
    },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    /// Output image could not be encoded or written
    #[error("Failed to export image: {message}")]
    Export {
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl DehazeError {
    /// Create an invalid input error without an underlying cause
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
            source: None,
        }
    }

    /// Create an invalid input error wrapping a decoder failure
    pub fn invalid_input_from<E>(reason: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::InvalidInput {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_parameter(
        parameter: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            parameter,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an export error with context
    pub fn export<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Export {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether the error was caused by the caller's data rather than the
    /// environment (file system, encoder).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DehazeError::InvalidInput { .. }
                | DehazeError::ShapeMismatch { .. }
                | DehazeError::DegenerateEstimate { .. }
                | DehazeError::InvalidParameter { .. }
        )
    }
}
