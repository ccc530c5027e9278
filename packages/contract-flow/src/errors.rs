//! Error types for contract-flow
//!
//! Diagnostics are NOT errors: they travel inside `Validated<T>` values.
//! This module only covers failures that abort an operation.

use thiserror::Error;

use crate::config::ConfigError;
use crate::features::cancellation::Cancelled;

/// Main error type for contract-flow operations
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The analysis invocation was cancelled; partial results were discarded
    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input tree violates a structural precondition (e.g. duplicate declaration ids)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AnalysisError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AnalysisError::InvalidInput(msg.into())
    }

    /// True when this error is the cancellation signal.
    ///
    /// Callers that catch `AnalysisError` must re-raise cancellation
    /// unchanged instead of converting it into a diagnostic.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, AnalysisError::Cancelled(_))
    }
}

/// Result type alias for contract-flow operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
