//! Error handling for fitpick.
//!
//! This module provides:
//! - [`FitError`]: The main error enum for all fitpick operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Rich error type with suggestions and context
//! - Suggestion helpers for context-aware error recovery hints

mod codes;
mod suggestions;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;
pub use suggestions::suggest_for_error;

/// Main error type for fitpick operations.
#[derive(Error, Debug)]
pub enum FitError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Import failed for {path}: {reason}")]
    Import { path: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FitError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) | Self::Serialization(_) => ErrorCode::SerializationError,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::Import { .. } => ErrorCode::ImportFailed,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Timeout(_) => ErrorCode::SearchTimeout,
            Self::WorkerPool(_) => ErrorCode::WorkerPoolFailed,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::InvalidInput(reason) => Some(serde_json::json!({ "reason": reason })),
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            Self::Import { path, reason } => {
                Some(serde_json::json!({ "path": path, "reason": reason }))
            }
            Self::NotFound(what) => Some(serde_json::json!({ "path": what })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_fit_error(self)
    }

    pub(crate) fn import(path: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        Self::Import {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// A structured error with machine-readable code, suggestion, and context.
///
/// This type is designed for machine output where callers need to parse
/// errors and take appropriate action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "INVALID_INPUT")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 101)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// Error category (e.g., "input", "config", "search")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            numeric_code: code.numeric(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
            code,
            message: message.into(),
        }
    }

    /// Create a structured error from a [`FitError`].
    #[must_use]
    pub fn from_fit_error(err: &FitError) -> Self {
        let code = err.code();
        let context = err.context();
        let suggestion = suggest_for_error(code, context.as_ref());

        Self {
            code,
            numeric_code: code.numeric(),
            message: err.to_string(),
            suggestion,
            context,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
        }
    }

    /// Add context to this error.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self.suggestion = suggest_for_error(self.code, self.context.as_ref());
        self
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<FitError> for StructuredError {
    fn from(err: FitError) -> Self {
        Self::from_fit_error(&err)
    }
}

impl From<&FitError> for StructuredError {
    fn from(err: &FitError) -> Self {
        Self::from_fit_error(err)
    }
}

/// Result type alias using [`FitError`].
pub type Result<T> = std::result::Result<T, FitError>;
