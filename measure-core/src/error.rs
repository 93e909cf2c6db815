//! Conversion errors
//!
//! Errors are raised at the point of detection and never retried or coerced.
//! Front-ends that need a serializable value use [`ErrorReport`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Category;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const INVALID_UNIT: &str = "INVALID_UNIT";
    pub const CONVERSION_ERROR: &str = "CONVERSION_ERROR";
}

/// Error type for conversions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// Source or target symbol is not recognized where it was looked up
    #[error("{0}")]
    InvalidUnit(String),

    /// Failure while computing a result from recognized units
    #[error("{0}")]
    Conversion(String),
}

impl ConvertError {
    pub fn invalid_unit(message: impl Into<String>) -> Self {
        ConvertError::InvalidUnit(message.into())
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        ConvertError::Conversion(message.into())
    }

    /// No category resolves for `unit`
    pub fn unsupported_unit(unit: &str) -> Self {
        Self::invalid_unit(format!("Unsupported unit: {}", unit))
    }

    /// Both units resolve, but to different categories
    pub fn incompatible(from: &str, from_category: Category, to: &str, to_category: Category) -> Self {
        Self::invalid_unit(format!(
            "Cannot convert {} ({}) to {} ({})",
            from, from_category, to, to_category
        ))
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ConvertError::InvalidUnit(_) => codes::INVALID_UNIT,
            ConvertError::Conversion(_) => codes::CONVERSION_ERROR,
        }
    }

    pub fn is_invalid_unit(&self) -> bool {
        matches!(self, ConvertError::InvalidUnit(_))
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from(self)
    }
}

/// Serializable view of a [`ConvertError`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorReport {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.code,
            "message": self.message,
            "suggestion": self.suggestion,
        })
    }
}

impl From<&ConvertError> for ErrorReport {
    fn from(err: &ConvertError) -> Self {
        let report = ErrorReport::new(err.code(), err.to_string());
        match err {
            ConvertError::InvalidUnit(_) => {
                report.with_suggestion("Check the unit symbol or list supported units")
            }
            ConvertError::Conversion(_) => report,
        }
    }
}
