//! Error types for Vitals.
//!
//! Data insufficiency is a normal outcome for a young archive, so it is an
//! explicit error value ([`Error::InsufficientData`]) rather than a panic or
//! a NaN leaking into scores. Every variant carries:
//! - a stable numeric code for machine parsing
//! - a category for grouping
//! - a recoverability hint and a remediation line for humans
//!
//! # Agent-Facing Output
//!
//! Errors serialize to structured JSON:
//! ```json
//! {
//!   "code": 30,
//!   "category": "analysis",
//!   "error": "Insufficient data for regression",
//!   "recoverable": true,
//!   "context": { "required": 10, "available": 4 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for Vitals operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Tunables file errors.
    Config,
    /// Rejected caller input (logs, profile, CLI values).
    Input,
    /// Statistical analyses that could not run.
    Analysis,
    /// Snapshot archive errors.
    Storage,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Analysis => write!(f, "analysis"),
            ErrorCategory::Storage => write!(f, "storage"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for Vitals.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    // Input errors (20-29)
    #[error("invalid value for {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("invalid date: {0}")]
    InvalidDate(String),

    // Analysis errors (30-39)
    #[error("Insufficient data for {analysis}")]
    InsufficientData {
        analysis: String,
        required: usize,
        available: usize,
    },

    // Storage errors (40-49)
    #[error("snapshot archive error: {0}")]
    Storage(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidInput`].
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::InsufficientData`].
    pub fn insufficient(analysis: impl Into<String>, required: usize, available: usize) -> Self {
        Error::InsufficientData {
            analysis: analysis.into(),
            required,
            available,
        }
    }

    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: Analysis errors
    /// - 40-49: Storage errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidInput { .. } => 20,
            Error::InvalidDate(_) => 21,
            Error::InsufficientData { .. } => 30,
            Error::Storage(_) => 40,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) => ErrorCategory::Config,
            Error::InvalidInput { .. } | Error::InvalidDate(_) => ErrorCategory::Input,
            Error::InsufficientData { .. } => ErrorCategory::Analysis,
            Error::Storage(_) => ErrorCategory::Storage,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether the same call can succeed later without code changes.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) => true,
            Error::InvalidInput { .. } | Error::InvalidDate(_) => false,
            // More logged days fix it.
            Error::InsufficientData { .. } => true,
            Error::Storage(_) => true,
            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidInput { .. } => "Invalid Input",
            Error::InvalidDate(_) => "Invalid Date",
            Error::InsufficientData { .. } => "Insufficient Data",
            Error::Storage(_) => "Archive Error",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Run 'vitals config validate' to check the tunables file, or remove it to use defaults."
            }
            Error::InvalidInput { .. } => {
                "Fix the offending field in the daily log or profile and submit it again."
            }
            Error::InvalidDate(_) => "Dates must be ISO formatted, e.g. 2026-03-14.",
            Error::InsufficientData { .. } => {
                "Keep logging: this analysis becomes available once enough days are archived."
            }
            Error::Storage(_) => "Check the archive file path and permissions, then retry.",
            Error::Io(_) => "Check disk space and permissions, then retry the operation.",
            Error::Json(_) => "Invalid JSON in input. Check syntax with 'jq .' or restore from backup.",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub error: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InvalidInput { field, .. } => {
                context.insert("field".to_string(), serde_json::json!(field));
            }
            Error::InsufficientData {
                required,
                available,
                ..
            } => {
                context.insert("required".to_string(), serde_json::json!(required));
                context.insert("available".to_string(), serde_json::json!(available));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            error: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Format an error for human consumption (headline, reason, fix).
pub fn format_error_human(err: &Error) -> String {
    format!(
        "✗ {}\n  Reason: {}\n  Fix: {}",
        err.headline(),
        err,
        err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message() {
        let err = Error::insufficient("regression", 10, 4);
        assert_eq!(err.to_string(), "Insufficient data for regression");
        assert_eq!(err.code(), 30);
        assert_eq!(err.category(), ErrorCategory::Analysis);
        assert!(err.is_recoverable());
    }

    #[test]
    fn structured_error_carries_counts() {
        let err = Error::insufficient("forecast", 7, 2);
        let structured = StructuredError::from(&err);
        assert_eq!(structured.error, "Insufficient data for forecast");
        assert_eq!(structured.context["required"], serde_json::json!(7));
        assert_eq!(structured.context["available"], serde_json::json!(2));

        let json: serde_json::Value = serde_json::from_str(&structured.to_json()).unwrap();
        assert_eq!(json["category"], "analysis");
    }

    #[test]
    fn invalid_input_is_not_recoverable() {
        let err = Error::invalid("sleep.qualityScore", "must be within 0..=10");
        assert!(!err.is_recoverable());
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.to_string().contains("sleep.qualityScore"));
    }

    #[test]
    fn human_format_has_three_parts() {
        let text = format_error_human(&Error::Config("bad weights".into()));
        assert!(text.starts_with("✗ Configuration Error"));
        assert!(text.contains("Reason:"));
        assert!(text.contains("Fix:"));
    }

    #[test]
    fn error_codes_are_unique() {
        let errors = [
            Error::Config(String::new()),
            Error::invalid("", ""),
            Error::InvalidDate(String::new()),
            Error::insufficient("", 0, 0),
            Error::Storage(String::new()),
            Error::Io(std::io::Error::other("x")),
        ];
        let mut codes: Vec<u32> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
