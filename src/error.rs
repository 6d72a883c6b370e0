//! Custom error types for the cleaning engine.
//!
//! This module provides the error hierarchy using `thiserror`. Errors are
//! serializable as `{code, message}` pairs so a presentation layer can
//! render them without knowing the Rust types.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for inspection and cleaning operations.
#[derive(Error, Debug)]
pub enum ScrubError {
    /// Input file has an extension the loader does not support.
    #[error("Unsupported file format '{0}': expected CSV (.csv) or Excel (.xls, .xlsx)")]
    UnsupportedFormat(String),

    /// Input file could not be read or parsed into a table.
    #[error("Error loading file: {0}")]
    LoadFailed(String),

    /// Invalid cleaning plan or strategy token.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// CSV export failed.
    #[error("Failed to export table: {0}")]
    ExportFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ScrubError>,
    },
}

impl ScrubError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ScrubError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::LoadFailed(_) => "LOAD_FAILED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::ExportFailed(_) => "EXPORT_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a load-stage failure (no table was produced).
    pub fn is_load_error(&self) -> bool {
        match self {
            Self::UnsupportedFormat(_) | Self::LoadFailed(_) => true,
            Self::WithContext { source, .. } => source.is_load_error(),
            _ => false,
        }
    }
}

/// Serialize errors as a struct with `code` and `message` fields.
impl Serialize for ScrubError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ScrubError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, ScrubError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ScrubError::Polars(e).with_context(context))
    }
}
