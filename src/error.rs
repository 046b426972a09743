//! Error types for PII detection and mask burn-in.
//!
//! Errors are categorized by their source so callers can decide what to
//! surface: document load failures abort an operation, while per-page
//! extraction problems are logged and skipped by the detection service.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for detection and redaction operations.
pub type RedactorResult<T> = Result<T, RedactorError>;

/// Error type for all detection, burn-in and storage operations.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// Error occurred while reading or writing files
    #[error("IO error for path '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Error occurred during PDF processing
    #[error("PDF processing error{}: {message}", page.map(|p| format!(" on page {p}")).unwrap_or_default())]
    PdfProcessing {
        message: String,
        page: Option<usize>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Text extraction failed
    #[error("Text extraction failed for '{}': {reason}", path.display())]
    TextExtraction { path: PathBuf, reason: String },

    /// Invalid configuration or parameters
    #[error("Invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },

    /// Backend-specific error (MuPDF, lopdf, etc.)
    #[error("{backend} backend error: {message}")]
    BackendError {
        backend: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Mask or project records could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A long-running detection was cancelled by its caller
    #[error("Operation cancelled")]
    Cancelled,
}

impl RedactorError {
    /// Wraps a backend failure that happened while handling a specific page.
    pub(crate) fn page(
        message: impl Into<String>,
        page: usize,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::PdfProcessing {
            message: message.into(),
            page: Some(page),
            source: Some(Box::new(source)),
        }
    }
}

impl From<io::Error> for RedactorError {
    fn from(err: io::Error) -> Self {
        Self::BackendError {
            backend: "std::io".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
