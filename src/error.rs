//! Error types for relayout.

use std::io;
use thiserror::Error;

/// Result type alias for relayout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reconstructing a document layout.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading page streams or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A page stream could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A page cannot be laid out (strict mode only).
    #[error("Page {page} is unusable: {reason}")]
    InvalidPage {
        /// Page number (1-indexed)
        page: u32,
        /// What was wrong with it
        reason: String,
    },

    /// Layout options failed validation.
    #[error("Invalid layout options: {0}")]
    InvalidOptions(String),

    /// Reading or laying out a single document failed.
    #[error("Extraction failed for {document}: {reason}")]
    ExtractionFailed {
        /// Source document identifier
        document: String,
        /// Underlying cause
        reason: String,
    },

    /// Extraction was stopped by the caller before the last page.
    #[error("Extraction of {document} was cancelled")]
    Cancelled {
        /// Source document identifier
        document: String,
    },

    /// Error during rendering (Markdown, HTML, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an error as an `ExtractionFailed` scoped to `document`.
    ///
    /// Cancellation and already-scoped failures pass through unchanged.
    pub fn scoped_to(self, document: &str) -> Self {
        match self {
            Error::ExtractionFailed { .. } | Error::Cancelled { .. } => self,
            other => Error::ExtractionFailed {
                document: document.to_string(),
                reason: other.to_string(),
            },
        }
    }
}
