//! Error types for loading and producing document annotations.

use thiserror::Error;

/// Errors raised while obtaining a document annotation.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Reading the annotation failed.
    #[error("failed to read annotation {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The annotation is not in the expected JSON shape.
    #[error("malformed annotation JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The annotator itself reported a failure.
    #[error("annotator failed: {0}")]
    Annotator(String),
}

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;
