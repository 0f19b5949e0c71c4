//! Error types for external service calls and their responses.

use std::io;

use thiserror::Error;

/// A service response that arrived but cannot be fused into the sentence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    #[error("record {record} has {found} columns, expected at least {expected}")]
    TooFewColumns {
        record: usize,
        found: usize,
        expected: usize,
    },

    #[error("record {record} has a non-integer head {value:?}")]
    NonIntegerHead { record: usize, value: String },

    #[error("response has {found} records for {expected} tokens")]
    RecordCount { expected: usize, found: usize },

    #[error("record {record} points at head {head}, sentence has {token_count} tokens")]
    HeadOutOfRange {
        record: usize,
        head: usize,
        token_count: usize,
    },

    #[error("frame {frame} starts at token {start}, sentence has {token_count} tokens")]
    TargetOutOfRange {
        frame: String,
        start: usize,
        token_count: usize,
    },
}

impl ResponseError {
    /// Whether the response disagrees with the sentence's token indexing,
    /// as opposed to being unreadable.
    pub fn is_index_consistency(&self) -> bool {
        matches!(
            self,
            ResponseError::RecordCount { .. }
                | ResponseError::HeadOutOfRange { .. }
                | ResponseError::TargetOutOfRange { .. }
        )
    }
}

/// Errors raised while talking to an external analyzer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("{address} did not answer within {timeout_ms} ms")]
    Timeout { address: String, timeout_ms: u64 },

    #[error("i/o error talking to {address}: {source}")]
    Io {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("protocol error from {address}: {reason}")]
    Protocol { address: String, reason: String },

    #[error("malformed response: {0}")]
    Malformed(#[from] ResponseError),
}

impl ServiceError {
    /// Transport failures are retried; anything the service actually said is not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServiceError::Connect { .. } | ServiceError::Timeout { .. } | ServiceError::Io { .. }
        )
    }

    pub fn is_index_consistency(&self) -> bool {
        match self {
            ServiceError::Malformed(e) => e.is_index_consistency(),
            _ => false,
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors raised while reading an embedding file.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to read embeddings {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("line {line}: vector has {found} dimensions, expected {expected}")]
    DimensionMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let timeout = ServiceError::Timeout {
            address: "localhost:5000".into(),
            timeout_ms: 10,
        };
        assert!(timeout.is_retryable());

        let malformed = ServiceError::from(ResponseError::NonIntegerHead {
            record: 1,
            value: "x".into(),
        });
        assert!(!malformed.is_retryable());
        assert!(!malformed.is_index_consistency());

        let count = ServiceError::from(ResponseError::RecordCount {
            expected: 3,
            found: 2,
        });
        assert!(count.is_index_consistency());
    }

    #[test]
    fn test_display() {
        let err = ResponseError::TooFewColumns {
            record: 2,
            found: 3,
            expected: 8,
        };
        assert_eq!(err.to_string(), "record 2 has 3 columns, expected at least 8");
    }
}
