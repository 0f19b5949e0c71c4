//! Error types for fusion runs.

use std::fmt;

use layered_srl_document::{DocumentError, ProcessError};
use layered_srl_services::{EmbeddingError, ResponseError, ServiceError};
use thiserror::Error;

use crate::stage::SentenceStage;

/// What class of problem failed a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A service could not be reached or answered with something unreadable
    Service,
    /// A response disagrees with the sentence's token indexing
    IndexConsistency,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Service => f.write_str("service"),
            FailureKind::IndexConsistency => f.write_str("index consistency"),
        }
    }
}

/// One sentence that did not make it into the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceFailure {
    /// Sentence index in the annotated document (0-based)
    pub index: usize,
    /// Stage the sentence was in when its next transition failed
    pub stage: SentenceStage,
    pub kind: FailureKind,
    pub message: String,
}

impl SentenceFailure {
    pub fn new(
        index: usize,
        stage: SentenceStage,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            index,
            stage,
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn from_service(index: usize, stage: SentenceStage, error: &ServiceError) -> Self {
        let kind = if error.is_index_consistency() {
            FailureKind::IndexConsistency
        } else {
            FailureKind::Service
        };
        Self::new(index, stage, kind, error.to_string())
    }

    pub(crate) fn from_response(index: usize, stage: SentenceStage, error: &ResponseError) -> Self {
        let kind = if error.is_index_consistency() {
            FailureKind::IndexConsistency
        } else {
            FailureKind::Service
        };
        Self::new(index, stage, kind, error.to_string())
    }

    pub(crate) fn from_model(index: usize, stage: SentenceStage, error: &layered_srl::Error) -> Self {
        Self::new(index, stage, FailureKind::IndexConsistency, error.to_string())
    }
}

impl fmt::Display for SentenceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sentence {} failed during {} ({}): {}",
            self.index,
            self.stage.step(),
            self.kind,
            self.message
        )
    }
}

impl From<&SentenceFailure> for ProcessError {
    fn from(failure: &SentenceFailure) -> Self {
        ProcessError::SentenceFailed {
            sentence: failure.index,
            stage: failure.stage.step().to_string(),
            reason: failure.message.clone(),
        }
    }
}

/// Errors that stop a fusion run.
#[derive(Debug, Error)]
pub enum FusionError {
    /// The document annotator failed; nothing can be fused.
    #[error("document annotation failed: {0}")]
    Annotation(#[from] DocumentError),

    /// A sentence failed and the failure policy is `abort`.
    #[error("sentence {index} failed during {}: {reason}", .stage.step())]
    SentenceFailed {
        index: usize,
        stage: SentenceStage,
        reason: String,
    },

    /// The role labeler rejected a sentence.
    #[error("role labeling failed on sentence {index}: {reason}")]
    Labeling { index: usize, reason: String },

    /// Configuration could not be read or is incomplete.
    #[error("configuration error: {0}")]
    Config(String),

    /// The embedding file could not be loaded.
    #[error("embedding load failed: {0}")]
    Embeddings(#[from] EmbeddingError),
}

impl From<SentenceFailure> for FusionError {
    fn from(failure: SentenceFailure) -> Self {
        FusionError::SentenceFailed {
            index: failure.index,
            stage: failure.stage,
            reason: failure.message,
        }
    }
}

/// Result type for fusion operations.
pub type FusionResult<T> = Result<T, FusionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let failure = SentenceFailure::from_response(
            2,
            SentenceStage::RawTokens,
            &ResponseError::RecordCount {
                expected: 3,
                found: 2,
            },
        );
        assert_eq!(failure.kind, FailureKind::IndexConsistency);
        assert_eq!(
            failure.to_string(),
            "sentence 2 failed during dependency parsing (index consistency): response has 2 records for 3 tokens"
        );
    }

    #[test]
    fn test_abort_error_keeps_stage() {
        let failure = SentenceFailure::new(
            0,
            SentenceStage::DependencyParsed,
            FailureKind::Service,
            "refused",
        );
        let error = FusionError::from(failure);
        assert_eq!(
            error.to_string(),
            "sentence 0 failed during frame annotation: refused"
        );
    }

    #[test]
    fn test_into_process_error() {
        let failure = SentenceFailure::new(4, SentenceStage::RawTokens, FailureKind::Service, "down");
        assert_eq!(
            ProcessError::from(&failure),
            ProcessError::SentenceFailed {
                sentence: 4,
                stage: "dependency parsing".into(),
                reason: "down".into(),
            }
        );
    }
}
