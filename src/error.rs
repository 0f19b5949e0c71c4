//! Error types for the sentence and corpus model.

use thiserror::Error;

/// Violations of the sentence/corpus invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Parallel columns passed to a constructor disagree in length.
    #[error("column length mismatch: expected {expected} entries for {column}, found {found}")]
    LengthMismatch {
        column: &'static str,
        expected: usize,
        found: usize,
    },

    /// A head index points outside `0..=token_count`.
    #[error("head {head} of token {position} is out of range (sentence has {token_count} tokens)")]
    HeadOutOfRange {
        position: usize,
        head: usize,
        token_count: usize,
    },

    /// A token is attached to itself.
    #[error("token {position} is its own head")]
    SelfLoop { position: usize },

    /// The synthetic root cannot be annotated.
    #[error("position 0 is the synthetic root and cannot be {action}")]
    RootPosition { action: &'static str },

    /// A position beyond the last token.
    #[error("position {position} does not exist (sentence has {token_count} tokens)")]
    NoSuchPosition { position: usize, token_count: usize },

    /// A sentence index beyond the end of the corpus.
    #[error("sentence {index} does not exist (corpus has {sentence_count} sentences)")]
    NoSuchSentence { index: usize, sentence_count: usize },
}

/// Result type for sentence and corpus operations.
pub type Result<T> = std::result::Result<T, Error>;
