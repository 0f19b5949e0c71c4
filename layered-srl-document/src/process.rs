//! Non-fatal problem collection for document-level passes.

use thiserror::Error;

/// A problem that affected part of a document without stopping the pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessError {
    /// A sentence could not be fused and was left out of the corpus.
    #[error("sentence {sentence} failed during {stage}: {reason}")]
    SentenceFailed {
        sentence: usize,
        stage: String,
        reason: String,
    },
    /// A coreference mention points at a sentence or token that is not in the corpus.
    #[error("chain {chain}: mention at sentence {sentence_number}, head {head_index} dropped: {reason}")]
    DanglingMention {
        chain: u32,
        sentence_number: usize,
        head_index: usize,
        reason: String,
    },
}

/// A value plus the non-fatal problems met while producing it.
#[derive(Debug)]
pub struct ProcessResult<T> {
    pub value: T,
    pub errors: Vec<ProcessError>,
}

impl<T> ProcessResult<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            errors: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ProcessError) {
        self.errors.push(error);
    }
}
