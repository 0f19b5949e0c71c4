//! Progress reporting for long documents.
//!
//! Every event goes to an optional channel so a caller can render its own
//! progress; checkpoints are also logged.

use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::stage::{CorpusStage, SentenceStage};

/// Which pass over the document an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Fusion,
    Labeling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A sentence reached the corpus.
    SentenceFused { index: usize },
    /// A sentence was left out.
    SentenceFailed { index: usize, stage: SentenceStage },
    /// Another `progress_interval` sentences were processed.
    Checkpoint {
        phase: Phase,
        processed: usize,
        total: usize,
    },
    /// The corpus moved to `stage`.
    CorpusStageChanged { stage: CorpusStage },
    /// Coreference chains were placed on the corpus.
    CorefOverlaid { chains: u32, mentions: usize },
    /// A sentence was role labeled.
    SentenceLabeled { index: usize },
}

/// Emits [`ProgressEvent`]s and logs a checkpoint every `interval` sentences.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    sender: Option<UnboundedSender<ProgressEvent>>,
    interval: usize,
}

impl ProgressReporter {
    pub fn new(interval: usize) -> Self {
        Self {
            sender: None,
            interval: interval.max(1),
        }
    }

    pub fn with_sender(mut self, sender: UnboundedSender<ProgressEvent>) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn sender(&self) -> Option<UnboundedSender<ProgressEvent>> {
        self.sender.clone()
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Send an event. A closed receiver is not an error.
    pub fn emit(&self, event: ProgressEvent) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(event);
        }
    }

    /// Note that `processed` sentences of `total` are done.
    pub fn processed(&self, phase: Phase, processed: usize, total: usize) {
        if processed > 0 && processed % self.interval == 0 {
            info!(?phase, processed, total, "Processing sentence {}", processed);
            self.emit(ProgressEvent::Checkpoint {
                phase,
                processed,
                total,
            });
        }
    }
}
