//! Sentence and corpus lifecycle states.

use std::fmt;

/// Where a sentence is on its way into the corpus.
///
/// ```text
/// RawTokens -> DependencyParsed -> FrameAnnotated -> Embedded -> Accumulated
/// ```
///
/// Each transition either succeeds or fails the sentence; there is no
/// going back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SentenceStage {
    /// Annotator tokens only
    RawTokens,
    /// Heads and relations set
    DependencyParsed,
    /// Frame targets marked as predicates
    FrameAnnotated,
    /// Embeddings attached
    Embedded,
    /// Appended to the corpus
    Accumulated,
}

impl SentenceStage {
    /// The stage reached by the next transition, if any.
    pub fn next(self) -> Option<SentenceStage> {
        match self {
            SentenceStage::RawTokens => Some(SentenceStage::DependencyParsed),
            SentenceStage::DependencyParsed => Some(SentenceStage::FrameAnnotated),
            SentenceStage::FrameAnnotated => Some(SentenceStage::Embedded),
            SentenceStage::Embedded => Some(SentenceStage::Accumulated),
            SentenceStage::Accumulated => None,
        }
    }

    /// Move to the next stage and return it. `Accumulated` stays put.
    pub fn advance(&mut self) -> SentenceStage {
        if let Some(next) = self.next() {
            *self = next;
        }
        *self
    }

    /// Name of the work that moves a sentence out of this stage.
    pub fn step(self) -> &'static str {
        match self {
            SentenceStage::RawTokens => "dependency parsing",
            SentenceStage::DependencyParsed => "frame annotation",
            SentenceStage::FrameAnnotated => "embedding attachment",
            SentenceStage::Embedded => "accumulation",
            SentenceStage::Accumulated => "nothing",
        }
    }
}

impl fmt::Display for SentenceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SentenceStage::RawTokens => "RAW_TOKENS",
            SentenceStage::DependencyParsed => "DEPENDENCY_PARSED",
            SentenceStage::FrameAnnotated => "FRAME_ANNOTATED",
            SentenceStage::Embedded => "EMBEDDED",
            SentenceStage::Accumulated => "ACCUMULATED",
        };
        f.write_str(name)
    }
}

/// Where the corpus as a whole is. Role labeling only starts at
/// `CorefOverlaid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CorpusStage {
    /// Sentences are still being fused and appended
    Accumulating,
    /// Every sentence was appended or failed
    Accumulated,
    /// Mentions recorded
    CorefOverlaid,
}

impl CorpusStage {
    pub fn next(self) -> Option<CorpusStage> {
        match self {
            CorpusStage::Accumulating => Some(CorpusStage::Accumulated),
            CorpusStage::Accumulated => Some(CorpusStage::CorefOverlaid),
            CorpusStage::CorefOverlaid => None,
        }
    }

    /// Move to the next stage and return it. `CorefOverlaid` stays put.
    pub fn advance(&mut self) -> CorpusStage {
        if let Some(next) = self.next() {
            *self = next;
        }
        *self
    }
}

impl fmt::Display for CorpusStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CorpusStage::Accumulating => "ACCUMULATING",
            CorpusStage::Accumulated => "ACCUMULATED",
            CorpusStage::CorefOverlaid => "COREF_OVERLAID",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_are_linear() {
        let mut stage = SentenceStage::RawTokens;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            assert!(next > stage);
            seen.push(next);
            stage = next;
        }
        assert_eq!(seen.len(), 5);
        assert_eq!(stage, SentenceStage::Accumulated);
    }

    #[test]
    fn test_advance_stops_at_terminal_stage() {
        let mut stage = SentenceStage::Embedded;
        assert_eq!(stage.advance(), SentenceStage::Accumulated);
        assert_eq!(stage.advance(), SentenceStage::Accumulated);

        let mut corpus = CorpusStage::Accumulating;
        assert_eq!(corpus.advance(), CorpusStage::Accumulated);
        assert_eq!(corpus.advance(), CorpusStage::CorefOverlaid);
        assert_eq!(corpus.advance(), CorpusStage::CorefOverlaid);
        assert_eq!(corpus.to_string(), "COREF_OVERLAID");
    }

    #[test]
    fn test_display() {
        assert_eq!(SentenceStage::DependencyParsed.to_string(), "DEPENDENCY_PARSED");
        assert_eq!(SentenceStage::RawTokens.step(), "dependency parsing");
    }
}
