//! The role-labeling seam.
//!
//! A [`RoleLabeler`] receives each finished sentence, in corpus order, only
//! after coreference has been overlaid on the whole corpus, and writes its
//! arguments into the sentence's predicates.

use std::time::{Duration, Instant};

use layered_srl::{Corpus, Sentence};
use thiserror::Error;

use crate::error::{FusionError, FusionResult};
use crate::progress::{Phase, ProgressEvent, ProgressReporter};

/// A labeler's refusal to label one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct LabelError(pub String);

/// What a labeler may know about a sentence besides its words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceContext<'a> {
    /// Label of the corpus the sentence belongs to
    pub corpus_label: &'a str,
    /// Index of the sentence in the corpus
    pub index: usize,
    /// Coreference mentions in this sentence as (token, chain id)
    pub mentions: Vec<(usize, u32)>,
}

/// Consumer of fused sentences.
pub trait RoleLabeler {
    fn parse_sentence(
        &mut self,
        sentence: &mut Sentence,
        context: &SentenceContext<'_>,
    ) -> Result<(), LabelError>;

    /// Time spent in [`parse_sentence`](Self::parse_sentence) so far.
    fn parsing_time(&self) -> Duration;

    /// Human-readable summary of the labeler's work.
    fn status(&self) -> String;
}

/// Baseline labeler: every syntactic dependent of a predicate becomes one of
/// its arguments, with the dependency relation as role.
#[derive(Debug, Default)]
pub struct DependentsLabeler {
    sentences: usize,
    predicates: usize,
    arguments: usize,
    elapsed: Duration,
}

impl DependentsLabeler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoleLabeler for DependentsLabeler {
    fn parse_sentence(
        &mut self,
        sentence: &mut Sentence,
        _context: &SentenceContext<'_>,
    ) -> Result<(), LabelError> {
        let start = Instant::now();

        for position in sentence.predicate_positions() {
            let arcs: Vec<(usize, String)> = sentence
                .dependents_of(position)
                .into_iter()
                .filter_map(|dep| {
                    sentence
                        .deprel_of(dep)
                        .map(|deprel| (dep, deprel.to_string()))
                })
                .collect();

            let predicate = sentence
                .word_mut(position)
                .and_then(|word| word.predicate_mut())
                .ok_or_else(|| LabelError(format!("no predicate at position {}", position)))?;
            predicate.clear_arguments();
            for (dependent, role) in arcs {
                predicate.set_argument(dependent, role);
                self.arguments += 1;
            }
            self.predicates += 1;
        }

        self.sentences += 1;
        self.elapsed += start.elapsed();
        Ok(())
    }

    fn parsing_time(&self) -> Duration {
        self.elapsed
    }

    fn status(&self) -> String {
        format!(
            "Labeled {} sentences, {} predicates, {} arguments",
            self.sentences, self.predicates, self.arguments
        )
    }
}

/// Run `labeler` over every sentence of `corpus`, in order.
///
/// Returns the number of sentences labeled. The first refusal stops the pass.
pub fn label_corpus<L: RoleLabeler + ?Sized>(
    corpus: &mut Corpus,
    labeler: &mut L,
    progress: &ProgressReporter,
) -> FusionResult<usize> {
    let total = corpus.len();
    let label = corpus.label().to_string();

    for index in 0..total {
        let context = SentenceContext {
            corpus_label: &label,
            index,
            mentions: corpus.mentions_in(index),
        };
        let sentence = corpus.get_mut(index).ok_or_else(|| FusionError::Labeling {
            index,
            reason: "sentence vanished from the corpus".into(),
        })?;

        labeler
            .parse_sentence(sentence, &context)
            .map_err(|e| FusionError::Labeling {
                index,
                reason: e.to_string(),
            })?;

        progress.emit(ProgressEvent::SentenceLabeled { index });
        progress.processed(Phase::Labeling, index + 1, total);
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dogs_run_fast() -> Sentence {
        let mut sentence = Sentence::from_columns(
            &["Dogs", "run", "fast"],
            &["dog", "run", "fast"],
            &["NNS", "VBP", "RB"],
            &["_", "_", "_"],
        )
        .unwrap();
        sentence
            .set_heads_and_deprels(
                vec![2, 0, 2],
                vec!["nsubj".into(), "root".into(), "advmod".into()],
            )
            .unwrap();
        sentence.set_sense(2, "Self_motion").unwrap();
        sentence
    }

    #[test]
    fn test_dependents_become_arguments() {
        let mut corpus = Corpus::new("tmp");
        corpus.push(dogs_run_fast());
        let mut labeler = DependentsLabeler::new();

        let labeled = label_corpus(&mut corpus, &mut labeler, &ProgressReporter::new(100)).unwrap();
        assert_eq!(labeled, 1);

        let predicate = corpus.get(0).unwrap().word(2).unwrap().predicate().unwrap();
        assert_eq!(predicate.argument(1), Some("nsubj"));
        assert_eq!(predicate.argument(3), Some("advmod"));
        assert_eq!(
            labeler.status(),
            "Labeled 1 sentences, 1 predicates, 2 arguments"
        );
    }

    struct Refuser;

    impl RoleLabeler for Refuser {
        fn parse_sentence(
            &mut self,
            _sentence: &mut Sentence,
            context: &SentenceContext<'_>,
        ) -> Result<(), LabelError> {
            if context.index == 1 {
                Err(LabelError("model crashed".into()))
            } else {
                Ok(())
            }
        }

        fn parsing_time(&self) -> Duration {
            Duration::ZERO
        }

        fn status(&self) -> String {
            String::new()
        }
    }

    #[test]
    fn test_refusal_stops_labeling() {
        let mut corpus = Corpus::new("tmp");
        corpus.push(dogs_run_fast());
        corpus.push(dogs_run_fast());

        let err = label_corpus(&mut corpus, &mut Refuser, &ProgressReporter::new(100)).unwrap_err();
        assert!(matches!(err, FusionError::Labeling { index: 1, .. }));
    }
}
