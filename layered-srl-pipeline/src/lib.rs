#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Document-level fusion pipeline for layered-srl.
//!
//! Runs one document through its analyzers and hands the result to a
//! semantic role labeler:
//!
//! 1. [`DocumentAnnotator`](layered_srl_document::DocumentAnnotator) - sentences, tags, lemmas, coreference
//! 2. [`FusionDriver`] - per sentence: dependency parse, frame targets, embeddings
//! 3. coreference overlay on the finished corpus
//! 4. [`RoleLabeler`] - every sentence, in order
//!
//! ## Failure handling
//!
//! Service and index-consistency problems fail one sentence, which is left
//! out of the corpus and reported as a [`SentenceFailure`]. Under
//! [`FailurePolicy::Abort`] the first such failure ends the run instead.
//! Missing optional data (no coreference table, embedding misses, no frames)
//! is never a failure.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use layered_srl_document::{AnnotatedDocument, AnnotatedSentence, AnnotatedToken, PreAnnotated};
//! use layered_srl_pipeline::{DependentsLabeler, FusionDriver, Pipeline};
//! use layered_srl_services::{MockDependencyParser, MockFrameParser};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let document = AnnotatedDocument::new(vec![AnnotatedSentence::new(vec![
//!     AnnotatedToken::new("Dogs", "NNS", "dog"),
//!     AnnotatedToken::new("run", "VBP", "run"),
//! ])]);
//!
//! let dependency = MockDependencyParser::new()
//!     .respond_with_arcs("Dogs run", &[(2, "nsubj"), (0, "root")]);
//! let frames = MockFrameParser::empty()
//!     .respond_with_targets("Dogs run", &[("Self_motion", 1)]);
//!
//! let driver = FusionDriver::new(Arc::new(dependency), Arc::new(frames));
//! let mut pipeline = Pipeline::new(
//!     Arc::new(PreAnnotated::new(document)),
//!     driver,
//!     DependentsLabeler::new(),
//! );
//!
//! let run = pipeline.run("Dogs run.").await.unwrap();
//! let predicate = run.corpus.get(0).unwrap().word(2).unwrap().predicate().unwrap();
//! assert_eq!(predicate.sense(), Some("Self_motion"));
//! assert_eq!(predicate.argument(1), Some("nsubj"));
//! # });
//! ```

mod config;
mod driver;
mod error;
mod labeler;
mod logging;
mod pipeline;
mod progress;
mod stage;
mod stats;

pub use config::{EmbeddingsConfig, FailurePolicy, FusionConfig};
pub use driver::{FusionDriver, FusionOutcome};
pub use error::{FailureKind, FusionError, FusionResult, SentenceFailure};
pub use labeler::{label_corpus, DependentsLabeler, LabelError, RoleLabeler, SentenceContext};
pub use logging::init_tracing;
pub use pipeline::{EmbeddingSupply, Pipeline, PipelineRun};
pub use progress::{Phase, ProgressEvent, ProgressReporter};
pub use stage::{CorpusStage, SentenceStage};
pub use stats::{insert_commas, RunStats};

#[cfg(test)]
mod tests {
    mod driver;
    mod pipeline;
}
