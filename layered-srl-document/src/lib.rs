//! Document-level annotation input for layered-srl.
//!
//! The document annotator segments raw text into sentences, tags and
//! lemmatizes tokens and resolves coreference across the whole document.
//! This crate models that output and overlays its coreference chains onto
//! a fused [`layered_srl::Corpus`].
//!
//! ## Core Types
//!
//! - [`AnnotatedDocument`] - sentences of tokens plus an optional [`CorefTable`]
//! - [`DocumentAnnotator`] - the annotator seam; [`PreAnnotated`] replays a saved annotation
//! - [`overlay_coreference`] - singleton-free, densely renumbered chains on a corpus
//! - [`ProcessResult`] - a value plus the non-fatal problems met producing it
//!
//! ## Example
//!
//! ```
//! use layered_srl::{Corpus, Sentence};
//! use layered_srl_document::{overlay_coreference, AnnotatedDocument};
//!
//! let doc = AnnotatedDocument::from_json(r#"{
//!     "sentences": [{"tokens": [
//!         {"word": "John", "pos": "NNP", "lemma": "John"},
//!         {"word": "said", "pos": "VBD", "lemma": "say"},
//!         {"word": "he", "pos": "PRP", "lemma": "he"}
//!     ]}],
//!     "corefs": {"7": [{"sentNum": 1, "headIndex": 1}, {"sentNum": 1, "headIndex": 3}]}
//! }"#).unwrap();
//!
//! let mut corpus = Corpus::new("tmp");
//! for sentence in &doc.sentences {
//!     let forms = sentence.words();
//!     let blanks = vec!["_"; forms.len()];
//!     corpus.push(Sentence::from_columns(&forms[..], &forms[..], &blanks[..], &blanks[..]).unwrap());
//! }
//!
//! let result = overlay_coreference(&mut corpus, doc.coref.as_ref());
//! assert!(!result.has_errors());
//! assert_eq!(corpus.mention_at(0, 3), Some(1));
//! ```

mod coref;
mod document;
mod error;
mod process;

// Annotator output
pub use document::{
    AnnotatedDocument,
    AnnotatedSentence,
    AnnotatedToken,
    DocumentAnnotator,
    PreAnnotated,
};

// Coreference
pub use coref::{
    mention_position,
    overlay_coreference,
    overlay_coreference_mapped,
    CorefChain,
    CorefMention,
    CorefTable,
    OverlayReport,
};

pub use error::{DocumentError, DocumentResult};
pub use process::{ProcessError, ProcessResult};
