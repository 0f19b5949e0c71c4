#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Sentence and corpus model for fusing external NLP annotations.
//!
//! Several independent analyzers (tokenizer/tagger, dependency parser,
//! frame-semantic parser, coreference resolver, embedding source) each
//! describe part of a document. This crate is the common ground their
//! outputs are merged into before semantic role labeling:
//!
//! - [`Word`] / [`Predicate`] - token records, optionally marked as predicates
//! - [`Sentence`] - root-anchored words with head and deprel arrays
//! - [`Corpus`] - ordered sentences plus a coreference mention index
//! - [`EmbeddingSource`] - lowercased-form lookup attached by value
//! - [`SentenceDisplay`] - text rendering for debugging and snapshot tests
//!
//! ## Indexing
//!
//! Position 0 of every sentence is a synthetic root. Tokens live at
//! positions `1..=n`, and `heads()[i - 1]` is the head of position `i`
//! (0 meaning "attached to the root"). Corpus mentions are keyed by
//! 0-based sentence index and 1-based token position.
//!
//! ## Example
//!
//! ```
//! use layered_srl::{Corpus, Sentence};
//!
//! let mut sentence = Sentence::from_columns(
//!     &["Dogs", "run", "fast"],
//!     &["dog", "run", "fast"],
//!     &["NNS", "VBP", "RB"],
//!     &["_", "_", "_"],
//! )
//! .unwrap();
//! sentence
//!     .set_heads_and_deprels(vec![2, 0, 2], vec!["nsubj".into(), "root".into(), "advmod".into()])
//!     .unwrap();
//! sentence.set_sense(2, "Self_motion").unwrap();
//!
//! let mut corpus = Corpus::new("tmp");
//! let index = corpus.push(sentence);
//! corpus.add_mention(index, 1, 1).unwrap();
//!
//! assert_eq!(corpus.get(0).unwrap().word(2).unwrap().sense(), Some("Self_motion"));
//! ```

mod corpus;
mod display;
mod embedding;
mod error;
mod sentence;
mod word;

pub use corpus::{Corpus, DocPosition};
pub use display::SentenceDisplay;
pub use embedding::{EmbeddingSource, EmbeddingTable};
pub use error::{Error, Result};
pub use sentence::Sentence;
pub use word::{Predicate, Word, EMPTY_FIELD, ROOT_FORM};
