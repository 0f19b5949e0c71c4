#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Adapters for the external analyzers layered-srl fuses.
//!
//! ## Modules
//!
//! - [`socket`] - one-shot TCP exchange with timeout and retry
//! - [`dependency`] - dependency parser requests, sentinel rewriting, response parsing
//! - [`frame`] - frame parser targets and their predicate marking
//! - [`embedding`] - GloVe / word2vec text loading
//! - [`mock`] - scripted in-memory services for tests and fixtures
//!
//! ## Example
//!
//! ```
//! use layered_srl_services::{apply_targets, extract_targets, parse_dependency_response};
//! use layered_srl::Sentence;
//!
//! let raw = "1\tDogs\t_\tNNS\tNNS\t_\t2\tnsubj\t-\t-\n\
//!            2\trun\t_\tVBP\tVBP\t_\t0\troot\t-\t-\n";
//! let parse = parse_dependency_response(raw, 2).unwrap();
//! assert_eq!(parse.heads, vec![2, 0]);
//!
//! let mut sentence = Sentence::from_columns(
//!     &["Dogs", "run"], &["dog", "run"], &["NNS", "VBP"], &["_", "_"],
//! ).unwrap();
//! sentence.set_heads_and_deprels(parse.heads, parse.deprels).unwrap();
//!
//! let json = r#"{"frames":[{"target":{"name":"Self_motion","spans":[{"start":1,"end":2}]}}]}"#;
//! apply_targets(&mut sentence, &extract_targets(json)).unwrap();
//! assert_eq!(sentence.word(2).unwrap().sense(), Some("Self_motion"));
//! ```

pub mod config;
pub mod dependency;
pub mod embedding;
pub mod error;
pub mod frame;
pub mod mock;
pub mod socket;

pub use config::ServiceEndpoint;
pub use dependency::{
    normalize_response, parse_dependency_response, render_request, DependencyParse,
    DependencyParser, SocketDependencyParser,
};
pub use embedding::{load_embeddings, read_embeddings};
pub use error::{EmbeddingError, ResponseError, ServiceError, ServiceResult};
pub use frame::{
    apply_targets, extract_targets, target_position, FrameParser, FrameTarget, SocketFrameParser,
};
pub use mock::{MockDependencyParser, MockFrameParser, MockReply};
pub use socket::SocketClient;
