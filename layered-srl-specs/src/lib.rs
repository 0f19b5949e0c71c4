#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Fixture-driven end-to-end testing for layered-srl fusion.
//!
//! Each `.toml` fixture describes one annotated document, the replies the
//! dependency and frame services give for each of its sentences, optional
//! coreference chains and word vectors, and the corpus the fusion run should
//! produce. Fixtures run against the scripted services from
//! `layered-srl-services`, so no network access is needed.
//!
//! ## Modules
//!
//! - [`fixture`] - Fixture format and conversion to documents and services
//! - [`loader`] - Loading fixture files from disk
//! - [`runner`] - Running fixtures and checking expectations
//! - [`formatter`] - Failure reports
//! - [`errors`] - Error types for fixture loading and runs

pub mod errors;
pub mod fixture;
pub mod formatter;
pub mod loader;
pub mod runner;

pub use errors::{SpecError, SpecResult};
pub use fixture::{parse_fixture, Expectations, FixtureChain, FixtureSentence, SrlFixture};
pub use formatter::{format_failure, format_summary};
pub use loader::{load_all_fixtures, load_fixture};
pub use runner::{check_expectations, run_fixture, verify_fixture};
