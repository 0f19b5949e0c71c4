//! Error types for the fixture system.

use thiserror::Error;

/// Errors that can occur while loading or running fixtures.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Fixture TOML could not be parsed or describes an impossible setup.
    #[error("invalid fixture: {message}")]
    Parse { message: String },

    /// Error loading a fixture file.
    #[error("failed to load fixture: {path}: {message}")]
    Load { path: String, message: String },

    /// The run did not match the fixture's expectations.
    #[error("{fixture}: {} expectation(s) failed", .mismatches.len())]
    Mismatch {
        fixture: String,
        mismatches: Vec<String>,
    },
}

/// Result type for spec operations.
pub type SpecResult<T> = Result<T, SpecError>;
