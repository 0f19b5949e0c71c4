//! Fusion run configuration, read from TOML.
//!
//! ```toml
//! corpus_label = "news"
//! concurrency = 4
//! progress_interval = 100
//! failure_policy = "skip"
//!
//! [dependency_parser]
//! address = "localhost:12345"
//! timeout_ms = 10000
//!
//! [frame_parser]
//! address = "localhost:8043"
//! retries = 1
//!
//! [embeddings]
//! path = "glove.6B.100d.txt"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use layered_srl_services::ServiceEndpoint;
use serde::{Deserialize, Serialize};

use crate::error::{FusionError, FusionResult};

/// What to do when a sentence fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Leave the sentence out of the corpus and keep going
    #[default]
    Skip,
    /// Stop the run at the first failed sentence
    Abort,
}

/// Where to read word vectors from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    pub path: PathBuf,
}

/// Settings for one fusion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FusionConfig {
    /// Label given to the produced corpus
    #[serde(default = "default_corpus_label")]
    pub corpus_label: String,
    /// Sentences in flight at once; 1 processes them strictly one by one
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Sentences between progress checkpoints
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default)]
    pub dependency_parser: Option<ServiceEndpoint>,
    #[serde(default)]
    pub frame_parser: Option<ServiceEndpoint>,
    #[serde(default)]
    pub embeddings: Option<EmbeddingsConfig>,
}

fn default_corpus_label() -> String {
    "tmp".to_string()
}

fn default_concurrency() -> usize {
    1
}

fn default_progress_interval() -> usize {
    100
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            corpus_label: default_corpus_label(),
            concurrency: default_concurrency(),
            progress_interval: default_progress_interval(),
            failure_policy: FailurePolicy::Skip,
            dependency_parser: None,
            frame_parser: None,
            embeddings: None,
        }
    }
}

impl FusionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> FusionResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| FusionError::Config(format!("failed to read {}: {}", path.display(), e)))?;

        Self::from_toml_str(&content)
            .map_err(|e| FusionError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> FusionResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| FusionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> FusionResult<()> {
        if self.concurrency == 0 {
            return Err(FusionError::Config("concurrency must be at least 1".into()));
        }
        if self.progress_interval == 0 {
            return Err(FusionError::Config(
                "progress_interval must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn with_corpus_label(mut self, label: impl Into<String>) -> Self {
        self.corpus_label = label.into();
        self
    }

    /// Values below 1 are raised to 1.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Values below 1 are raised to 1.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_dependency_parser(mut self, endpoint: ServiceEndpoint) -> Self {
        self.dependency_parser = Some(endpoint);
        self
    }

    pub fn with_frame_parser(mut self, endpoint: ServiceEndpoint) -> Self {
        self.frame_parser = Some(endpoint);
        self
    }

    pub fn with_embeddings(mut self, path: impl Into<PathBuf>) -> Self {
        self.embeddings = Some(EmbeddingsConfig { path: path.into() });
        self
    }

    /// The dependency parser endpoint, which a socket-backed run requires.
    pub fn require_dependency_parser(&self) -> FusionResult<&ServiceEndpoint> {
        self.dependency_parser
            .as_ref()
            .ok_or_else(|| FusionError::Config("missing [dependency_parser] table".into()))
    }

    /// The frame parser endpoint, which a socket-backed run requires.
    pub fn require_frame_parser(&self) -> FusionResult<&ServiceEndpoint> {
        self.frame_parser
            .as_ref()
            .ok_or_else(|| FusionError::Config("missing [frame_parser] table".into()))
    }
}
