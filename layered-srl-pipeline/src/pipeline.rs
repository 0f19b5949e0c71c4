//! The whole run: annotate, fuse, overlay, label, report.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use layered_srl::{Corpus, EmbeddingSource, EmbeddingTable};
use layered_srl_document::{DocumentAnnotator, OverlayReport, ProcessError};
use layered_srl_services::{load_embeddings, SocketDependencyParser, SocketFrameParser};
use tracing::info;

use crate::config::FusionConfig;
use crate::driver::FusionDriver;
use crate::error::{FusionResult, SentenceFailure};
use crate::labeler::{label_corpus, RoleLabeler};
use crate::progress::ProgressReporter;
use crate::stats::RunStats;

/// Where word vectors come from.
#[derive(Clone, Default)]
pub enum EmbeddingSupply {
    /// No embeddings are attached
    #[default]
    None,
    /// One table shared by every document
    Shared(Arc<dyn EmbeddingSource>),
    /// Read from this file for each document, keeping only its vocabulary
    PerDocument(PathBuf),
}

/// Result of [`Pipeline::run`].
#[derive(Debug)]
pub struct PipelineRun {
    /// The labeled corpus
    pub corpus: Corpus,
    pub failures: Vec<SentenceFailure>,
    pub overlay: OverlayReport,
    pub dangling: Vec<ProcessError>,
    pub stats: RunStats,
    /// The labeler's status followed by timing lines
    pub status: String,
}

/// Document annotator, fusion driver and role labeler wired together.
pub struct Pipeline<L: RoleLabeler> {
    annotator: Arc<dyn DocumentAnnotator>,
    driver: FusionDriver,
    embeddings: EmbeddingSupply,
    labeler: L,
}

impl<L: RoleLabeler> Pipeline<L> {
    /// Uses the embedding file named in the driver's configuration, if any.
    pub fn new(annotator: Arc<dyn DocumentAnnotator>, driver: FusionDriver, labeler: L) -> Self {
        let embeddings = match &driver.config().embeddings {
            Some(embeddings) => EmbeddingSupply::PerDocument(embeddings.path.clone()),
            None => EmbeddingSupply::None,
        };
        Self {
            annotator,
            driver,
            embeddings,
            labeler,
        }
    }

    /// Socket-backed pipeline; both parser endpoints must be configured.
    pub fn from_config(
        config: FusionConfig,
        annotator: Arc<dyn DocumentAnnotator>,
        labeler: L,
    ) -> FusionResult<Self> {
        let dependency = SocketDependencyParser::new(config.require_dependency_parser()?.clone());
        let frames = SocketFrameParser::new(config.require_frame_parser()?.clone());
        let driver = FusionDriver::new(Arc::new(dependency), Arc::new(frames)).with_config(config);
        Ok(Self::new(annotator, driver, labeler))
    }

    pub fn with_embeddings(mut self, embeddings: EmbeddingSupply) -> Self {
        self.embeddings = embeddings;
        self
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.driver = self.driver.with_progress(progress);
        self
    }

    pub fn labeler(&self) -> &L {
        &self.labeler
    }

    pub fn driver(&self) -> &FusionDriver {
        &self.driver
    }

    /// Annotate `text`, fuse it into a corpus and label every sentence.
    pub async fn run(&mut self, text: &str) -> FusionResult<PipelineRun> {
        let start = Instant::now();
        let document = self.annotator.annotate(text).await?;

        let per_document: EmbeddingTable;
        let embeddings: Option<&dyn EmbeddingSource> = match &self.embeddings {
            EmbeddingSupply::None => None,
            EmbeddingSupply::Shared(source) => Some(source.as_ref()),
            EmbeddingSupply::PerDocument(path) => {
                per_document = load_embeddings(path, Some(&document.vocabulary()))?;
                Some(&per_document)
            }
        };

        let outcome = self.driver.fuse_document(&document, embeddings).await?;
        let mut corpus = outcome.corpus;

        let labeled = label_corpus(&mut corpus, &mut self.labeler, self.driver.progress())?;

        let stats = RunStats {
            sentences_total: document.sentence_count(),
            sentences_fused: corpus.len(),
            sentences_failed: outcome.failures.len(),
            sentences_labeled: labeled,
            elapsed: start.elapsed(),
            parsing_time: self.labeler.parsing_time(),
        };
        let status = stats.status_report(&self.labeler.status());

        info!(
            sentences = stats.sentences_total,
            failed = stats.sentences_failed,
            elapsed_ms = stats.elapsed_ms() as u64,
            "run complete"
        );

        Ok(PipelineRun {
            corpus,
            failures: outcome.failures,
            overlay: outcome.overlay,
            dangling: outcome.dangling,
            stats,
            status,
        })
    }
}
