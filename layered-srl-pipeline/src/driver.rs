//! The fusion driver: annotator output in, coreference-overlaid corpus out.
//!
//! Each sentence walks the [`SentenceStage`] chain independently. Up to
//! `concurrency` sentences are in flight at once, but results are taken in
//! document order, so the corpus always lists sentences as the annotator
//! segmented them. Coreference is overlaid once every sentence has either
//! been accumulated or failed.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use layered_srl::{Corpus, EmbeddingSource, Sentence};
use layered_srl_document::{
    overlay_coreference_mapped, AnnotatedDocument, AnnotatedSentence, OverlayReport, ProcessError,
};
use layered_srl_services::{
    apply_targets, extract_targets, parse_dependency_response, render_request, DependencyParser,
    FrameParser,
};
use tracing::{debug, info, warn};

use crate::config::{FailurePolicy, FusionConfig};
use crate::error::{FusionResult, SentenceFailure};
use crate::progress::{Phase, ProgressEvent, ProgressReporter};
use crate::stage::{CorpusStage, SentenceStage};

/// Everything a fusion pass produced.
#[derive(Debug)]
pub struct FusionOutcome {
    pub corpus: Corpus,
    /// Sentences left out, in document order
    pub failures: Vec<SentenceFailure>,
    pub overlay: OverlayReport,
    /// Coreference mentions that could not be placed
    pub dangling: Vec<ProcessError>,
}

impl FusionOutcome {
    /// Sentence failures and dangling mentions as one list.
    pub fn problems(&self) -> Vec<ProcessError> {
        self.failures
            .iter()
            .map(ProcessError::from)
            .chain(self.dangling.iter().cloned())
            .collect()
    }
}

/// Drives sentences through the dependency and frame parsers into a corpus.
pub struct FusionDriver {
    dependency: Arc<dyn DependencyParser>,
    frames: Arc<dyn FrameParser>,
    config: FusionConfig,
    progress: ProgressReporter,
}

impl FusionDriver {
    pub fn new(dependency: Arc<dyn DependencyParser>, frames: Arc<dyn FrameParser>) -> Self {
        let config = FusionConfig::default();
        let progress = ProgressReporter::new(config.progress_interval);
        Self {
            dependency,
            frames,
            config,
            progress,
        }
    }

    /// Replace the configuration. Keeps a progress sender already set.
    pub fn with_config(mut self, config: FusionConfig) -> Self {
        let mut progress = ProgressReporter::new(config.progress_interval);
        if let Some(sender) = self.progress.sender() {
            progress = progress.with_sender(sender);
        }
        self.progress = progress;
        self.config = config;
        self
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    pub fn progress(&self) -> &ProgressReporter {
        &self.progress
    }

    /// Take one annotated sentence from raw tokens to an embedded [`Sentence`].
    ///
    /// `index` is the sentence's position in the document, used only to
    /// identify it in a failure.
    pub async fn fuse_sentence(
        &self,
        index: usize,
        tokens: &AnnotatedSentence,
        embeddings: Option<&dyn EmbeddingSource>,
    ) -> Result<Sentence, SentenceFailure> {
        let mut stage = SentenceStage::RawTokens;
        let mut sentence = build_sentence(&tokens.tokens)
            .map_err(|e| SentenceFailure::from_model(index, stage, &e))?;

        // RAW_TOKENS -> DEPENDENCY_PARSED
        let request = render_request(&tokens.tokens);
        let raw = self
            .dependency
            .parse(&request)
            .await
            .map_err(|e| SentenceFailure::from_service(index, stage, &e))?;
        let parse = parse_dependency_response(&raw, sentence.token_count())
            .map_err(|e| SentenceFailure::from_response(index, stage, &e))?;
        sentence
            .set_heads_and_deprels(parse.heads, parse.deprels)
            .map_err(|e| SentenceFailure::from_model(index, stage, &e))?;
        stage.advance();

        // DEPENDENCY_PARSED -> FRAME_ANNOTATED
        let response = self
            .frames
            .parse(&parse.normalized)
            .await
            .map_err(|e| SentenceFailure::from_service(index, stage, &e))?;
        let targets = extract_targets(&response);
        apply_targets(&mut sentence, &targets)
            .map_err(|e| SentenceFailure::from_response(index, stage, &e))?;
        stage.advance();

        // FRAME_ANNOTATED -> EMBEDDED
        let attached = embeddings.map_or(0, |source| sentence.attach_embeddings(source));
        stage.advance();

        debug!(
            sentence = index,
            %stage,
            tokens = sentence.token_count(),
            predicates = targets.len(),
            embeddings = attached,
            "sentence fused"
        );
        Ok(sentence)
    }

    /// Fuse every sentence of `document` and overlay its coreference chains.
    ///
    /// With [`FailurePolicy::Skip`] failed sentences are left out and
    /// reported in the outcome; with [`FailurePolicy::Abort`] the first
    /// failure, in document order, is returned as the error.
    pub async fn fuse_document(
        &self,
        document: &AnnotatedDocument,
        embeddings: Option<&dyn EmbeddingSource>,
    ) -> FusionResult<FusionOutcome> {
        let total = document.sentence_count();
        let mut corpus = Corpus::new(self.config.corpus_label.as_str());
        let mut corpus_index: Vec<Option<usize>> = vec![None; total];
        let mut failures = Vec::new();
        let mut stage = CorpusStage::Accumulating;

        info!(
            sentences = total,
            concurrency = self.config.concurrency,
            "fusing document"
        );

        let results = stream::iter(document.sentences.iter().enumerate())
            .map(|(index, tokens)| async move {
                (index, self.fuse_sentence(index, tokens, embeddings).await)
            })
            .buffered(self.config.concurrency.max(1));
        futures::pin_mut!(results);

        let mut processed = 0;
        while let Some((index, result)) = results.next().await {
            processed += 1;
            match result {
                Ok(sentence) => {
                    // EMBEDDED -> ACCUMULATED
                    corpus_index[index] = Some(corpus.push(sentence));
                    self.progress.emit(ProgressEvent::SentenceFused { index });
                }
                Err(failure) => {
                    warn!(
                        sentence = failure.index,
                        stage = %failure.stage,
                        kind = %failure.kind,
                        "{}",
                        failure
                    );
                    self.progress.emit(ProgressEvent::SentenceFailed {
                        index,
                        stage: failure.stage,
                    });
                    if self.config.failure_policy == FailurePolicy::Abort {
                        return Err(failure.into());
                    }
                    failures.push(failure);
                }
            }
            self.progress.processed(Phase::Fusion, processed, total);
        }
        self.enter(&mut stage);

        let overlaid = overlay_coreference_mapped(&mut corpus, document.coref.as_ref(), |i| {
            corpus_index.get(i).copied().flatten()
        });
        self.progress.emit(ProgressEvent::CorefOverlaid {
            chains: overlaid.value.chains_recorded,
            mentions: overlaid.value.mentions_recorded,
        });
        self.enter(&mut stage);

        info!(
            fused = corpus.len(),
            failed = failures.len(),
            chains = overlaid.value.chains_recorded,
            "document fused"
        );

        Ok(FusionOutcome {
            corpus,
            failures,
            overlay: overlaid.value,
            dangling: overlaid.errors,
        })
    }

    fn enter(&self, stage: &mut CorpusStage) {
        let stage = stage.advance();
        debug!(%stage, "corpus stage");
        self.progress
            .emit(ProgressEvent::CorpusStageChanged { stage });
    }
}

/// Build a sentence from annotator tokens: forms, lemmas and tags come from
/// the annotator, morphology is left empty, offsets are kept when present.
fn build_sentence(
    tokens: &[layered_srl_document::AnnotatedToken],
) -> layered_srl::Result<Sentence> {
    let forms: Vec<&str> = tokens.iter().map(|t| t.word.as_str()).collect();
    let lemmas: Vec<&str> = tokens.iter().map(|t| t.lemma.as_str()).collect();
    let tags: Vec<&str> = tokens.iter().map(|t| t.tag.as_str()).collect();
    let morphs = vec![layered_srl::EMPTY_FIELD; tokens.len()];

    let mut sentence = Sentence::from_columns(&forms[..], &lemmas[..], &tags[..], &morphs[..])?;
    for (word, token) in sentence.tokens_mut().zip(tokens) {
        if let (Some(begin), Some(end)) = (token.begin, token.end) {
            word.set_offsets(begin, end);
        }
    }
    Ok(sentence)
}
