//! Fixture format: a scripted document, scripted service replies and the
//! corpus the fusion run is expected to produce.
//!
//! ```toml
//! title = "Dogs run fast"
//!
//! [[sentence]]
//! tokens = [["Dogs", "NNS", "dog"], ["run", "VBP", "run"], ["fast", "RB", "fast"]]
//! arcs = [[2, "nsubj"], [0, "root"], [2, "advmod"]]
//! frames = [["Self_motion", 1]]
//!
//! [[chain]]
//! id = "5"
//! mentions = [[1, 1], [1, 2]]
//!
//! [expect]
//! heads = [[2, 0, 2]]
//! senses = [[0, 2, "Self_motion"]]
//! ```
//!
//! Each sentence's dependency reply is given as `arcs` (rendered in the
//! parser's ten-column layout), as a literal `raw_parse`, or replaced by
//! `unreachable = true`. Frame replies are `frames` pairs or a literal
//! `raw_frames`.

use std::collections::BTreeMap;

use layered_srl::EmbeddingTable;
use layered_srl_document::{
    AnnotatedDocument, AnnotatedSentence, AnnotatedToken, CorefChain, CorefMention, CorefTable,
};
use layered_srl_pipeline::{FailurePolicy, FusionConfig};
use layered_srl_services::{MockDependencyParser, MockFrameParser, MockReply};
use serde::Deserialize;

use crate::errors::{SpecError, SpecResult};

/// A parsed fixture file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SrlFixture {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub concurrency: Option<usize>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default, rename = "sentence")]
    pub sentences: Vec<FixtureSentence>,
    #[serde(default, rename = "chain")]
    pub chains: Vec<FixtureChain>,
    /// Lowercased form -> vector
    #[serde(default)]
    pub embeddings: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub expect: Expectations,
}

/// One annotated sentence and the replies scripted for it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureSentence {
    /// `[form, tag, lemma]` triples
    pub tokens: Vec<(String, String, String)>,
    #[serde(default)]
    pub arcs: Option<Vec<(usize, String)>>,
    #[serde(default)]
    pub raw_parse: Option<String>,
    #[serde(default)]
    pub unreachable: bool,
    /// `[frame, start]` pairs
    #[serde(default)]
    pub frames: Vec<(String, usize)>,
    #[serde(default)]
    pub raw_frames: Option<String>,
}

impl FixtureSentence {
    /// Forms joined by single spaces, the key the mock services use.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|(form, _, _)| form.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A coreference chain: annotator id and `[sentNum, headIndex]` mentions.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureChain {
    pub id: String,
    pub mentions: Vec<(usize, usize)>,
}

/// What the run should produce. Absent fields are not checked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Expectations {
    /// Number of sentences in the corpus
    #[serde(default)]
    pub corpus_len: Option<usize>,
    /// Heads of each corpus sentence, in corpus order
    #[serde(default)]
    pub heads: Option<Vec<Vec<usize>>>,
    /// `[corpus sentence, position, sense]` for every predicate
    #[serde(default)]
    pub senses: Option<Vec<(usize, usize, String)>>,
    /// `[corpus sentence, token, chain id]` for every mention
    #[serde(default)]
    pub mentions: Option<Vec<(usize, usize, u32)>>,
    /// `[document sentence, step]` for every failed sentence
    #[serde(default)]
    pub failures: Option<Vec<(usize, String)>>,
    /// `[corpus sentence, position]` of every word carrying an embedding
    #[serde(default)]
    pub embedded: Option<Vec<(usize, usize)>>,
    /// Document index of the sentence that aborts the run
    #[serde(default)]
    pub aborted_at: Option<usize>,
}

/// Parse fixture TOML.
pub fn parse_fixture(content: &str) -> SpecResult<SrlFixture> {
    let fixture: SrlFixture = toml::from_str(content).map_err(|e| SpecError::Parse {
        message: e.to_string(),
    })?;

    for (index, sentence) in fixture.sentences.iter().enumerate() {
        let scripted = [
            sentence.arcs.is_some(),
            sentence.raw_parse.is_some(),
            sentence.unreachable,
        ];
        if scripted.iter().filter(|s| **s).count() != 1 {
            return Err(SpecError::Parse {
                message: format!(
                    "sentence {} needs exactly one of arcs, raw_parse, unreachable",
                    index
                ),
            });
        }
    }

    Ok(fixture)
}

impl SrlFixture {
    /// The document the pre-annotated annotator serves.
    pub fn document(&self) -> AnnotatedDocument {
        let sentences = self
            .sentences
            .iter()
            .map(|s| {
                AnnotatedSentence::new(
                    s.tokens
                        .iter()
                        .map(|(form, tag, lemma)| AnnotatedToken::new(form, tag, lemma))
                        .collect(),
                )
            })
            .collect();

        let document = AnnotatedDocument::new(sentences);
        if self.chains.is_empty() {
            return document;
        }

        let chains = self
            .chains
            .iter()
            .map(|chain| {
                CorefChain::new(
                    chain.id.as_str(),
                    chain
                        .mentions
                        .iter()
                        .map(|&(sent_num, head_index)| CorefMention::new(sent_num, head_index))
                        .collect(),
                )
            })
            .collect();
        document.with_coref(CorefTable::new(chains))
    }

    pub fn dependency_parser(&self) -> MockDependencyParser {
        self.sentences
            .iter()
            .fold(MockDependencyParser::new(), |parser, sentence| {
                let text = sentence.text();
                if sentence.unreachable {
                    parser.reply(&text, MockReply::Unreachable)
                } else if let Some(raw) = &sentence.raw_parse {
                    parser.respond(&text, raw.as_str())
                } else {
                    let arcs: Vec<(usize, &str)> = sentence
                        .arcs
                        .iter()
                        .flatten()
                        .map(|(head, deprel)| (*head, deprel.as_str()))
                        .collect();
                    parser.respond_with_arcs(&text, &arcs)
                }
            })
    }

    pub fn frame_parser(&self) -> MockFrameParser {
        self.sentences
            .iter()
            .fold(MockFrameParser::empty(), |parser, sentence| {
                let text = sentence.text();
                match &sentence.raw_frames {
                    Some(raw) => parser.respond(&text, raw.as_str()),
                    None => {
                        let targets: Vec<(&str, usize)> = sentence
                            .frames
                            .iter()
                            .map(|(frame, start)| (frame.as_str(), *start))
                            .collect();
                        parser.respond_with_targets(&text, &targets)
                    }
                }
            })
    }

    /// `None` when the fixture lists no vectors.
    pub fn embedding_table(&self) -> Option<EmbeddingTable> {
        if self.embeddings.is_empty() {
            return None;
        }
        Some(
            self.embeddings
                .iter()
                .map(|(form, vector)| (form.clone(), vector.clone()))
                .collect(),
        )
    }

    pub fn config(&self) -> FusionConfig {
        FusionConfig::new()
            .with_concurrency(self.concurrency.unwrap_or(1))
            .with_failure_policy(self.failure_policy)
            .with_corpus_label(self.title.as_deref().unwrap_or("fixture"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let fixture = parse_fixture(
            r#"
            [[sentence]]
            tokens = [["Hi", "UH", "hi"]]
            arcs = [[0, "root"]]
            "#,
        )
        .unwrap();

        assert_eq!(fixture.sentences.len(), 1);
        assert_eq!(fixture.sentences[0].text(), "Hi");
        assert_eq!(fixture.failure_policy, FailurePolicy::Skip);
        assert!(fixture.document().coref.is_none());
        assert!(fixture.embedding_table().is_none());
    }

    #[test]
    fn test_sentence_needs_one_reply() {
        let err = parse_fixture(
            r#"
            [[sentence]]
            tokens = [["Hi", "UH", "hi"]]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SpecError::Parse { .. }));

        let err = parse_fixture(
            r#"
            [[sentence]]
            tokens = [["Hi", "UH", "hi"]]
            arcs = [[0, "root"]]
            unreachable = true
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, SpecError::Parse { .. }));
    }

    #[test]
    fn test_chains_keep_listed_order() {
        let fixture = parse_fixture(
            r#"
            [[sentence]]
            tokens = [["a", "DT", "a"], ["b", "NN", "b"]]
            arcs = [[2, "det"], [0, "root"]]

            [[chain]]
            id = "9"
            mentions = [[1, 1], [1, 2]]

            [[chain]]
            id = "2"
            mentions = [[1, 2]]
            "#,
        )
        .unwrap();

        let coref = fixture.document().coref.unwrap();
        let ids: Vec<&str> = coref.chains().iter().map(|c| c.source_id.as_str()).collect();
        assert_eq!(ids, vec!["9", "2"]);
    }
}
