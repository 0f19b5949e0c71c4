//! Coreference chains from the document annotator and their overlay onto a
//! [`Corpus`].
//!
//! The annotator numbers chains with its own ids and counts sentences from 1.
//! The overlay discards those ids, drops singleton chains, renumbers the
//! remaining chains densely from 1 in source order, and converts sentence
//! numbers to corpus indices:
//!
//! ```text
//! {5: [(s1, h2), (s3, h1)], 6: [(s2, h4)]}
//!      ──────────────────       ────────
//!      chain #1                 singleton, dropped
//!
//! corpus mentions: (0, 2) -> 1, (2, 1) -> 1
//! ```

use std::fmt;

use layered_srl::Corpus;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

use crate::process::{ProcessError, ProcessResult};

/// One mention of a chain: a sentence number and the mention's head token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorefMention {
    /// 1-based sentence number
    #[serde(rename = "sentNum", alias = "sent_num")]
    pub sent_num: usize,
    /// 1-based head token index within the sentence
    #[serde(rename = "headIndex", alias = "head_index")]
    pub head_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CorefMention {
    pub fn new(sent_num: usize, head_index: usize) -> Self {
        Self {
            sent_num,
            head_index,
            text: None,
        }
    }
}

/// A chain as the annotator reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorefChain {
    /// The annotator's own id, kept only for diagnostics
    pub source_id: String,
    /// Mentions in textual order
    pub mentions: Vec<CorefMention>,
}

impl CorefChain {
    pub fn new(source_id: impl Into<String>, mentions: Vec<CorefMention>) -> Self {
        Self {
            source_id: source_id.into(),
            mentions,
        }
    }

    pub fn is_singleton(&self) -> bool {
        self.mentions.len() == 1
    }
}

/// Chain id -> mentions, in the order the annotator emitted the chains.
///
/// Serialized as a JSON object keyed by source id. Deserialization keeps
/// the object's key order, which decides the dense renumbering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorefTable {
    chains: Vec<CorefChain>,
}

impl CorefTable {
    pub fn new(chains: Vec<CorefChain>) -> Self {
        Self { chains }
    }

    pub fn chains(&self) -> &[CorefChain] {
        &self.chains
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn push(&mut self, chain: CorefChain) {
        self.chains.push(chain);
    }
}

impl Serialize for CorefTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.chains.len()))?;
        for chain in &self.chains {
            map.serialize_entry(&chain.source_id, &chain.mentions)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CorefTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = CorefTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from chain id to a list of mentions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<CorefTable, A::Error> {
                let mut chains = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((source_id, mentions)) =
                    access.next_entry::<String, Vec<CorefMention>>()?
                {
                    chains.push(CorefChain::new(source_id, mentions));
                }
                Ok(CorefTable::new(chains))
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Counts from one overlay pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayReport {
    /// Chains that received an id (non-singletons)
    pub chains_recorded: u32,
    /// Mentions written into the corpus
    pub mentions_recorded: usize,
    /// Chains skipped for having a single mention
    pub singletons_skipped: usize,
    /// Mentions dropped because their sentence or token is not in the corpus
    pub dangling_mentions: usize,
}

/// Corpus location of a mention: 0-based sentence index and 1-based token.
///
/// `None` for a sentence number of 0, which no annotator emits for a real
/// sentence.
pub fn mention_position(mention: &CorefMention) -> Option<(usize, usize)> {
    mention
        .sent_num
        .checked_sub(1)
        .map(|sentence| (sentence, mention.head_index))
}

/// Overlay `table` onto `corpus`, assuming corpus index = sentence number - 1.
///
/// An absent table means no chains; it is not an error.
pub fn overlay_coreference(
    corpus: &mut Corpus,
    table: Option<&CorefTable>,
) -> ProcessResult<OverlayReport> {
    overlay_coreference_mapped(corpus, table, Some)
}

/// Overlay `table` onto `corpus` through a document-to-corpus index map.
///
/// `corpus_index` maps a 0-based document sentence index to the index of
/// that sentence in `corpus`, or `None` when the sentence is not there
/// (it failed fusion). Mentions that cannot be placed are dropped and
/// reported; the rest of their chain is still recorded.
pub fn overlay_coreference_mapped<F>(
    corpus: &mut Corpus,
    table: Option<&CorefTable>,
    corpus_index: F,
) -> ProcessResult<OverlayReport>
where
    F: Fn(usize) -> Option<usize>,
{
    let mut result = ProcessResult::ok(OverlayReport::default());

    let table = match table {
        Some(table) => table,
        None => {
            debug!("no coreference table; corpus gets no mentions");
            return result;
        }
    };

    let mut next_id: u32 = 1;
    for chain in table.chains() {
        if chain.is_singleton() || chain.mentions.is_empty() {
            result.value.singletons_skipped += 1;
            continue;
        }

        let chain_id = next_id;
        next_id += 1;
        result.value.chains_recorded += 1;

        for mention in &chain.mentions {
            let placed = mention_position(mention)
                .ok_or_else(|| "sentence number 0".to_string())
                .and_then(|(doc_sentence, token)| {
                    corpus_index(doc_sentence)
                        .ok_or_else(|| "sentence is not in the corpus".to_string())
                        .map(|sentence| (sentence, token))
                })
                .and_then(|(sentence, token)| {
                    corpus
                        .add_mention(sentence, token, chain_id)
                        .map_err(|e| e.to_string())
                });

            match placed {
                Ok(()) => result.value.mentions_recorded += 1,
                Err(reason) => {
                    warn!(
                        chain = chain_id,
                        source_chain = %chain.source_id,
                        sent_num = mention.sent_num,
                        head_index = mention.head_index,
                        "dropping coreference mention: {}",
                        reason
                    );
                    result.value.dangling_mentions += 1;
                    result.add_error(ProcessError::DanglingMention {
                        chain: chain_id,
                        sentence_number: mention.sent_num,
                        head_index: mention.head_index,
                        reason,
                    });
                }
            }
        }
    }

    debug!(
        chains = result.value.chains_recorded,
        mentions = result.value.mentions_recorded,
        singletons = result.value.singletons_skipped,
        "coreference overlay complete"
    );
    result
}
