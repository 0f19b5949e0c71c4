//! The corpus: an ordered sentence collection plus a coreference mention index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sentence::Sentence;

/// Position of a token within a corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocPosition {
    /// Sentence index (0-based)
    pub sentence: usize,
    /// Token position within that sentence (1-based, 0 is the root)
    pub token: usize,
}

impl DocPosition {
    pub fn new(sentence: usize, token: usize) -> Self {
        Self { sentence, token }
    }
}

/// Ordered sentences of one document and the coreference chains over them.
///
/// Sentences are appended during fusion; mentions are registered afterwards,
/// once every sentence they may point into exists. Chain ids are assigned by
/// the caller and are expected to be dense and positive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    label: String,
    sentences: Vec<Sentence>,
    mentions: BTreeMap<DocPosition, u32>,
}

impl Corpus {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sentences: Vec::new(),
            mentions: BTreeMap::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Append a sentence and return its index.
    pub fn push(&mut self, sentence: Sentence) -> usize {
        self.sentences.push(sentence);
        self.sentences.len() - 1
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Sentence> {
        self.sentences.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Sentence> {
        self.sentences.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sentence> {
        self.sentences.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Sentence> {
        self.sentences.iter_mut()
    }

    /// Register a mention of `chain_id` at `token` of sentence `sentence`.
    ///
    /// The sentence must exist and `token` must be a real token position.
    /// Registering the same position twice keeps the later chain id.
    pub fn add_mention(&mut self, sentence: usize, token: usize, chain_id: u32) -> Result<()> {
        let sentence_count = self.sentences.len();
        let target = self
            .sentences
            .get(sentence)
            .ok_or(Error::NoSuchSentence {
                index: sentence,
                sentence_count,
            })?;

        if token == 0 {
            return Err(Error::RootPosition {
                action: "a coreference mention",
            });
        }
        if token > target.token_count() {
            return Err(Error::NoSuchPosition {
                position: token,
                token_count: target.token_count(),
            });
        }

        self.mentions
            .insert(DocPosition::new(sentence, token), chain_id);
        Ok(())
    }

    /// All mentions, ordered by (sentence, token).
    pub fn mentions(&self) -> &BTreeMap<DocPosition, u32> {
        &self.mentions
    }

    pub fn mention_at(&self, sentence: usize, token: usize) -> Option<u32> {
        self.mentions
            .get(&DocPosition::new(sentence, token))
            .copied()
    }

    /// Mentions inside one sentence as (token, chain id) pairs.
    pub fn mentions_in(&self, sentence: usize) -> Vec<(usize, u32)> {
        self.mentions
            .range(DocPosition::new(sentence, 0)..DocPosition::new(sentence + 1, 0))
            .map(|(pos, chain)| (pos.token, *chain))
            .collect()
    }

    /// Positions of one chain in corpus order.
    pub fn chain(&self, chain_id: u32) -> Vec<DocPosition> {
        self.mentions
            .iter()
            .filter(|(_, id)| **id == chain_id)
            .map(|(pos, _)| *pos)
            .collect()
    }

    /// Number of distinct chains with at least one registered mention.
    pub fn chain_count(&self) -> usize {
        let mut ids: Vec<u32> = self.mentions.values().copied().collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Sentence;
    type IntoIter = std::slice::Iter<'a, Sentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.iter()
    }
}

impl<'a> IntoIterator for &'a mut Corpus {
    type Item = &'a mut Sentence;
    type IntoIter = std::slice::IterMut<'a, Sentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.iter_mut()
    }
}
