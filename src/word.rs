//! Token-level records.
//!
//! A [`Word`] is the smallest unit of a [`Sentence`](crate::Sentence). Words
//! become predicates through [`Sentence::make_predicate`](crate::Sentence::make_predicate),
//! which attaches a [`Predicate`] marker carrying the frame sense and, once
//! the role labeler has run, the labeled arguments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Surface form used for the synthetic root at position 0.
pub const ROOT_FORM: &str = "<root>";

/// Placeholder for columns a stage does not supply (morphology, mostly).
pub const EMPTY_FIELD: &str = "_";

/// A single token of a sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    form: String,
    lemma: String,
    tag: String,
    morph: String,
    /// 1-based position within the sentence; 0 is the root.
    position: usize,
    /// Character offsets in the source text, when the annotator reports them.
    offsets: Option<(usize, usize)>,
    embedding: Option<Vec<f64>>,
    predicate: Option<Predicate>,
}

impl Word {
    pub fn new(
        form: impl Into<String>,
        lemma: impl Into<String>,
        tag: impl Into<String>,
        morph: impl Into<String>,
        position: usize,
    ) -> Self {
        Self {
            form: form.into(),
            lemma: lemma.into(),
            tag: tag.into(),
            morph: morph.into(),
            position,
            offsets: None,
            embedding: None,
            predicate: None,
        }
    }

    /// The synthetic root token.
    pub fn root() -> Self {
        Self::new(ROOT_FORM, ROOT_FORM, ROOT_FORM, EMPTY_FIELD, 0)
    }

    pub fn form(&self) -> &str {
        &self.form
    }

    pub fn lemma(&self) -> &str {
        &self.lemma
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn morph(&self) -> &str {
        &self.morph
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_root(&self) -> bool {
        self.position == 0
    }

    /// Lowercased form, the key used for embedding lookup.
    pub fn lookup_key(&self) -> String {
        self.form.to_lowercase()
    }

    pub fn offsets(&self) -> Option<(usize, usize)> {
        self.offsets
    }

    pub fn set_offsets(&mut self, begin: usize, end: usize) {
        self.offsets = Some((begin, end));
    }

    pub fn embedding(&self) -> Option<&[f64]> {
        self.embedding.as_deref()
    }

    /// Attach an embedding, replacing any previous one.
    pub fn set_embedding(&mut self, vector: Vec<f64>) {
        self.embedding = Some(vector);
    }

    pub fn is_predicate(&self) -> bool {
        self.predicate.is_some()
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    pub fn predicate_mut(&mut self) -> Option<&mut Predicate> {
        self.predicate.as_mut()
    }

    /// Frame sense, if this word is a predicate with a sense.
    pub fn sense(&self) -> Option<&str> {
        self.predicate.as_ref().and_then(|p| p.sense())
    }

    /// Mark as predicate. Existing markers (sense, arguments) are kept.
    pub(crate) fn mark_predicate(&mut self) -> &mut Predicate {
        self.predicate.get_or_insert_with(Predicate::default)
    }
}

/// Predicate marker attached to a [`Word`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    sense: Option<String>,
    /// Argument position -> role label, filled in by the role labeler.
    arguments: BTreeMap<usize, String>,
}

impl Predicate {
    pub fn sense(&self) -> Option<&str> {
        self.sense.as_deref()
    }

    /// Set the frame sense. Later calls overwrite earlier ones.
    pub fn set_sense(&mut self, sense: impl Into<String>) {
        self.sense = Some(sense.into());
    }

    pub fn arguments(&self) -> &BTreeMap<usize, String> {
        &self.arguments
    }

    pub fn argument(&self, position: usize) -> Option<&str> {
        self.arguments.get(&position).map(String::as_str)
    }

    pub fn set_argument(&mut self, position: usize, role: impl Into<String>) {
        self.arguments.insert(position, role.into());
    }

    pub fn clear_arguments(&mut self) {
        self.arguments.clear();
    }
}
