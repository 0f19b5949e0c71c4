//! Word embedding lookup and attachment.
//!
//! Embeddings are best-effort enrichment: a form with no vector is left
//! without one, and nothing downstream treats that as an error.

use std::collections::HashMap;

use crate::corpus::Corpus;
use crate::sentence::Sentence;

/// Read-only lookup from lowercased surface form to vector.
pub trait EmbeddingSource: Send + Sync {
    /// Vector for an already lowercased form.
    fn lookup(&self, form: &str) -> Option<&[f64]>;

    /// Dimension of the vectors, when known.
    fn dimension(&self) -> Option<usize> {
        None
    }
}

/// In-memory embedding table keyed by lowercased form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddingTable {
    vectors: HashMap<String, Vec<f64>>,
    dimension: Option<usize>,
}

impl EmbeddingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vector, lowercasing the key. Returns the previous vector.
    pub fn insert(&mut self, form: &str, vector: Vec<f64>) -> Option<Vec<f64>> {
        if self.dimension.is_none() {
            self.dimension = Some(vector.len());
        }
        self.vectors.insert(form.to_lowercase(), vector)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn contains(&self, form: &str) -> bool {
        self.vectors.contains_key(&form.to_lowercase())
    }
}

impl FromIterator<(String, Vec<f64>)> for EmbeddingTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<f64>)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (form, vector) in iter {
            table.insert(&form, vector);
        }
        table
    }
}

impl EmbeddingSource for EmbeddingTable {
    fn lookup(&self, form: &str) -> Option<&[f64]> {
        self.vectors.get(form).map(Vec::as_slice)
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}

impl Sentence {
    /// Copy vectors onto every non-root word whose lowercased form is known.
    ///
    /// Returns the number of words that received a vector. Predicate markers
    /// are untouched, so this may run before or after frame marking.
    pub fn attach_embeddings(&mut self, source: &dyn EmbeddingSource) -> usize {
        let mut attached = 0;
        for word in self.tokens_mut() {
            if let Some(vector) = source.lookup(&word.lookup_key()) {
                word.set_embedding(vector.to_vec());
                attached += 1;
            }
        }
        attached
    }
}

impl Corpus {
    /// Attach embeddings across every sentence. Returns the total attached.
    pub fn attach_embeddings(&mut self, source: &dyn EmbeddingSource) -> usize {
        self.iter_mut()
            .map(|sentence| sentence.attach_embeddings(source))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> EmbeddingTable {
        vec![
            ("dogs".to_string(), vec![0.1, 0.2]),
            ("Run".to_string(), vec![0.3, 0.4]),
        ]
        .into_iter()
        .collect()
    }

    fn sentence() -> Sentence {
        Sentence::from_columns(
            &["Dogs", "RUN", "fast"],
            &["dog", "run", "fast"],
            &["NNS", "VBP", "RB"],
            &["_", "_", "_"],
        )
        .unwrap()
    }

    #[test]
    fn attachment_is_case_insensitive() {
        let mut sentence = sentence();
        let attached = sentence.attach_embeddings(&table());

        assert_eq!(attached, 2);
        assert_eq!(sentence.word(1).unwrap().embedding(), Some(&[0.1, 0.2][..]));
        assert_eq!(sentence.word(2).unwrap().embedding(), Some(&[0.3, 0.4][..]));
    }

    #[test]
    fn misses_leave_no_embedding() {
        let mut sentence = sentence();
        sentence.attach_embeddings(&table());
        assert_eq!(sentence.word(3).unwrap().embedding(), None);
        assert_eq!(sentence.word(0).unwrap().embedding(), None);
    }

    #[test]
    fn predicates_keep_their_marker() {
        let mut sentence = sentence();
        sentence.set_sense(2, "Self_motion").unwrap();
        sentence.attach_embeddings(&table());

        let run = sentence.word(2).unwrap();
        assert_eq!(run.sense(), Some("Self_motion"));
        assert!(run.embedding().is_some());
    }

    #[test]
    fn empty_table_is_not_an_error() {
        let mut sentence = sentence();
        assert_eq!(sentence.attach_embeddings(&EmbeddingTable::new()), 0);
    }

    #[test]
    fn table_tracks_dimension() {
        assert_eq!(table().dimension(), Some(2));
        assert!(table().contains("DOGS"));
    }
}
