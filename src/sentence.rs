//! Sentences: a root-anchored word sequence plus its dependency arrays.
//!
//! Indexing follows one scheme everywhere in this crate: position 0 is the
//! synthetic root, tokens occupy positions `1..=token_count()`, and
//! `heads()[i - 1]` / `deprels()[i - 1]` describe the token at position `i`.
//! Conversions from other index bases happen in the adapters that read
//! external output, never here.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::word::{Predicate, Word, EMPTY_FIELD};

/// A sentence with its dependency structure and predicate markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    /// Index 0 is the root.
    words: Vec<Word>,
    heads: Vec<usize>,
    deprels: Vec<String>,
}

impl Sentence {
    /// Build a sentence from parallel token columns (root excluded).
    ///
    /// Every token starts attached to the root with an empty relation until
    /// [`set_heads_and_deprels`](Self::set_heads_and_deprels) is called.
    pub fn from_columns<S: AsRef<str>>(
        forms: &[S],
        lemmas: &[S],
        tags: &[S],
        morphs: &[S],
    ) -> Result<Self> {
        let n = forms.len();
        check_len("lemmas", n, lemmas.len())?;
        check_len("tags", n, tags.len())?;
        check_len("morphs", n, morphs.len())?;

        let mut words = Vec::with_capacity(n + 1);
        words.push(Word::root());
        for i in 0..n {
            words.push(Word::new(
                forms[i].as_ref(),
                lemmas[i].as_ref(),
                tags[i].as_ref(),
                morphs[i].as_ref(),
                i + 1,
            ));
        }

        Ok(Self {
            words,
            heads: vec![0; n],
            deprels: vec![EMPTY_FIELD.to_string(); n],
        })
    }

    /// Number of real tokens (root excluded).
    pub fn token_count(&self) -> usize {
        self.words.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.token_count() == 0
    }

    /// All words, root first.
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Non-root words in order.
    pub fn tokens(&self) -> impl Iterator<Item = &Word> {
        self.words.iter().skip(1)
    }

    pub fn tokens_mut(&mut self) -> impl Iterator<Item = &mut Word> {
        self.words.iter_mut().skip(1)
    }

    pub fn word(&self, position: usize) -> Option<&Word> {
        self.words.get(position)
    }

    pub fn word_mut(&mut self, position: usize) -> Option<&mut Word> {
        self.words.get_mut(position)
    }

    pub fn heads(&self) -> &[usize] {
        &self.heads
    }

    pub fn deprels(&self) -> &[String] {
        &self.deprels
    }

    /// Head of the token at `position`. `None` for the root and for
    /// positions past the end.
    pub fn head_of(&self, position: usize) -> Option<usize> {
        position
            .checked_sub(1)
            .and_then(|i| self.heads.get(i))
            .copied()
    }

    pub fn deprel_of(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.deprels.get(i))
            .map(String::as_str)
    }

    /// Positions whose head is `position`, in sentence order.
    pub fn dependents_of(&self, position: usize) -> Vec<usize> {
        self.heads
            .iter()
            .enumerate()
            .filter(|(_, head)| **head == position)
            .map(|(i, _)| i + 1)
            .collect()
    }

    /// Replace the dependency arrays after validating them.
    ///
    /// Both arrays must have one entry per token, every head must be in
    /// `0..=token_count()`, and no token may head itself. On error the
    /// sentence is left unchanged.
    pub fn set_heads_and_deprels(&mut self, heads: Vec<usize>, deprels: Vec<String>) -> Result<()> {
        let n = self.token_count();
        check_len("heads", n, heads.len())?;
        check_len("deprels", n, deprels.len())?;

        for (i, &head) in heads.iter().enumerate() {
            let position = i + 1;
            if head > n {
                return Err(Error::HeadOutOfRange {
                    position,
                    head,
                    token_count: n,
                });
            }
            if head == position {
                return Err(Error::SelfLoop { position });
            }
        }

        self.heads = heads;
        self.deprels = deprels;
        Ok(())
    }

    /// Mark `position` as a predicate and return its marker.
    ///
    /// Idempotent: marking an existing predicate returns the existing marker
    /// with its sense and arguments intact.
    pub fn make_predicate(&mut self, position: usize) -> Result<&mut Predicate> {
        let word = self.token_mut("marked as predicate", position)?;
        Ok(word.mark_predicate())
    }

    /// Mark `position` as a predicate with the given sense.
    pub fn set_sense(&mut self, position: usize, sense: impl Into<String>) -> Result<()> {
        self.make_predicate(position)?.set_sense(sense);
        Ok(())
    }

    /// Predicate words in sentence order.
    pub fn predicates(&self) -> impl Iterator<Item = &Word> {
        self.tokens().filter(|w| w.is_predicate())
    }

    pub fn predicate_positions(&self) -> Vec<usize> {
        self.predicates().map(Word::position).collect()
    }

    /// Surface forms joined by single spaces.
    pub fn text(&self) -> String {
        self.tokens().map(Word::form).collect::<Vec<_>>().join(" ")
    }

    fn token_mut(&mut self, action: &'static str, position: usize) -> Result<&mut Word> {
        if position == 0 {
            return Err(Error::RootPosition { action });
        }
        let token_count = self.token_count();
        self.words
            .get_mut(position)
            .ok_or(Error::NoSuchPosition {
                position,
                token_count,
            })
    }
}

impl<'a> IntoIterator for &'a Sentence {
    type Item = &'a Word;
    type IntoIter = std::slice::Iter<'a, Word>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

fn check_len(column: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::LengthMismatch {
            column,
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dogs_run_fast() -> Sentence {
        Sentence::from_columns(
            &["Dogs", "run", "fast"],
            &["dog", "run", "fast"],
            &["NNS", "VBP", "RB"],
            &["_", "_", "_"],
        )
        .unwrap()
    }

    #[test]
    fn root_is_inserted() {
        let sentence = dogs_run_fast();
        assert_eq!(sentence.token_count(), 3);
        assert_eq!(sentence.words().len(), 4);
        assert!(sentence.word(0).unwrap().is_root());
        assert_eq!(sentence.word(2).unwrap().form(), "run");
        assert_eq!(sentence.word(2).unwrap().position(), 2);
    }

    #[test]
    fn heads_and_deprels_round_trip() {
        let mut sentence = dogs_run_fast();
        sentence
            .set_heads_and_deprels(
                vec![2, 0, 2],
                vec!["nsubj".into(), "root".into(), "advmod".into()],
            )
            .unwrap();

        assert_eq!(sentence.heads(), &[2, 0, 2]);
        assert_eq!(sentence.head_of(1), Some(2));
        assert_eq!(sentence.head_of(0), None);
        assert_eq!(sentence.deprel_of(3), Some("advmod"));
        assert_eq!(sentence.dependents_of(2), vec![1, 3]);
        assert_eq!(sentence.dependents_of(0), vec![2]);
    }

    #[test]
    fn head_out_of_range_is_rejected() {
        let mut sentence = dogs_run_fast();
        let err = sentence
            .set_heads_and_deprels(vec![2, 0, 4], vec!["a".into(), "b".into(), "c".into()])
            .unwrap_err();
        assert_eq!(
            err,
            Error::HeadOutOfRange {
                position: 3,
                head: 4,
                token_count: 3
            }
        );
        // unchanged
        assert_eq!(sentence.heads(), &[0, 0, 0]);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let mut sentence = dogs_run_fast();
        let err = sentence
            .set_heads_and_deprels(vec![2, 0], vec!["a".into(), "b".into()])
            .unwrap_err();
        assert!(matches!(err, Error::LengthMismatch { column: "heads", .. }));
    }

    #[test]
    fn self_loop_is_rejected() {
        let mut sentence = dogs_run_fast();
        let err = sentence
            .set_heads_and_deprels(vec![1, 0, 2], vec!["a".into(), "b".into(), "c".into()])
            .unwrap_err();
        assert_eq!(err, Error::SelfLoop { position: 1 });
    }

    #[test]
    fn make_predicate_is_idempotent() {
        let mut sentence = dogs_run_fast();
        sentence.set_sense(2, "Self_motion").unwrap();
        sentence.make_predicate(2).unwrap();
        assert_eq!(sentence.predicate_positions(), vec![2]);
        assert_eq!(sentence.word(2).unwrap().sense(), Some("Self_motion"));
    }

    #[test]
    fn last_sense_wins() {
        let mut sentence = dogs_run_fast();
        sentence.set_sense(2, "Self_motion").unwrap();
        sentence.set_sense(2, "Operating_a_system").unwrap();
        assert_eq!(sentence.word(2).unwrap().sense(), Some("Operating_a_system"));
    }

    #[test]
    fn root_and_missing_positions_cannot_be_predicates() {
        let mut sentence = dogs_run_fast();
        assert!(matches!(
            sentence.make_predicate(0),
            Err(Error::RootPosition { .. })
        ));
        assert!(matches!(
            sentence.make_predicate(4),
            Err(Error::NoSuchPosition {
                position: 4,
                token_count: 3
            })
        ));
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let err = Sentence::from_columns(&["a", "b"], &["a"], &["X", "Y"], &["_", "_"]).unwrap_err();
        assert_eq!(
            err,
            Error::LengthMismatch {
                column: "lemmas",
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn text_skips_root() {
        assert_eq!(dogs_run_fast().text(), "Dogs run fast");
    }
}
