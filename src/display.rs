//! Text rendering of a sentence with arc and predicate markers.

use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::sentence::Sentence;

/// A label drawn under one token.
struct IncludedMark {
    position: usize,
    label: String,
}

/// Renders a sentence as a token line with annotations drawn underneath.
///
/// ```text
/// Dogs  run  fast
/// ╰──╯nsubj─>run
///       ╰─╯root─>ROOT
///            ╰──╯advmod─>run
///       ╰─╯Predicate(Self_motion)
/// ```
pub struct SentenceDisplay<'a> {
    sentence: &'a Sentence,
    include_marks: Vec<IncludedMark>,
}

impl<'a> std::fmt::Display for SentenceDisplay<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const SPACE_PADDING: usize = 2;
        // index 0 is the root and is never drawn
        let mut position_to_start_display_char_idx = vec![0];
        let mut position_to_end_display_char_idx = vec![0];

        let mut opening_line = String::new();
        {
            let mut is_first = true;
            for word in self.sentence.tokens() {
                if is_first {
                    is_first = false;
                } else {
                    opening_line.extend(std::iter::repeat(' ').take(SPACE_PADDING));
                }

                position_to_start_display_char_idx.push(UnicodeWidthStr::width(&*opening_line));
                opening_line.push_str(word.form());
                position_to_end_display_char_idx.push(UnicodeWidthStr::width(&*opening_line));
            }
        }

        f.write_str(&opening_line)?;

        for mark in self.include_marks.iter() {
            f.write_char('\n')?;

            let start_char_idx = position_to_start_display_char_idx[mark.position];
            for _ in 0..start_char_idx {
                f.write_char(' ')?;
            }

            f.write_char('╰')?;

            let end_char_idx = position_to_end_display_char_idx[mark.position];
            let char_len = end_char_idx - start_char_idx;
            for _ in (start_char_idx + 1)..end_char_idx.saturating_sub(1) {
                f.write_char('─')?;
            }

            if char_len > 1 {
                f.write_char('╯')?;
            }

            f.write_str(&mark.label)?;
        }

        Ok(())
    }
}

impl<'a> SentenceDisplay<'a> {
    pub fn new(sentence: &'a Sentence) -> Self {
        SentenceDisplay {
            sentence,
            include_marks: Vec::new(),
        }
    }

    fn push(&mut self, position: usize, label: String) {
        if position > 0 && position <= self.sentence.token_count() {
            self.include_marks.push(IncludedMark { position, label });
        }
    }

    fn form_or_root(&self, position: usize) -> &str {
        match position {
            0 => "ROOT",
            p => self.sentence.word(p).map(|w| w.form()).unwrap_or("?"),
        }
    }

    /// One mark per token: `deprel─>head form`.
    pub fn include_dependencies(&mut self) {
        for position in 1..=self.sentence.token_count() {
            let head = self.sentence.head_of(position).unwrap_or(0);
            let deprel = self.sentence.deprel_of(position).unwrap_or("_");
            let label = format!("{}─>{}", deprel, self.form_or_root(head));
            self.push(position, label);
        }
    }

    /// One mark per predicate: `Predicate(sense)`.
    pub fn include_predicates(&mut self) {
        let marks: Vec<(usize, String)> = self
            .sentence
            .predicates()
            .map(|word| {
                let label = match word.sense() {
                    Some(sense) => format!("Predicate({})", sense),
                    None => "Predicate".to_string(),
                };
                (word.position(), label)
            })
            .collect();
        for (position, label) in marks {
            self.push(position, label);
        }
    }

    /// One mark per labeled argument: `role─>predicate form`.
    pub fn include_arguments(&mut self) {
        let mut marks = Vec::new();
        for predicate in self.sentence.predicates() {
            if let Some(marker) = predicate.predicate() {
                for (&position, role) in marker.arguments() {
                    marks.push((position, format!("{}─>{}", role, predicate.form())));
                }
            }
        }
        for (position, label) in marks {
            self.push(position, label);
        }
    }

    /// One mark per coreference mention, given as (token, chain id) pairs.
    pub fn include_mentions(&mut self, mentions: &[(usize, u32)]) {
        for &(position, chain) in mentions {
            self.push(position, format!("Mention(#{})", chain));
        }
    }

    /// Takes self
    pub fn with_dependencies(mut self) -> Self {
        self.include_dependencies();
        self
    }

    /// Takes self
    pub fn with_predicates(mut self) -> Self {
        self.include_predicates();
        self
    }

    /// Takes self
    pub fn with_arguments(mut self) -> Self {
        self.include_arguments();
        self
    }

    /// Takes self
    pub fn with_mentions(mut self, mentions: &[(usize, u32)]) -> Self {
        self.include_mentions(mentions);
        self
    }
}
