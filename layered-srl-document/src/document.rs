//! Output of the document annotator: sentences of tagged, lemmatized tokens
//! plus an optional coreference table.
//!
//! The JSON shape accepted by [`AnnotatedDocument::from_json`] is the one
//! CoreNLP's JSON outputter writes; unknown fields are ignored.
//!
//! ```json
//! {
//!   "sentences": [
//!     {"tokens": [{"word": "Dogs", "pos": "NNS", "lemma": "dog",
//!                  "characterOffsetBegin": 0, "characterOffsetEnd": 4}]}
//!   ],
//!   "corefs": {"5": [{"sentNum": 1, "headIndex": 1}]}
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::coref::CorefTable;
use crate::error::{DocumentError, DocumentResult};

/// One token as reported by the annotator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedToken {
    pub word: String,
    #[serde(rename = "pos", alias = "tag")]
    pub tag: String,
    pub lemma: String,
    #[serde(default, rename = "characterOffsetBegin", alias = "begin")]
    pub begin: Option<usize>,
    #[serde(default, rename = "characterOffsetEnd", alias = "end")]
    pub end: Option<usize>,
}

impl AnnotatedToken {
    pub fn new(word: impl Into<String>, tag: impl Into<String>, lemma: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
            lemma: lemma.into(),
            begin: None,
            end: None,
        }
    }

    pub fn with_offsets(mut self, begin: usize, end: usize) -> Self {
        self.begin = Some(begin);
        self.end = Some(end);
        self
    }
}

/// One sentence as segmented by the annotator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedSentence {
    pub tokens: Vec<AnnotatedToken>,
}

impl AnnotatedSentence {
    pub fn new(tokens: Vec<AnnotatedToken>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn words(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.word.as_str()).collect()
    }
}

/// The annotator's view of a whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    #[serde(default)]
    pub sentences: Vec<AnnotatedSentence>,
    /// Absent when the annotator found no chains or does not resolve coreference.
    #[serde(default, rename = "corefs", alias = "coref")]
    pub coref: Option<CorefTable>,
}

impl AnnotatedDocument {
    pub fn new(sentences: Vec<AnnotatedSentence>) -> Self {
        Self {
            sentences,
            coref: None,
        }
    }

    pub fn with_coref(mut self, coref: CorefTable) -> Self {
        self.coref = Some(coref);
        self
    }

    pub fn from_json(json: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a CoreNLP-style JSON annotation from disk.
    pub fn load(path: &Path) -> DocumentResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn sentence_count(&self) -> usize {
        self.sentences.len()
    }

    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(AnnotatedSentence::len).sum()
    }

    /// Lowercased surface forms, the key space of embedding lookup.
    pub fn vocabulary(&self) -> HashSet<String> {
        self.sentences
            .iter()
            .flat_map(|s| s.tokens.iter())
            .map(|t| t.word.to_lowercase())
            .collect()
    }
}

/// Segments, tags and lemmatizes raw text and resolves coreference.
#[async_trait]
pub trait DocumentAnnotator: Send + Sync {
    async fn annotate(&self, text: &str) -> DocumentResult<AnnotatedDocument>;
}

/// An annotator that hands back a document annotated ahead of time,
/// ignoring the text it is given.
#[derive(Debug, Clone)]
pub struct PreAnnotated {
    document: AnnotatedDocument,
}

impl PreAnnotated {
    pub fn new(document: AnnotatedDocument) -> Self {
        Self { document }
    }

    pub fn load(path: &Path) -> DocumentResult<Self> {
        AnnotatedDocument::load(path).map(Self::new)
    }
}

#[async_trait]
impl DocumentAnnotator for PreAnnotated {
    async fn annotate(&self, _text: &str) -> DocumentResult<AnnotatedDocument> {
        Ok(self.document.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CORENLP_JSON: &str = r#"{
        "docId": "tmp",
        "sentences": [
            {"index": 0, "tokens": [
                {"index": 1, "word": "John", "originalText": "John", "lemma": "John",
                 "characterOffsetBegin": 0, "characterOffsetEnd": 4, "pos": "NNP"},
                {"index": 2, "word": "left", "lemma": "leave", "pos": "VBD",
                 "characterOffsetBegin": 5, "characterOffsetEnd": 9}
            ]},
            {"index": 1, "tokens": [
                {"index": 1, "word": "He", "lemma": "he", "pos": "PRP"},
                {"index": 2, "word": "waved", "lemma": "wave", "pos": "VBD"}
            ]}
        ],
        "corefs": {
            "3": [
                {"id": 1, "text": "John", "sentNum": 1, "headIndex": 1, "isRepresentativeMention": true},
                {"id": 2, "text": "He", "sentNum": 2, "headIndex": 1, "isRepresentativeMention": false}
            ]
        }
    }"#;

    #[test]
    fn test_parse_corenlp_json() {
        let doc = AnnotatedDocument::from_json(CORENLP_JSON).unwrap();

        assert_eq!(doc.sentence_count(), 2);
        assert_eq!(doc.token_count(), 4);
        assert_eq!(doc.sentences[0].tokens[1].tag, "VBD");
        assert_eq!(doc.sentences[0].tokens[1].lemma, "leave");
        assert_eq!(doc.sentences[0].tokens[1].begin, Some(5));
        assert_eq!(doc.sentences[1].tokens[0].begin, None);

        let coref = doc.coref.unwrap();
        assert_eq!(coref.len(), 1);
        assert_eq!(coref.chains()[0].source_id, "3");
        assert_eq!(coref.chains()[0].mentions[1].sent_num, 2);
    }

    #[test]
    fn test_missing_and_null_corefs() {
        let missing = AnnotatedDocument::from_json(r#"{"sentences": []}"#).unwrap();
        assert!(missing.coref.is_none());

        let null = AnnotatedDocument::from_json(r#"{"sentences": [], "corefs": null}"#).unwrap();
        assert!(null.coref.is_none());
    }

    #[test]
    fn test_vocabulary_is_lowercased() {
        let doc = AnnotatedDocument::from_json(CORENLP_JSON).unwrap();
        let vocab = doc.vocabulary();
        assert!(vocab.contains("john"));
        assert!(vocab.contains("he"));
        assert!(!vocab.contains("John"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", CORENLP_JSON).unwrap();

        let doc = AnnotatedDocument::load(file.path()).unwrap();
        assert_eq!(doc.sentence_count(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = AnnotatedDocument::load(Path::new("/nonexistent/doc.json")).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }

    #[tokio::test]
    async fn test_pre_annotated_ignores_text() {
        let doc = AnnotatedDocument::from_json(CORENLP_JSON).unwrap();
        let annotator = PreAnnotated::new(doc.clone());
        let annotated = annotator.annotate("anything").await.unwrap();
        assert_eq!(annotated, doc);
    }
}
