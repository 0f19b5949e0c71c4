//! Dependency parser adapter.
//!
//! The parser takes one sentence as space-separated `form_tag` pairs and
//! answers with one tab-separated record per token:
//!
//! ```text
//! 1	Dogs	_	NNS	NNS	_	2	nsubj	-	-
//! 2	run	_	VBP	VBP	_	0	root	-	-
//! 3	fast	_	RB	RB	_	2	advmod	-	-
//! ```
//!
//! Column 7 (index 6) is the 1-based head, column 8 (index 7) the relation.
//! Before splitting, the `-\t-` sentinel the parser writes for empty
//! projective columns is rewritten; the rewritten text is what the frame
//! parser receives.

use async_trait::async_trait;
use layered_srl_document::AnnotatedToken;
use tracing::debug;

use crate::config::ServiceEndpoint;
use crate::error::{ResponseError, ServiceResult};
use crate::socket::SocketClient;

/// Index of the head column in a response record.
pub const HEAD_COLUMN: usize = 6;
/// Index of the dependency relation column in a response record.
pub const DEPREL_COLUMN: usize = 7;

const SENTINEL: &str = "-\t-";
const SENTINEL_REPLACEMENT: &str = "_\t_\n@#";
const MARKER_WITH_TAB: &str = "@#\t";
const MARKER: &str = "@#";

/// Heads and relations for one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyParse {
    /// Response after sentinel rewriting
    pub normalized: String,
    /// `heads[i - 1]` is the head of token `i`; 0 is the root
    pub heads: Vec<usize>,
    pub deprels: Vec<String>,
}

/// A service that dependency-parses one rendered sentence.
#[async_trait]
pub trait DependencyParser: Send + Sync {
    /// Send a request built by [`render_request`] and return the raw response.
    async fn parse(&self, request: &str) -> ServiceResult<String>;
}

/// Dependency parser reached over a socket.
#[derive(Debug, Clone)]
pub struct SocketDependencyParser {
    client: SocketClient,
}

impl SocketDependencyParser {
    pub fn new(endpoint: ServiceEndpoint) -> Self {
        Self {
            client: SocketClient::new(endpoint),
        }
    }
}

#[async_trait]
impl DependencyParser for SocketDependencyParser {
    async fn parse(&self, request: &str) -> ServiceResult<String> {
        self.client.round_trip(request).await
    }
}

/// Render tokens as `form_tag` pairs joined by single spaces.
pub fn render_request(tokens: &[AnnotatedToken]) -> String {
    tokens
        .iter()
        .map(|t| format!("{}_{}", t.word, t.tag))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rewrite every `-\t-` sentinel and strip the markers the rewrite leaves.
pub fn normalize_response(raw: &str) -> String {
    raw.replace(SENTINEL, SENTINEL_REPLACEMENT)
        .replace(MARKER_WITH_TAB, "")
        .replace(MARKER, "")
}

/// Parse a raw response for a sentence of `token_count` tokens.
///
/// Blank records are ignored. The response must then hold exactly one
/// record per token, each with a head column that is an integer in
/// `0..=token_count`.
pub fn parse_dependency_response(
    raw: &str,
    token_count: usize,
) -> Result<DependencyParse, ResponseError> {
    let normalized = normalize_response(raw);

    let records: Vec<&str> = normalized
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect();

    if records.len() != token_count {
        return Err(ResponseError::RecordCount {
            expected: token_count,
            found: records.len(),
        });
    }

    let mut heads = Vec::with_capacity(token_count);
    let mut deprels = Vec::with_capacity(token_count);

    for (i, record) in records.iter().enumerate() {
        let position = i + 1;
        let columns: Vec<&str> = record.split('\t').collect();
        if columns.len() <= DEPREL_COLUMN {
            return Err(ResponseError::TooFewColumns {
                record: position,
                found: columns.len(),
                expected: DEPREL_COLUMN + 1,
            });
        }

        let raw_head = columns[HEAD_COLUMN].trim();
        let head: usize = raw_head
            .parse()
            .map_err(|_| ResponseError::NonIntegerHead {
                record: position,
                value: raw_head.to_string(),
            })?;
        if head > token_count {
            return Err(ResponseError::HeadOutOfRange {
                record: position,
                head,
                token_count,
            });
        }

        heads.push(head);
        deprels.push(columns[DEPREL_COLUMN].trim().to_string());
    }

    debug!(tokens = token_count, "parsed dependency response");

    Ok(DependencyParse {
        normalized,
        heads,
        deprels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOGS_RUN_FAST: &str = "1\tDogs\t_\tNNS\tNNS\t_\t2\tnsubj\t-\t-\n\
                                 2\trun\t_\tVBP\tVBP\t_\t0\troot\t-\t-\n\
                                 3\tfast\t_\tRB\tRB\t_\t2\tadvmod\t-\t-\n";

    #[test]
    fn test_render_request() {
        let tokens = vec![
            AnnotatedToken::new("Dogs", "NNS", "dog"),
            AnnotatedToken::new("run", "VBP", "run"),
        ];
        assert_eq!(render_request(&tokens), "Dogs_NNS run_VBP");
        assert_eq!(render_request(&[]), "");
    }

    #[test]
    fn test_sentinel_rewrite_mid_record() {
        assert_eq!(normalize_response("1\tDogs\t-\t-\tNNS"), "1\tDogs\t_\t_\nNNS");
    }

    #[test]
    fn test_sentinel_rewrite_at_line_end() {
        assert_eq!(
            normalize_response("2\troot\t-\t-\n3\tx"),
            "2\troot\t_\t_\n\n3\tx"
        );
    }

    #[test]
    fn test_text_without_sentinel_is_untouched() {
        let raw = "1\tDogs\t_\tNNS\tNNS\t_\t2\tnsubj\t_\t_";
        assert_eq!(normalize_response(raw), raw);
    }

    #[test]
    fn test_parse_dogs_run_fast() {
        let parse = parse_dependency_response(DOGS_RUN_FAST, 3).unwrap();

        assert_eq!(parse.heads, vec![2, 0, 2]);
        assert_eq!(parse.deprels, vec!["nsubj", "root", "advmod"]);
        assert!(!parse.normalized.contains("-\t-"));
        assert!(!parse.normalized.contains("@#"));
        assert!(parse.normalized.starts_with("1\tDogs\t_\tNNS\tNNS\t_\t2\tnsubj\t_\t_\n"));
    }

    #[test]
    fn test_record_count_mismatch() {
        assert_eq!(
            parse_dependency_response(DOGS_RUN_FAST, 4),
            Err(ResponseError::RecordCount {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn test_non_integer_head() {
        let raw = "1\tDogs\t_\tNNS\tNNS\t_\tX\tnsubj";
        assert_eq!(
            parse_dependency_response(raw, 1),
            Err(ResponseError::NonIntegerHead {
                record: 1,
                value: "X".into()
            })
        );
    }

    #[test]
    fn test_too_few_columns() {
        let raw = "1\tDogs\t_\tNNS";
        assert!(matches!(
            parse_dependency_response(raw, 1),
            Err(ResponseError::TooFewColumns { found: 4, .. })
        ));
    }

    #[test]
    fn test_head_out_of_range() {
        let raw = "1\tDogs\t_\tNNS\tNNS\t_\t5\tnsubj";
        assert_eq!(
            parse_dependency_response(raw, 1),
            Err(ResponseError::HeadOutOfRange {
                record: 1,
                head: 5,
                token_count: 1
            })
        );
    }

    #[test]
    fn test_empty_sentence() {
        let parse = parse_dependency_response("\n", 0).unwrap();
        assert!(parse.heads.is_empty());
    }
}
