//! Frame-semantic parser adapter.
//!
//! The frame parser receives the normalized dependency parse and answers
//! with JSON describing the frame-evoking targets it found:
//!
//! ```json
//! {"frames": [{"target": {"name": "Self_motion",
//!                         "spans": [{"start": 1, "end": 2, "text": "run"}]},
//!              "annotationSets": []}],
//!  "tokens": ["Dogs", "run", "fast"]}
//! ```
//!
//! Only the frame name and the 0-based start token of the first span are
//! used. Each target marks token `start + 1` as a predicate.

use async_trait::async_trait;
use layered_srl::Sentence;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ServiceEndpoint;
use crate::error::{ResponseError, ServiceResult};
use crate::socket::SocketClient;

static TARGET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{"target":\{"name":"([A-Za-z_]*)","spans":\[\{"start":([0-9]*),""#)
        .expect("target pattern compiles")
});

/// A frame-evoking target: frame name and 0-based start token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTarget {
    pub frame: String,
    pub start: usize,
}

impl FrameTarget {
    pub fn new(frame: impl Into<String>, start: usize) -> Self {
        Self {
            frame: frame.into(),
            start,
        }
    }
}

/// A service that finds frame targets in a dependency-parsed sentence.
#[async_trait]
pub trait FrameParser: Send + Sync {
    async fn parse(&self, normalized_parse: &str) -> ServiceResult<String>;
}

/// Frame parser reached over a socket.
#[derive(Debug, Clone)]
pub struct SocketFrameParser {
    client: SocketClient,
}

impl SocketFrameParser {
    pub fn new(endpoint: ServiceEndpoint) -> Self {
        Self {
            client: SocketClient::new(endpoint),
        }
    }
}

#[async_trait]
impl FrameParser for SocketFrameParser {
    async fn parse(&self, normalized_parse: &str) -> ServiceResult<String> {
        self.client.round_trip(normalized_parse).await
    }
}

/// Pull `(frame, start)` pairs out of a frame parser response.
///
/// The response may be one JSON document or several concatenated ones.
/// Every object with a `target` holding a string `name` and a first span
/// with an integer `start` contributes a pair, in document order. Text that
/// is not JSON at all is scanned for the literal target prefix instead.
/// Finding nothing is not an error.
pub fn extract_targets(response: &str) -> Vec<FrameTarget> {
    let documents: Result<Vec<Value>, _> = serde_json::Deserializer::from_str(response)
        .into_iter::<Value>()
        .collect();

    match documents {
        Ok(documents) => {
            let mut targets = Vec::new();
            for document in &documents {
                collect_targets(document, &mut targets);
            }
            targets
        }
        Err(e) => {
            debug!("frame response is not JSON ({}), scanning for targets", e);
            scan_targets(response)
        }
    }
}

fn collect_targets(value: &Value, targets: &mut Vec<FrameTarget>) {
    match value {
        Value::Object(map) => {
            if let Some(target) = map.get("target").and_then(read_target) {
                targets.push(target);
            }
            for child in map.values() {
                collect_targets(child, targets);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_targets(item, targets);
            }
        }
        _ => {}
    }
}

fn read_target(target: &Value) -> Option<FrameTarget> {
    let name = target.get("name")?.as_str()?;
    let start = target
        .get("spans")?
        .as_array()?
        .first()?
        .get("start")?
        .as_u64()?;
    Some(FrameTarget::new(name, usize::try_from(start).ok()?))
}

fn scan_targets(response: &str) -> Vec<FrameTarget> {
    TARGET_PATTERN
        .captures_iter(response)
        .filter_map(|caps| {
            let start = caps.get(2)?.as_str().parse().ok()?;
            Some(FrameTarget::new(caps.get(1)?.as_str(), start))
        })
        .collect()
}

/// Sentence position a target marks: its 0-based start plus one.
///
/// `None` when the start is too large to have a position.
pub fn target_position(target: &FrameTarget) -> Option<usize> {
    target.start.checked_add(1)
}

/// Mark every target's position as a predicate carrying the frame as sense.
///
/// A later target at the same position overwrites the earlier sense. If any
/// target falls past the last token the sentence is left untouched.
/// Returns the number of targets applied.
pub fn apply_targets(sentence: &mut Sentence, targets: &[FrameTarget]) -> Result<usize, ResponseError> {
    let token_count = sentence.token_count();
    let out_of_range = |target: &FrameTarget| ResponseError::TargetOutOfRange {
        frame: target.frame.clone(),
        start: target.start,
        token_count,
    };

    let positions: Vec<Option<usize>> = targets.iter().map(target_position).collect();
    if let Some((target, _)) = targets
        .iter()
        .zip(&positions)
        .find(|(_, position)| position.map_or(true, |p| p > token_count))
    {
        warn!(
            frame = %target.frame,
            start = target.start,
            token_count,
            "frame target past end of sentence"
        );
        return Err(out_of_range(target));
    }

    for (target, position) in targets.iter().zip(positions) {
        let position = position.ok_or_else(|| out_of_range(target))?;
        sentence
            .set_sense(position, target.frame.as_str())
            .map_err(|_| out_of_range(target))?;
    }
    Ok(targets.len())
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
    fn test_structured_extraction() {
        let response = r#"{"frames":[
            {"target":{"name":"Self_motion","spans":[{"start":1,"end":2,"text":"run"}]},
             "annotationSets":[{"rank":0,"score":12.5,"frameElements":[]}]},
            {"target":{"name":"Speed_description","spans":[{"start":2,"end":3}]}}
        ],"tokens":["Dogs","run","fast"]}"#;

        assert_eq!(
            extract_targets(response),
            vec![
                FrameTarget::new("Self_motion", 1),
                FrameTarget::new("Speed_description", 2),
            ]
        );
    }

    #[test]
    fn test_concatenated_documents() {
        let response = "{\"frames\":[{\"target\":{\"name\":\"A\",\"spans\":[{\"start\":0}]}}]}\n\
                        {\"frames\":[{\"target\":{\"name\":\"B\",\"spans\":[{\"start\":3}]}}]}\n";
        assert_eq!(
            extract_targets(response),
            vec![FrameTarget::new("A", 0), FrameTarget::new("B", 3)]
        );
    }

    #[test]
    fn test_pattern_fallback_on_truncated_json() {
        let response = r#"{"frames":[{"target":{"name":"Self_motion","spans":[{"start":1,"end":2"#;
        assert_eq!(
            extract_targets(response),
            vec![FrameTarget::new("Self_motion", 1)]
        );
    }

    #[test]
    fn test_no_targets() {
        assert!(extract_targets(r#"{"frames":[],"tokens":[]}"#).is_empty());
        assert!(extract_targets("").is_empty());
        assert!(extract_targets("garbage").is_empty());
    }

    #[test]
    fn test_target_without_spans_is_skipped() {
        let response = r#"{"frames":[{"target":{"name":"Lonely","spans":[]}}]}"#;
        assert!(extract_targets(response).is_empty());
    }

    #[test]
    fn test_apply_marks_start_plus_one() {
        let mut sentence = dogs_run_fast();
        let applied = apply_targets(&mut sentence, &[FrameTarget::new("Self_motion", 1)]).unwrap();

        assert_eq!(applied, 1);
        assert_eq!(sentence.predicate_positions(), vec![2]);
        assert_eq!(sentence.word(2).unwrap().sense(), Some("Self_motion"));
    }

    #[test]
    fn test_later_target_overwrites_sense() {
        let mut sentence = dogs_run_fast();
        apply_targets(
            &mut sentence,
            &[FrameTarget::new("First", 1), FrameTarget::new("Second", 1)],
        )
        .unwrap();

        assert_eq!(sentence.predicate_positions(), vec![2]);
        assert_eq!(sentence.word(2).unwrap().sense(), Some("Second"));
    }

    #[test]
    fn test_out_of_range_target_leaves_sentence_untouched() {
        let mut sentence = dogs_run_fast();
        let err = apply_targets(
            &mut sentence,
            &[FrameTarget::new("Self_motion", 1), FrameTarget::new("Beyond", 3)],
        )
        .unwrap_err();

        assert!(matches!(err, ResponseError::TargetOutOfRange { start: 3, token_count: 3, .. }));
        assert!(sentence.predicate_positions().is_empty());
    }

    #[test]
    fn test_huge_start_is_out_of_range() {
        let response = r#"{"frames":[{"target":{"name":"X","spans":[{"start":18446744073709551615}]}}]}"#;
        let targets = extract_targets(response);
        assert_eq!(targets, vec![FrameTarget::new("X", usize::MAX)]);
        assert_eq!(target_position(&targets[0]), None);

        let mut sentence = dogs_run_fast();
        let err = apply_targets(&mut sentence, &targets).unwrap_err();
        assert!(matches!(err, ResponseError::TargetOutOfRange { start: usize::MAX, token_count: 3, .. }));
        assert!(sentence.predicate_positions().is_empty());
    }

    #[test]
    fn test_huge_start_through_pattern_fallback() {
        let response = r#"{"target":{"name":"X","spans":[{"start":18446744073709551615,"end""#;
        let targets = extract_targets(response);
        assert_eq!(targets, vec![FrameTarget::new("X", usize::MAX)]);

        let mut sentence = dogs_run_fast();
        assert!(apply_targets(&mut sentence, &targets).is_err());

        // too large for usize: the match is dropped
        let response = r#"{"target":{"name":"Y","spans":[{"start":99999999999999999999999,"end""#;
        assert!(extract_targets(response).is_empty());
    }

    #[test]
    fn test_negative_start_is_skipped() {
        let response = r#"{"frames":[{"target":{"name":"X","spans":[{"start":-1}]}}]}"#;
        assert!(extract_targets(response).is_empty());

        let response = r#"{"target":{"name":"X","spans":[{"start":-1,"end""#;
        assert!(extract_targets(response).is_empty());
    }
}
