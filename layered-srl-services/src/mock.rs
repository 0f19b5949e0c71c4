//! In-memory stand-ins for the parser services.
//!
//! Replies are keyed by sentence text (forms joined by single spaces), which
//! both mocks recover from the request they receive, so a test can script a
//! sentence without knowing the exact wire request.

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::dependency::DependencyParser;
use crate::error::{ServiceError, ServiceResult};
use crate::frame::FrameParser;

const MOCK_ADDRESS: &str = "mock";

/// What a mock service does for one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Answer with this raw text
    Respond(String),
    /// Fail with a protocol error carrying this reason
    Protocol(String),
    /// Fail as if the service could not be reached
    Unreachable,
}

#[derive(Debug, Default)]
struct MockTable {
    replies: HashMap<String, MockReply>,
    fallback: Option<MockReply>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl MockTable {
    async fn answer(&self, key: String, request: &str) -> ServiceResult<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.to_string());
        }

        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }

        match self.replies.get(&key).or(self.fallback.as_ref()) {
            Some(MockReply::Respond(text)) => Ok(text.clone()),
            Some(MockReply::Protocol(reason)) => Err(ServiceError::Protocol {
                address: MOCK_ADDRESS.to_string(),
                reason: reason.clone(),
            }),
            Some(MockReply::Unreachable) => Err(ServiceError::Connect {
                address: MOCK_ADDRESS.to_string(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "mock service unreachable"),
            }),
            None => Err(ServiceError::Protocol {
                address: MOCK_ADDRESS.to_string(),
                reason: format!("no reply scripted for {:?}", key),
            }),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

/// Sentence text of a dependency request: `form_tag` pairs with the tags cut.
fn dependency_key(request: &str) -> String {
    request
        .split_whitespace()
        .map(|pair| pair.rsplit_once('_').map_or(pair, |(form, _)| form))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Sentence text of a frame request: the form column of each record.
fn frame_key(request: &str) -> String {
    request
        .lines()
        .filter_map(|record| record.split('\t').nth(1))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scripted dependency parser.
#[derive(Debug, Default)]
pub struct MockDependencyParser {
    table: MockTable,
}

impl MockDependencyParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `sentence` with a raw response.
    pub fn respond(mut self, sentence: &str, raw: impl Into<String>) -> Self {
        self.table
            .replies
            .insert(sentence.to_string(), MockReply::Respond(raw.into()));
        self
    }

    /// Answer `sentence` with one record per `(head, deprel)` arc, in the
    /// ten-column layout the real parser writes.
    pub fn respond_with_arcs(self, sentence: &str, arcs: &[(usize, &str)]) -> Self {
        let forms: Vec<&str> = sentence.split_whitespace().collect();
        let mut raw = String::new();
        for (i, (head, deprel)) in arcs.iter().enumerate() {
            let form = forms.get(i).copied().unwrap_or("_");
            raw.push_str(&format!(
                "{}\t{}\t_\t_\t_\t_\t{}\t{}\t-\t-\n",
                i + 1,
                form,
                head,
                deprel
            ));
        }
        self.respond(sentence, raw)
    }

    pub fn reply(mut self, sentence: &str, reply: MockReply) -> Self {
        self.table.replies.insert(sentence.to_string(), reply);
        self
    }

    /// Reply used for sentences with nothing scripted.
    pub fn otherwise(mut self, reply: MockReply) -> Self {
        self.table.fallback = Some(reply);
        self
    }

    /// Hold the answer for `sentence` back by `delay`.
    pub fn delay(mut self, sentence: &str, delay: Duration) -> Self {
        self.table.delays.insert(sentence.to_string(), delay);
        self
    }

    /// Requests received so far, in arrival order.
    pub fn calls(&self) -> Vec<String> {
        self.table.calls()
    }
}

#[async_trait]
impl DependencyParser for MockDependencyParser {
    async fn parse(&self, request: &str) -> ServiceResult<String> {
        self.table.answer(dependency_key(request), request).await
    }
}

/// Scripted frame-semantic parser.
#[derive(Debug, Default)]
pub struct MockFrameParser {
    table: MockTable,
}

impl MockFrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser that finds no frames in any sentence.
    pub fn empty() -> Self {
        Self::new().otherwise(MockReply::Respond(json!({ "frames": [] }).to_string()))
    }

    pub fn respond(mut self, sentence: &str, raw: impl Into<String>) -> Self {
        self.table
            .replies
            .insert(sentence.to_string(), MockReply::Respond(raw.into()));
        self
    }

    /// Answer `sentence` with one frame per `(frame, start)` target.
    pub fn respond_with_targets(self, sentence: &str, targets: &[(&str, usize)]) -> Self {
        let frames: Vec<_> = targets
            .iter()
            .map(|(name, start)| {
                json!({
                    "target": {
                        "name": name,
                        "spans": [{ "start": start, "end": start + 1 }]
                    },
                    "annotationSets": []
                })
            })
            .collect();
        let raw = json!({ "frames": frames }).to_string();
        self.respond(sentence, raw)
    }

    pub fn reply(mut self, sentence: &str, reply: MockReply) -> Self {
        self.table.replies.insert(sentence.to_string(), reply);
        self
    }

    pub fn otherwise(mut self, reply: MockReply) -> Self {
        self.table.fallback = Some(reply);
        self
    }

    pub fn delay(mut self, sentence: &str, delay: Duration) -> Self {
        self.table.delays.insert(sentence.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.table.calls()
    }
}

#[async_trait]
impl FrameParser for MockFrameParser {
    async fn parse(&self, normalized_parse: &str) -> ServiceResult<String> {
        self.table
            .answer(frame_key(normalized_parse), normalized_parse)
            .await
    }
}
