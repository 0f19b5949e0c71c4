//! Connection settings for one external service.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_RETRIES: u32 = 2;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;

/// Where a service listens and how patiently to talk to it.
///
/// Deserializes from a TOML table; only `address` is required.
///
/// ```toml
/// address = "localhost:5000"
/// timeout_ms = 10000
/// retries = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    /// `host:port`
    pub address: String,
    /// Deadline for one whole exchange (connect, write, read to EOF)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Additional attempts after the first one fails with a transport error
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Delay before the first retry; grows linearly with the attempt number
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

fn default_retry_backoff_ms() -> u64 {
    DEFAULT_RETRY_BACKOFF_MS
}

impl ServiceEndpoint {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retries: DEFAULT_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff_ms = backoff.as_millis() as u64;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Total attempts per call, the first one included.
    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let endpoint = ServiceEndpoint::new("localhost:5000");
        assert_eq!(endpoint.timeout(), Duration::from_secs(30));
        assert_eq!(endpoint.attempts(), 3);
    }

    #[test]
    fn test_builder() {
        let endpoint = ServiceEndpoint::new("localhost:5000")
            .with_timeout(Duration::from_millis(50))
            .with_retries(0)
            .with_retry_backoff(Duration::from_millis(5));

        assert_eq!(endpoint.timeout_ms, 50);
        assert_eq!(endpoint.attempts(), 1);
        assert_eq!(endpoint.retry_backoff(), Duration::from_millis(5));
    }
}
