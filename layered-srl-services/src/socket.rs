//! One-shot request/response exchange over TCP.
//!
//! Both parsers speak the same minimal protocol: the client connects,
//! writes the request followed by a newline, closes its write half and
//! reads until the server closes the connection.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::config::ServiceEndpoint;
use crate::error::{ServiceError, ServiceResult};

/// Client for a line-in, EOF-terminated-out socket service.
#[derive(Debug, Clone)]
pub struct SocketClient {
    endpoint: ServiceEndpoint,
}

impl SocketClient {
    pub fn new(endpoint: ServiceEndpoint) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    /// Send `request` and return the full response.
    ///
    /// Each attempt is bounded by the endpoint timeout. Transport failures
    /// are retried up to the endpoint's retry count; protocol errors are not.
    pub async fn round_trip(&self, request: &str) -> ServiceResult<String> {
        let attempts = self.endpoint.attempts();
        let mut attempt = 1;

        loop {
            debug!(
                address = %self.endpoint.address,
                attempt,
                attempts,
                bytes = request.len(),
                "sending request"
            );

            match self.exchange_with_deadline(request).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    warn!(
                        address = %self.endpoint.address,
                        "attempt {} of {} failed: {}",
                        attempt, attempts, err
                    );
                    sleep(self.endpoint.retry_backoff() * attempt).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn exchange_with_deadline(&self, request: &str) -> ServiceResult<String> {
        match timeout(self.endpoint.timeout(), self.exchange(request)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ServiceError::Timeout {
                address: self.endpoint.address.clone(),
                timeout_ms: self.endpoint.timeout_ms,
            }),
        }
    }

    async fn exchange(&self, request: &str) -> ServiceResult<String> {
        let address = &self.endpoint.address;
        let io_error = |source| ServiceError::Io {
            address: address.clone(),
            source,
        };

        let mut stream =
            TcpStream::connect(address.as_str())
                .await
                .map_err(|source| ServiceError::Connect {
                    address: address.clone(),
                    source,
                })?;

        stream.write_all(request.as_bytes()).await.map_err(io_error)?;
        stream.write_all(b"\n").await.map_err(io_error)?;
        stream.shutdown().await.map_err(io_error)?;

        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.map_err(io_error)?;

        String::from_utf8(response).map_err(|e| ServiceError::Protocol {
            address: address.clone(),
            reason: format!("response is not UTF-8: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::net::TcpListener;

    /// Serve `connections` exchanges, answering each request with its
    /// uppercased form.
    async fn echo_server(connections: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            for _ in 0..connections {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut request = String::new();
                socket.read_to_string(&mut request).await.unwrap();
                socket
                    .write_all(request.trim_end().to_uppercase().as_bytes())
                    .await
                    .unwrap();
            }
        });
        address
    }

    fn endpoint(address: &str) -> ServiceEndpoint {
        ServiceEndpoint::new(address)
            .with_timeout(Duration::from_millis(500))
            .with_retry_backoff(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_round_trip_reads_to_eof() {
        let address = echo_server(1).await;
        let client = SocketClient::new(endpoint(&address));

        let response = client.round_trip("dogs_NNS run_VBP").await.unwrap();
        assert_eq!(response, "DOGS_NNS RUN_VBP");
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = accepted.clone();
        tokio::spawn(async move {
            let mut held = Vec::new();
            loop {
                let (socket, _) = listener.accept().await.unwrap();
                counter.fetch_add(1, Ordering::SeqCst);
                held.push(socket);
            }
        });

        let client = SocketClient::new(
            ServiceEndpoint::new(address)
                .with_timeout(Duration::from_millis(50))
                .with_retries(1)
                .with_retry_backoff(Duration::from_millis(5)),
        );

        let err = client.round_trip("hello").await.unwrap_err();
        assert!(matches!(err, ServiceError::Timeout { timeout_ms: 50, .. }));
        assert_eq!(accepted.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_after_dropped_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            // first connection stalls past the deadline, second one answers
            let (_stalled, _) = listener.accept().await.unwrap();
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = String::new();
            socket.read_to_string(&mut request).await.unwrap();
            socket.write_all(b"ok").await.unwrap();
            tokio::time::sleep(Duration::from_secs(1)).await;
        });

        let client = SocketClient::new(
            ServiceEndpoint::new(address)
                .with_timeout(Duration::from_millis(100))
                .with_retries(1)
                .with_retry_backoff(Duration::from_millis(5)),
        );

        assert_eq!(client.round_trip("hello").await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_connection_refused_is_connect_error() {
        // bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        drop(listener);

        let client = SocketClient::new(endpoint(&address).with_retries(0));
        let err = client.round_trip("hello").await.unwrap_err();
        assert!(matches!(err, ServiceError::Connect { .. }));
    }
}
