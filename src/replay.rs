//! Recorded strategy streams for offline replay.
//!
//! A case is a `.toml` file naming the request to send. Recording it writes a
//! `.sse` file: one header comment line carrying the request as JSON, followed
//! by the raw response body. Comment lines have no `data: ` prefix, so the
//! header passes through the decoder unnoticed.

use std::sync::Mutex;

use bytes::Bytes;
use futures::stream;
use serde::Deserialize;

use crate::protocol::types::StrategyRequest;
use crate::transport::{ByteStream, Transport, TransportError};

/// Marks the header line of a recording.
pub const HEADER_PREFIX: &str = ": strategist-replay ";

const DEFAULT_CHUNK_SIZE: usize = 64;

/// Test case definition loaded from a `.toml` file.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub industry: String,
    pub client: String,
    pub region: String,
    /// Bytes per chunk when replaying. Small values split lines and
    /// multi-byte characters across chunks.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl TestCase {
    pub fn request(&self) -> StrategyRequest {
        StrategyRequest::new(&self.industry, &self.client, &self.region)
    }
}

/// First line of a recording.
pub fn header_line(request: &StrategyRequest) -> serde_json::Result<String> {
    Ok(format!("{HEADER_PREFIX}{}\n", serde_json::to_string(request)?))
}

/// Request recorded in a header line, if `line` is one.
pub fn parse_header(line: &str) -> Option<StrategyRequest> {
    let json = line.trim_end().strip_prefix(HEADER_PREFIX)?;
    serde_json::from_str(json).ok()
}

/// Serves a recorded body in fixed-size chunks, or a canned failure.
pub struct ReplayTransport {
    body: Result<Bytes, TransportError>,
    chunk_size: usize,
    requests: Mutex<Vec<StrategyRequest>>,
}

impl ReplayTransport {
    pub fn new(body: impl Into<Bytes>, chunk_size: usize) -> Self {
        Self {
            body: Ok(body.into()),
            chunk_size: chunk_size.max(1),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A transport whose every `open` fails with `error`.
    pub fn failing(error: TransportError) -> Self {
        Self {
            body: Err(error),
            chunk_size: DEFAULT_CHUNK_SIZE,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<StrategyRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Transport for ReplayTransport {
    async fn open(&self, request: &StrategyRequest) -> Result<ByteStream, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let body = self.body.clone()?;
        let chunks: Vec<Result<Bytes, TransportError>> = (0..body.len())
            .step_by(self.chunk_size)
            .map(|start| {
                let end = (start + self.chunk_size).min(body.len());
                Ok(body.slice(start..end))
            })
            .collect();
        Ok(Box::pin(stream::iter(chunks)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures::StreamExt as _;

    use super::*;

    #[test]
    fn header_round_trips_through_comment_line() {
        let request = StrategyRequest::new("AI Sales Strategist for Legal", "Clifford", "UK");
        let line = header_line(&request).unwrap();
        assert!(line.starts_with(": "));
        assert_eq!(parse_header(&line), Some(request));
        assert_eq!(parse_header("data: {}"), None);
    }

    #[test]
    fn case_defaults_chunk_size() {
        let case: TestCase =
            toml::from_str("industry = \"x\"\nclient = \"c\"\nregion = \"r\"\n").unwrap();
        assert_eq!(case.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(case.request(), StrategyRequest::new("x", "c", "r"));
    }

    #[tokio::test]
    async fn serves_body_in_chunks() {
        let transport = ReplayTransport::new("abcdefg", 3);
        let request = StrategyRequest::new("i", "c", "r");
        let chunks: Vec<Bytes> = transport
            .open(&request)
            .await
            .unwrap()
            .map(Result::unwrap)
            .collect()
            .await;
        assert_eq!(chunks, vec!["abc", "def", "g"]);
        assert_eq!(transport.requests(), vec![request]);
    }

    #[tokio::test]
    async fn failing_transport_fails_every_open() {
        let transport = ReplayTransport::failing(TransportError::Status(503));
        let request = StrategyRequest::new("i", "c", "r");
        assert_eq!(
            transport.open(&request).await.err(),
            Some(TransportError::Status(503))
        );
    }
}
