use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt as _};
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::catalog::{self, CatalogError, IndustryCatalog};
use crate::config::Config;
use crate::protocol::types::StrategyRequest;

/// Response body as it arrives off the wire. Dropping it releases the
/// underlying connection.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send + 'static>>;

/// Network-level failures. None of these carry backend-authored messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or no response arrived.
    #[error("request failed: {0}")]
    Request(String),
    /// The server answered with a non-success status.
    #[error("server responded with status {0}")]
    Status(u16),
    /// Reading the response body failed mid-stream.
    #[error("response body failed: {0}")]
    Body(String),
}

/// Opens the strategy stream for a request.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn open(&self, request: &StrategyRequest) -> Result<ByteStream, TransportError>;
}

/// HTTP transport backed by `reqwest`.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    strategy_url: String,
    industries_url: String,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Request(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            strategy_url: config.strategy_url(),
            industries_url: config.industries_url(),
        })
    }

    /// Fetch the selectable industries from the backend.
    pub async fn fetch_industries(&self) -> Result<IndustryCatalog, CatalogError> {
        catalog::fetch(&self.client, &self.industries_url).await
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn open(&self, request: &StrategyRequest) -> Result<ByteStream, TransportError> {
        debug!(url = %self.strategy_url, industry = %request.industry, "opening strategy stream");
        let response = self
            .client
            .post(&self.strategy_url)
            .header(ACCEPT, "text/event-stream")
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| TransportError::Body(e.to_string())));
        Ok(Box::pin(body))
    }
}
