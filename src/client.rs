//! PLOS Search API client.
//!
//! [`PlosClient::search`] builds the request URL, issues one GET through a
//! [`Transport`] and normalizes the body. There are no retries: a transport
//! failure goes straight back to the caller.

use crate::config::Config;
use crate::error::{PlosError, Result};
use crate::normalize::{normalize_body, ArticleRecord};
use crate::query::{request_url, QueryInput};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// User agent string for requests
const USER_AGENT: &str = concat!("rustplos/", env!("CARGO_PKG_VERSION"));

/// Fetches a response body for a fully built URL.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and return the body of a 2xx response.
    async fn get(&self, url: &str) -> Result<String>;
}

/// `reqwest`-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a new HttpTransport
    ///
    /// # Arguments
    ///
    /// * `timeout_secs` - Per-request timeout
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PlosError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Search API error");
            return Err(PlosError::Api {
                code: status.as_u16(),
                message: format!("PLOS API error: {} {}", status, body.trim()),
            });
        }

        response.text().await.map_err(PlosError::Network)
    }
}

/// Search client bound to one configuration and transport.
pub struct PlosClient<T = HttpTransport> {
    config: Config,
    transport: T,
}

impl PlosClient<HttpTransport> {
    /// Create a client that talks HTTP
    pub fn new(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout_secs)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> PlosClient<T> {
    /// Create a client over a custom transport
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one search and return its documents in API order.
    ///
    /// # Errors
    ///
    /// Transport failures are returned unchanged; unreadable bodies become
    /// `MalformedResponse`.
    pub async fn search(&self, input: impl Into<QueryInput>) -> Result<Vec<ArticleRecord>> {
        let request = input.into().resolve(&self.config.api_key);
        debug!(
            q = request.get("q").unwrap_or_default(),
            rows = request.get("rows").unwrap_or("default"),
            "Making search request"
        );

        let url = request_url(&self.config.search_url, &request);
        let body = self.transport.get(&url).await?;
        let records = normalize_body(&body)?;

        debug!(count = records.len(), "Search complete");
        Ok(records)
    }
}
