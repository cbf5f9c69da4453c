//! HTTP client for the supplier REST API.
//!
//! [`RestSource`] is the seam every reader goes through: one call fetches one
//! page. [`FusionClient`] is the production implementation; it is built once per
//! run by a [`SourceConnector`] with that run's bearer token.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use serde::Deserialize;
use supplier_sync_shared::Item;
use thiserror::Error;
use tracing::debug;

/// Why a page could not be fetched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, reset, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The server answered 2xx but the body is not a page.
    #[error("malformed page: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a malformed-page error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// True when the response arrived but could not be understood.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }
}

/// One page request: a resource URL plus its query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl PageRequest {
    /// Value of a query parameter, if present.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// One page of results.
///
/// `items` is `None` when the response carried no item list at all, which ends
/// pagination regardless of `has_more`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Page {
    #[serde(default)]
    pub items: Option<Vec<Item>>,
    #[serde(rename = "hasMore", default)]
    pub has_more: bool,
}

/// Fetches single pages from the source API.
#[async_trait]
pub trait RestSource: Send + Sync {
    /// Issue one page request.
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError>;
}

/// Builds the per-run source client once a token is available.
pub trait SourceConnector: Send + Sync {
    /// Create a client that authenticates with `bearer_token`.
    fn connect(&self, bearer_token: String) -> Arc<dyn RestSource>;
}

/// Oracle Fusion REST client bound to one bearer token.
pub struct FusionClient {
    http_client: reqwest::Client,
    bearer_token: String,
}

impl FusionClient {
    pub fn new(http_client: reqwest::Client, bearer_token: String) -> Self {
        Self {
            http_client,
            bearer_token,
        }
    }
}

#[async_trait]
impl RestSource for FusionClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Page, FetchError> {
        debug!(url = %request.url, offset = ?request.param("offset"), "Fetching page");

        let response = self
            .http_client
            .get(&request.url)
            .query(&request.query)
            .bearer_auth(&self.bearer_token)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        serde_json::from_slice::<Page>(&body).map_err(|e| FetchError::malformed(e.to_string()))
    }
}

/// Connector producing [`FusionClient`]s over a shared HTTP client.
#[derive(Clone, Default)]
pub struct FusionConnector {
    http_client: reqwest::Client,
}

impl FusionConnector {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

impl SourceConnector for FusionConnector {
    fn connect(&self, bearer_token: String) -> Arc<dyn RestSource> {
        Arc::new(FusionClient::new(self.http_client.clone(), bearer_token))
    }
}
