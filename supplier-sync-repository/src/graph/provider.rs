//! Microsoft Graph provider implementation.
//!
//! This module provides the concrete implementation of `IndexProvider`
//! using the Graph external items API.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, error, info};
use url::Url;

use crate::config::{GraphConfig, GRAPH_API_VERSION};
use crate::errors::IndexError;
use crate::graph::auth::GraphTokenCache;
use crate::interfaces::IndexProvider;
use crate::types::ExternalItem;
use crate::utils;

/// `OData` error response from Microsoft Graph.
#[derive(Debug, Deserialize)]
struct ODataError {
    error: ODataErrorBody,
}

/// `OData` error body.
#[derive(Debug, Deserialize)]
struct ODataErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Graph external connection provider.
///
/// # Example
///
/// ```ignore
/// use supplier_sync_repository::{GraphConfig, GraphProvider, IndexProvider};
///
/// let config = GraphConfig::new("tenant-id", "client-id", "client-secret");
/// let provider = GraphProvider::new(config)?;
///
/// // Creates the item if it doesn't exist, replaces it if it does
/// provider.upsert_item("oraclesuppliers", &item).await?;
/// ```
pub struct GraphProvider {
    http_client: reqwest::Client,
    tokens: GraphTokenCache,
    base_url: Url,
}

impl GraphProvider {
    /// Create a new Graph provider.
    ///
    /// # Returns
    ///
    /// * `Ok(GraphProvider)` - A new provider instance
    /// * `Err(IndexError)` - If the Graph base URL is invalid
    pub fn new(config: GraphConfig) -> Result<Self, IndexError> {
        let base_url = Url::parse(&config.graph_base_url)
            .map_err(|e| IndexError::connection(format!("Invalid Graph URL: {}", e)))?;
        let http_client = reqwest::Client::new();

        info!(
            graph_url = %base_url,
            tenant_id = %config.tenant_id,
            "Created Graph provider"
        );

        Ok(Self {
            tokens: GraphTokenCache::new(config, http_client.clone()),
            http_client,
            base_url,
        })
    }

    /// URL of one item in a connection.
    fn item_url(&self, connection_id: &str, item_id: &str) -> Result<Url, IndexError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| IndexError::connection("Graph URL cannot be a base"))?
            .pop_if_empty()
            .extend([
                GRAPH_API_VERSION,
                "external",
                "connections",
                connection_id,
                "items",
                item_id,
            ]);
        Ok(url)
    }

    /// Map an unsuccessful Graph response to an upsert error.
    async fn rejection(response: reqwest::Response) -> IndexError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ODataError>(&body) {
            Ok(odata) => IndexError::upsert(status.as_u16(), odata.error.code, odata.error.message),
            Err(_) => IndexError::upsert(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
                body,
            ),
        }
    }
}

#[async_trait]
impl IndexProvider for GraphProvider {
    /// Create or replace an external item.
    ///
    /// A `401` response drops the cached token so the next item requests a new one.
    async fn upsert_item(
        &self,
        connection_id: &str,
        item: &ExternalItem,
    ) -> Result<(), IndexError> {
        utils::validate_item_id(&item.id)?;

        let url = self.item_url(connection_id, &item.id)?;
        let token = self.tokens.get_token().await?;

        let response = self
            .http_client
            .put(url)
            .bearer_auth(&token)
            .json(item)
            .send()
            .await
            .map_err(|e| IndexError::connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                self.tokens.invalidate().await;
            }
            let err = Self::rejection(response).await;
            error!(item_id = %item.id, error = %err, "Upsert request failed");
            return Err(err);
        }

        debug!(item_id = %item.id, status = %status, "Item upserted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Acl, ContentType, ItemContent, ItemProperties};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn item(id: &str) -> ExternalItem {
        ExternalItem {
            id: id.to_string(),
            acl: vec![Acl::everyone("tenant-1")],
            properties: ItemProperties {
                supplier_id: id.to_string(),
                supplier: format!("Supplier {}", id),
                status: "ACTIVE".to_string(),
                business_relationship: "SPEND_AUTHORIZED".to_string(),
                tax_organization_type: "CORPORATION".to_string(),
                url: format!("https://erp.example.com/suppliers/{}", id),
                icon_url: "https://cdn.example.com/icon.png".to_string(),
            },
            content: ItemContent {
                value: "body".to_string(),
                content_type: ContentType::Text,
            },
        }
    }

    async fn provider_for(server: &MockServer) -> GraphProvider {
        Mock::given(method("POST"))
            .and(path("/tenant-1/oauth2/v2.0/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "graph-token",
                "expires_in": 3600
            })))
            .mount(server)
            .await;

        let config = GraphConfig::new("tenant-1", "client", "secret")
            .with_endpoints(server.uri(), server.uri());
        GraphProvider::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_item_puts_to_item_url() {
        let server = MockServer::start().await;
        let provider = provider_for(&server).await;

        Mock::given(method("PUT"))
            .and(path("/v1.0/external/connections/suppliers/items/100"))
            .and(header("authorization", "Bearer graph-token"))
            .and(body_partial_json(json!({
                "properties": { "supplierId": "100" },
                "content": { "type": "text" }
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        provider.upsert_item("suppliers", &item("100")).await.unwrap();
    }

    #[tokio::test]
    async fn test_upsert_item_reports_odata_error() {
        let server = MockServer::start().await;
        let provider = provider_for(&server).await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": "InvalidRequest", "message": "Schema not registered" }
            })))
            .mount(&server)
            .await;

        let err = provider.upsert_item("suppliers", &item("100")).await.unwrap_err();
        match err {
            IndexError::UpsertError {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "InvalidRequest");
                assert_eq!(message, "Schema not registered");
            }
            other => panic!("Expected UpsertError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bulk_upsert_continues_after_failure() {
        let server = MockServer::start().await;
        let provider = provider_for(&server).await;

        Mock::given(method("PUT"))
            .and(path("/v1.0/external/connections/suppliers/items/A"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/v1.0/external/connections/suppliers/items/B"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/v1.0/external/connections/suppliers/items/C"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let summary = provider
            .bulk_upsert_items("suppliers", &[item("A"), item("B"), item("C")])
            .await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_success());
        assert_eq!(summary.results[1].item_id, "B");
        assert_eq!(
            summary.results[1].error.as_ref().and_then(IndexError::status),
            Some(503)
        );
    }

    #[tokio::test]
    async fn test_upsert_rejects_invalid_id_without_request() {
        let server = MockServer::start().await;
        let provider = provider_for(&server).await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = provider.upsert_item("suppliers", &item("a/b")).await.unwrap_err();
        assert!(matches!(err, IndexError::ValidationError(_)));
    }
}
