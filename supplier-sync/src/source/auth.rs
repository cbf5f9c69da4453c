//! Client-credentials token exchange for the source API.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::errors::PipelineError;

/// Credentials for the source authorization server.
#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
    pub token_url: String,
}

/// Produces the bearer token used for one run.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Exchange credentials for a bearer token.
    ///
    /// Any failure is an `AuthError`; callers treat it as fatal and do not retry.
    async fn access_token(&self) -> Result<String, PipelineError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// Token provider performing an OAuth2 client-credentials exchange.
///
/// Tokens are not cached; every call performs a new exchange.
pub struct OAuthTokenProvider {
    http_client: reqwest::Client,
    credentials: OAuthCredentials,
}

impl OAuthTokenProvider {
    pub fn new(http_client: reqwest::Client, credentials: OAuthCredentials) -> Self {
        Self {
            http_client,
            credentials,
        }
    }
}

#[async_trait]
impl TokenProvider for OAuthTokenProvider {
    #[instrument(skip(self), fields(token_url = %self.credentials.token_url))]
    async fn access_token(&self) -> Result<String, PipelineError> {
        let params = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "client_credentials"),
            ("scope", self.credentials.scope.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.credentials.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| PipelineError::auth(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::auth(format!(
                "Token request failed with status {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::auth(format!("Failed to parse token response: {}", e)))?;

        match token.access_token {
            Some(token) if !token.is_empty() => {
                debug!("Acquired source access token");
                Ok(token)
            }
            _ => Err(PipelineError::auth("Token response carried no access_token")),
        }
    }
}
