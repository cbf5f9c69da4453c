//! Configuration types for the Graph provider.

/// Default Microsoft Graph endpoint.
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com";

/// Default Azure AD login endpoint.
pub const DEFAULT_LOGIN_BASE_URL: &str = "https://login.microsoftonline.com";

/// Graph API version used for external item requests.
pub const GRAPH_API_VERSION: &str = "v1.0";

/// Connection settings for the Graph provider.
///
/// The credentials belong to an app registration with
/// `ExternalItem.ReadWrite.OwnedBy` (or `.All`) application permission.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Directory (tenant) id. Also used as the value of the everyone ACL.
    pub tenant_id: String,
    /// Application (client) id.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
    /// Graph endpoint, without version.
    pub graph_base_url: String,
    /// Login endpoint used for the client-credentials exchange.
    pub login_base_url: String,
}

impl GraphConfig {
    /// Create a config pointing at the public Graph and login endpoints.
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            graph_base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            login_base_url: DEFAULT_LOGIN_BASE_URL.to_string(),
        }
    }

    /// Override the Graph and login endpoints (national clouds, test servers).
    pub fn with_endpoints(
        mut self,
        graph_base_url: impl Into<String>,
        login_base_url: impl Into<String>,
    ) -> Self {
        self.graph_base_url = graph_base_url.into();
        self.login_base_url = login_base_url.into();
        self
    }

    /// Token endpoint for this tenant.
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.login_base_url.trim_end_matches('/'),
            self.tenant_id
        )
    }

    /// Scope requested for Graph application permissions.
    ///
    /// Always the public Graph resource, independent of `graph_base_url`.
    pub fn scope(&self) -> String {
        format!("{}/.default", DEFAULT_GRAPH_BASE_URL)
    }
}
