//! Dependency initialization and wiring for the supplier sync.

use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::loader::{LoaderConfig, SupplierLoader};
use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::processor::CollectorConfig;
use crate::source::{FusionConnector, OAuthTokenProvider};
use crate::state::FileCutoffStore;
use crate::SupplierSyncError;
use supplier_sync_repository::GraphProvider;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Build every component from `settings`.
    ///
    /// One HTTP client is shared by the source token exchange and the source
    /// connector. The Graph provider owns its own client.
    pub fn new(settings: &Settings) -> Result<Self, SupplierSyncError> {
        info!(
            supplier_url = %settings.supplier_url,
            connection_id = %settings.connection_id,
            graph_url = %settings.graph.graph_base_url,
            cutoff_file = %settings.cutoff_file.display(),
            max_suppliers = ?settings.max_suppliers,
            child_fetch_attempts = settings.child_retry.max_attempts(),
            hold_cutoff_on_upload_failure = settings.hold_cutoff_on_upload_failure,
            "Initializing dependencies"
        );

        let http_client = reqwest::Client::new();

        let token_provider =
            OAuthTokenProvider::new(http_client.clone(), settings.oracle.clone());
        let connector = FusionConnector::new(http_client);

        let graph_provider = GraphProvider::new(settings.graph.clone()).map_err(|e| {
            SupplierSyncError::config(format!("Failed to create Graph provider: {}", e))
        })?;
        let loader = SupplierLoader::new(
            Arc::new(graph_provider),
            LoaderConfig {
                connection_id: settings.connection_id.clone(),
                supplier_url: settings.supplier_url.clone(),
                icon_url: settings.icon_url.clone(),
                tenant_id: settings.graph.tenant_id.clone(),
            },
        );

        let cutoff_store = FileCutoffStore::new(settings.cutoff_file.clone());

        let mut collector = CollectorConfig::new(settings.supplier_url.clone());
        collector.max_suppliers = settings.max_suppliers;
        collector.child_retry = settings.child_retry;

        let mut config = OrchestratorConfig::new(collector);
        config.hold_cutoff_on_upload_failure = settings.hold_cutoff_on_upload_failure;

        let orchestrator = Orchestrator::new(
            Arc::new(token_provider),
            Arc::new(connector),
            loader,
            Arc::new(cutoff_store),
            config,
        );

        Ok(Self { orchestrator })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_graph_url_is_config_error() {
        let vars = [
            ("ORACLE_CLIENT_ID", "c"),
            ("ORACLE_CLIENT_SECRET", "s"),
            ("ORACLE_SCOPE", "scope"),
            ("ORACLE_ACCESS_TOKEN_URL", "https://idcs.example.com/token"),
            ("ORACLE_SUPPLIER_URL", "https://erp.example.com/suppliers"),
            ("GRAPH_TENANT_ID", "t"),
            ("GRAPH_CLIENT_ID", "c"),
            ("GRAPH_CLIENT_SECRET", "s"),
            ("GRAPH_CONNECTION_ID", "conn"),
            ("GRAPH_BASE_URL", "not a url"),
        ];
        let settings = Settings::from_lookup(|key| {
            vars.iter().find(|(k, _)| *k == key).map(|(_, v)| v.to_string())
        })
        .unwrap();

        assert!(matches!(
            Dependencies::new(&settings),
            Err(SupplierSyncError::ConfigError(_))
        ));
    }
}
