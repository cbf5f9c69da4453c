//! Loader module for the supplier sync pipeline.
//!
//! Maps collected suppliers to index items and upserts them one at a time.

use std::sync::Arc;
use tracing::{error, info, instrument};

use supplier_sync_repository::{
    Acl, BatchOperationSummary, ContentType, ExternalItem, IndexProvider, ItemContent,
    ItemProperties,
};
use supplier_sync_shared::Supplier;

/// Icon shown next to supplier results.
pub const DEFAULT_ICON_URL: &str =
    "https://img.icons8.com/?size=100&id=1349&format=png&color=000000";

/// Configuration for the supplier loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Destination connection in the index.
    pub connection_id: String,
    /// Supplier list endpoint; item deep links are `<supplier_url>/<id>`.
    pub supplier_url: String,
    /// Static icon URL for every item.
    pub icon_url: String,
    /// Tenant granted read access to every item.
    pub tenant_id: String,
}

/// Loader that upserts suppliers into the index.
pub struct SupplierLoader {
    provider: Arc<dyn IndexProvider>,
    config: LoaderConfig,
}

impl SupplierLoader {
    /// Create a new supplier loader with the given provider.
    pub fn new(provider: Arc<dyn IndexProvider>, config: LoaderConfig) -> Self {
        Self { provider, config }
    }

    /// Build the index item for one supplier.
    pub fn to_item(&self, supplier: &Supplier) -> ExternalItem {
        ExternalItem {
            id: supplier.supplier_id.clone(),
            acl: vec![Acl::everyone(self.config.tenant_id.clone())],
            properties: ItemProperties {
                supplier_id: supplier.supplier_id.clone(),
                supplier: supplier.name.clone(),
                status: supplier.status.clone(),
                business_relationship: supplier.business_relationship.clone(),
                tax_organization_type: supplier.tax_organization_type.clone(),
                url: format!(
                    "{}/{}",
                    self.config.supplier_url.trim_end_matches('/'),
                    supplier.supplier_id
                ),
                icon_url: self.config.icon_url.clone(),
            },
            content: ItemContent {
                value: supplier.document().to_string(),
                content_type: ContentType::Text,
            },
        }
    }

    /// Upsert every supplier, in order.
    ///
    /// Every supplier is attempted; failures are logged and recorded in the
    /// returned summary.
    #[instrument(skip(self, suppliers), fields(count = suppliers.len(), connection_id = %self.config.connection_id))]
    pub async fn load(&self, suppliers: &[Supplier]) -> BatchOperationSummary {
        info!("Uploading suppliers to index");

        let items: Vec<ExternalItem> = suppliers.iter().map(|s| self.to_item(s)).collect();
        let summary = self
            .provider
            .bulk_upsert_items(&self.config.connection_id, &items)
            .await;

        if summary.is_success() {
            info!(succeeded = summary.succeeded, "All suppliers uploaded");
        } else {
            for result in summary.failures() {
                if let Some(ref err) = result.error {
                    error!(
                        supplier_id = %result.item_id,
                        status = ?err.status(),
                        error = %err,
                        "Failed to upload supplier"
                    );
                }
            }
            error!(
                total = summary.total,
                succeeded = summary.succeeded,
                failed = summary.failed,
                "Upload completed with errors"
            );
        }

        summary
    }
}
