//! Supplier collection: page the supplier list, filter, build documents.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use supplier_sync_shared::types::supplier::{
    BUSINESS_RELATIONSHIP_FIELD, LAST_UPDATE_DATE_FIELD, STATUS_FIELD, SUPPLIER_ID_FIELD,
    SUPPLIER_NAME_FIELD, TAX_ORGANIZATION_TYPE_FIELD,
};
use supplier_sync_shared::{Item, Supplier};
use tracing::{debug, info, instrument, warn};

use crate::errors::PipelineError;
use crate::processor::DocumentRenderer;
use crate::source::{ChildTable, ChildTableFetcher, PageStep, Pager, PagerQuery, RestSource, RetryPolicy};

/// Configuration for the supplier collector.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Supplier list endpoint. Child tables live under `<supplier_url>/<id>/child/`.
    pub supplier_url: String,
    /// Stop paging once the offset reaches this many suppliers.
    pub max_suppliers: Option<usize>,
    /// Retry policy for child-table pages.
    pub child_retry: RetryPolicy,
}

impl CollectorConfig {
    pub fn new(supplier_url: impl Into<String>) -> Self {
        Self {
            supplier_url: supplier_url.into(),
            max_suppliers: None,
            child_retry: RetryPolicy::default(),
        }
    }
}

/// Collects suppliers with their rendered documents.
pub struct SupplierCollector {
    source: Arc<dyn RestSource>,
    child_tables: ChildTableFetcher,
    renderer: DocumentRenderer,
    config: CollectorConfig,
}

impl SupplierCollector {
    pub fn new(source: Arc<dyn RestSource>, config: CollectorConfig) -> Self {
        Self {
            child_tables: ChildTableFetcher::new(source.clone(), config.child_retry),
            source,
            renderer: DocumentRenderer::new(),
            config,
        }
    }

    /// Fields requested from the supplier list.
    fn query(incremental: bool) -> PagerQuery {
        let mut fields = vec![
            SUPPLIER_ID_FIELD,
            SUPPLIER_NAME_FIELD,
            STATUS_FIELD,
            BUSINESS_RELATIONSHIP_FIELD,
            TAX_ORGANIZATION_TYPE_FIELD,
        ];
        if !incremental {
            return PagerQuery::fields(fields.as_slice());
        }
        fields.push(LAST_UPDATE_DATE_FIELD);
        PagerQuery::fields(fields.as_slice()).order_by_desc(LAST_UPDATE_DATE_FIELD)
    }

    /// Collect every qualifying supplier, in source order.
    ///
    /// With `modified_after` set, only suppliers whose last update is strictly
    /// later are kept, and every item is checked (no early stop on ordering).
    /// Without it, every supplier is kept.
    ///
    /// A supplier page that cannot be parsed aborts collection with a
    /// `ParseError`. Any other page failure ends paging and keeps what was
    /// collected.
    #[instrument(skip(self), fields(supplier_url = %self.config.supplier_url))]
    pub async fn collect(
        &self,
        modified_after: Option<DateTime<Utc>>,
    ) -> Result<Vec<Supplier>, PipelineError> {
        let mut pager = Pager::new(
            self.source.clone(),
            self.config.supplier_url.clone(),
            Self::query(modified_after.is_some()),
        );
        let mut suppliers = Vec::new();

        loop {
            if let Some(max) = self.config.max_suppliers {
                if pager.cursor().offset >= max {
                    info!(max_suppliers = max, "Supplier cap reached, stopping");
                    break;
                }
            }

            let offset = pager.cursor().offset;
            let items = match pager.next_batch().await {
                PageStep::Batch(items) => items,
                PageStep::Exhausted => break,
                PageStep::Failed(e) if e.is_malformed() => {
                    return Err(PipelineError::parse(format!(
                        "Supplier page at offset {} could not be parsed: {}",
                        offset, e
                    )));
                }
                PageStep::Failed(e) => {
                    warn!(offset, error = %e, "Supplier page failed, treating as end of data");
                    break;
                }
            };

            debug!(offset, count = items.len(), "Received supplier page");

            for item in &items {
                if let Some(cutoff) = modified_after {
                    if !Self::is_modified_after(item, cutoff) {
                        continue;
                    }
                }
                let Some(supplier) = Supplier::from_item(item) else {
                    warn!(offset, "Skipping supplier without an id");
                    continue;
                };
                suppliers.push(self.enrich(supplier).await);
            }
        }

        info!(count = suppliers.len(), "Collected suppliers");
        Ok(suppliers)
    }

    /// True when the item's last update is strictly later than `cutoff`.
    ///
    /// Items without a parseable timestamp do not qualify.
    fn is_modified_after(item: &Item, cutoff: DateTime<Utc>) -> bool {
        let Some(raw) = item.get(LAST_UPDATE_DATE_FIELD).and_then(|v| v.as_str()) else {
            debug!(
                supplier_id = ?item.get(SUPPLIER_ID_FIELD),
                "Supplier has no last update date, excluded"
            );
            return false;
        };
        match parse_last_update(raw) {
            Ok(updated) => updated > cutoff,
            Err(e) => {
                warn!(
                    supplier_id = ?item.get(SUPPLIER_ID_FIELD),
                    last_update_date = raw,
                    error = %e,
                    "Unparseable last update date, excluded"
                );
                false
            }
        }
    }

    /// Fetch every child table and attach the rendered document.
    async fn enrich(&self, supplier: Supplier) -> Supplier {
        info!(supplier_id = %supplier.supplier_id, name = %supplier.name, "Collecting supplier details");

        let mut tables = HashMap::with_capacity(ChildTable::ALL.len());
        for table in ChildTable::ALL {
            let text = self
                .child_tables
                .fetch_table(&self.config.supplier_url, &supplier.supplier_id, table)
                .await;
            tables.insert(table, text);
        }

        let document = self.renderer.render_document(&supplier.name, &tables);
        supplier.with_document(document)
    }
}

/// Parse a last update timestamp. Values without an offset are taken as UTC.
fn parse_last_update(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|updated| updated.with_timezone(&Utc))
        .or_else(|e| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| naive.and_utc())
                .map_err(|_| e)
        })
}
