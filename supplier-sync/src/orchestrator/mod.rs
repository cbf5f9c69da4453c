//! Orchestrator module for the supplier sync pipeline.
//!
//! Coordinates the token provider, collector, loader and cutoff store for one run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use supplier_sync_repository::BatchOperationSummary;
use supplier_sync_shared::SyncMode;
use tracing::{error, info, instrument, warn};

use crate::errors::PipelineError;
use crate::loader::SupplierLoader;
use crate::processor::{CollectorConfig, SupplierCollector};
use crate::source::{SourceConnector, TokenProvider};
use crate::state::CutoffStore;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Settings handed to the collector built for each run.
    pub collector: CollectorConfig,
    /// Keep the previous cutoff when any upload failed.
    pub hold_cutoff_on_upload_failure: bool,
}

impl OrchestratorConfig {
    pub fn new(collector: CollectorConfig) -> Self {
        Self {
            collector,
            hold_cutoff_on_upload_failure: false,
        }
    }
}

/// Outcome of one completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mode: SyncMode,
    /// Captured before any request; becomes the next cutoff.
    pub started_at: DateTime<Utc>,
    pub suppliers_collected: usize,
    pub upload: BatchOperationSummary,
    pub cutoff_advanced: bool,
}

impl RunReport {
    /// True iff every collected supplier was uploaded.
    pub fn is_success(&self) -> bool {
        self.upload.is_success()
    }
}

/// Drives one sync run from token to cutoff.
pub struct Orchestrator {
    token_provider: Arc<dyn TokenProvider>,
    connector: Arc<dyn SourceConnector>,
    loader: SupplierLoader,
    cutoff_store: Arc<dyn CutoffStore>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(
        token_provider: Arc<dyn TokenProvider>,
        connector: Arc<dyn SourceConnector>,
        loader: SupplierLoader,
        cutoff_store: Arc<dyn CutoffStore>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            token_provider,
            connector,
            loader,
            cutoff_store,
            config,
        }
    }

    /// Run one sync cycle.
    ///
    /// A token failure, an unparseable supplier page or a cutoff store failure
    /// aborts the run before the cutoff is touched. Upload failures do not
    /// abort; they are reported in [`RunReport::upload`].
    #[instrument(skip(self), fields(mode = %mode))]
    pub async fn run(&self, mode: SyncMode) -> Result<RunReport, PipelineError> {
        let started_at = Utc::now();
        info!(started_at = %started_at, "Starting supplier sync run");

        let token = self.token_provider.access_token().await.map_err(|e| {
            error!(error = %e, "Could not acquire source token");
            e
        })?;

        let modified_after = match mode {
            SyncMode::Full => None,
            SyncMode::Incremental => {
                let cutoff = self
                    .cutoff_store
                    .load()
                    .await?
                    .unwrap_or(DateTime::<Utc>::MIN_UTC);
                info!(cutoff = %cutoff, "Collecting suppliers modified after cutoff");
                Some(cutoff)
            }
        };

        let collector =
            SupplierCollector::new(self.connector.connect(token), self.config.collector.clone());
        let suppliers = collector.collect(modified_after).await.map_err(|e| {
            error!(error = %e, "Supplier collection aborted");
            e
        })?;

        let upload = self.loader.load(&suppliers).await;

        let cutoff_advanced = if self.config.hold_cutoff_on_upload_failure && !upload.is_success() {
            warn!(
                failed = upload.failed,
                "Keeping previous cutoff so failed suppliers are retried"
            );
            false
        } else {
            self.cutoff_store.save(started_at).await?;
            true
        };

        let report = RunReport {
            mode,
            started_at,
            suppliers_collected: suppliers.len(),
            upload,
            cutoff_advanced,
        };

        info!(
            suppliers = report.suppliers_collected,
            succeeded = report.upload.succeeded,
            failed = report.upload.failed,
            cutoff_advanced = report.cutoff_advanced,
            "Supplier sync run finished"
        );

        Ok(report)
    }
}
