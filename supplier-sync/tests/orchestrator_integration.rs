//! Integration tests for the supplier sync orchestrator.
//!
//! These tests use the real Orchestrator, collector and loader but mock the
//! token provider, the source API and the index provider.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use tempfile::tempdir;

use supplier_sync::errors::PipelineError;
use supplier_sync::loader::{LoaderConfig, SupplierLoader, DEFAULT_ICON_URL};
use supplier_sync::orchestrator::{Orchestrator, OrchestratorConfig};
use supplier_sync::processor::CollectorConfig;
use supplier_sync::source::{MockRestSource, TokenProvider};
use supplier_sync::state::{CutoffStore, FileCutoffStore};
use supplier_sync_repository::{ExternalItem, IndexError, IndexProvider};
use supplier_sync_shared::SyncMode;

const SUPPLIERS: &str = "https://erp.example.com/suppliers";

// Mock token provider for testing
struct MockTokenProvider {
    token: Option<String>,
}

#[async_trait]
impl TokenProvider for MockTokenProvider {
    async fn access_token(&self) -> Result<String, PipelineError> {
        self.token
            .clone()
            .ok_or_else(|| PipelineError::auth("Mock token exchange rejected"))
    }
}

// Mock index provider recording every attempted item
struct MockIndexProvider {
    uploaded: Mutex<Vec<ExternalItem>>,
    reject: Vec<String>,
}

impl MockIndexProvider {
    fn new() -> Self {
        Self::rejecting(&[])
    }

    fn rejecting(ids: &[&str]) -> Self {
        Self {
            uploaded: Mutex::new(Vec::new()),
            reject: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn attempted_ids(&self) -> Vec<String> {
        self.uploaded
            .lock()
            .unwrap()
            .iter()
            .map(|item| item.id.clone())
            .collect()
    }
}

#[async_trait]
impl IndexProvider for MockIndexProvider {
    async fn upsert_item(&self, _connection_id: &str, item: &ExternalItem) -> Result<(), IndexError> {
        self.uploaded.lock().unwrap().push(item.clone());
        if self.reject.contains(&item.id) {
            return Err(IndexError::upsert(429, "TooManyRequests", "Throttled"));
        }
        Ok(())
    }
}

// In-memory cutoff store
#[derive(Default)]
struct MemoryCutoffStore {
    cutoff: Mutex<Option<DateTime<Utc>>>,
    saves: Mutex<usize>,
}

impl MemoryCutoffStore {
    fn at(cutoff: DateTime<Utc>) -> Self {
        Self {
            cutoff: Mutex::new(Some(cutoff)),
            saves: Mutex::new(0),
        }
    }

    fn current(&self) -> Option<DateTime<Utc>> {
        *self.cutoff.lock().unwrap()
    }

    fn saves(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

#[async_trait]
impl CutoffStore for MemoryCutoffStore {
    async fn load(&self) -> Result<Option<DateTime<Utc>>, PipelineError> {
        Ok(self.current())
    }

    async fn save(&self, cutoff: DateTime<Utc>) -> Result<(), PipelineError> {
        *self.cutoff.lock().unwrap() = Some(cutoff);
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}

struct Harness {
    source: MockRestSource,
    index: Arc<MockIndexProvider>,
    cutoff: Arc<MemoryCutoffStore>,
    orchestrator: Orchestrator,
}

fn harness(
    token: Option<&str>,
    index: MockIndexProvider,
    cutoff: MemoryCutoffStore,
    hold_cutoff_on_upload_failure: bool,
) -> Harness {
    let source = MockRestSource::new();
    let index = Arc::new(index);
    let cutoff = Arc::new(cutoff);

    let loader = SupplierLoader::new(
        index.clone(),
        LoaderConfig {
            connection_id: "oraclesuppliers".to_string(),
            supplier_url: SUPPLIERS.to_string(),
            icon_url: DEFAULT_ICON_URL.to_string(),
            tenant_id: "tenant-1".to_string(),
        },
    );

    let mut config = OrchestratorConfig::new(CollectorConfig::new(SUPPLIERS));
    config.hold_cutoff_on_upload_failure = hold_cutoff_on_upload_failure;

    let orchestrator = Orchestrator::new(
        Arc::new(MockTokenProvider {
            token: token.map(str::to_string),
        }),
        Arc::new(source.clone()),
        loader,
        cutoff.clone(),
        config,
    );

    Harness {
        source,
        index,
        cutoff,
        orchestrator,
    }
}

fn two_suppliers(source: &MockRestSource) {
    source.push_page(
        SUPPLIERS,
        json!({
            "items": [
                { "SupplierId": "A", "Supplier": "Alpha", "Status": "ACTIVE", "LastUpdateDate": "2024-02-01T00:00:00+00:00" },
                { "SupplierId": "B", "Supplier": "Beta", "Status": "INACTIVE", "LastUpdateDate": "2023-06-01T00:00:00+00:00" }
            ],
            "hasMore": false
        }),
    );
}

#[tokio::test]
async fn test_full_run_uploads_and_advances_cutoff() {
    let h = harness(Some("run-token"), MockIndexProvider::new(), MemoryCutoffStore::default(), false);
    two_suppliers(&h.source);
    h.source.push_page(
        &format!("{}/A/child/sites", SUPPLIERS),
        json!({ "items": [{ "SupplierSite": "Austin", "ProcurementBU": "US1" }], "hasMore": false }),
    );

    let before = Utc::now();
    let report = h.orchestrator.run(SyncMode::Full).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.mode, SyncMode::Full);
    assert_eq!(report.suppliers_collected, 2);
    assert_eq!(report.upload.succeeded, 2);
    assert!(report.cutoff_advanced);
    assert!(report.started_at >= before);
    assert_eq!(h.cutoff.current(), Some(report.started_at));

    assert_eq!(h.source.tokens(), vec!["run-token".to_string()]);
    assert_eq!(h.index.attempted_ids(), vec!["A", "B"]);

    let uploaded = h.index.uploaded.lock().unwrap();
    assert_eq!(uploaded[0].properties.url, format!("{}/A", SUPPLIERS));
    assert!(uploaded[0]
        .content
        .value
        .starts_with("# Supplemental information for Alpha:\n"));
    assert!(uploaded[0].content.value.contains("| Austin | US1"));
}

#[tokio::test]
async fn test_incremental_run_uses_stored_cutoff() {
    let stored = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let h = harness(Some("t"), MockIndexProvider::new(), MemoryCutoffStore::at(stored), false);
    two_suppliers(&h.source);

    let report = h.orchestrator.run(SyncMode::Incremental).await.unwrap();

    assert_eq!(report.suppliers_collected, 1);
    assert_eq!(h.index.attempted_ids(), vec!["A"]);
    assert!(h.cutoff.current().unwrap() > stored);

    let first = &h.source.requests()[0];
    assert_eq!(first.param("orderBy"), Some("LastUpdateDate:desc"));
}

#[tokio::test]
async fn test_incremental_run_without_cutoff_takes_everything_dated() {
    let h = harness(Some("t"), MockIndexProvider::new(), MemoryCutoffStore::default(), false);
    two_suppliers(&h.source);

    let report = h.orchestrator.run(SyncMode::Incremental).await.unwrap();

    assert_eq!(report.suppliers_collected, 2);
    assert!(report.cutoff_advanced);
}

#[tokio::test]
async fn test_upload_failure_still_advances_cutoff() {
    let h = harness(
        Some("t"),
        MockIndexProvider::rejecting(&["B"]),
        MemoryCutoffStore::default(),
        false,
    );
    two_suppliers(&h.source);

    let report = h.orchestrator.run(SyncMode::Full).await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.upload.failed, 1);
    assert_eq!(h.index.attempted_ids(), vec!["A", "B"]);
    assert!(report.cutoff_advanced);
    assert_eq!(h.cutoff.saves(), 1);
}

#[tokio::test]
async fn test_upload_failure_holds_cutoff_when_configured() {
    let stored = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    let h = harness(
        Some("t"),
        MockIndexProvider::rejecting(&["A"]),
        MemoryCutoffStore::at(stored),
        true,
    );
    two_suppliers(&h.source);

    let report = h.orchestrator.run(SyncMode::Incremental).await.unwrap();

    assert!(!report.is_success());
    assert!(!report.cutoff_advanced);
    assert_eq!(h.cutoff.current(), Some(stored));
    assert_eq!(h.cutoff.saves(), 0);
}

#[tokio::test]
async fn test_token_failure_aborts_before_any_request() {
    let h = harness(None, MockIndexProvider::new(), MemoryCutoffStore::default(), false);
    two_suppliers(&h.source);

    let err = h.orchestrator.run(SyncMode::Full).await.unwrap_err();

    assert!(matches!(err, PipelineError::AuthError(_)));
    assert!(h.source.requests().is_empty());
    assert!(h.index.attempted_ids().is_empty());
    assert_eq!(h.cutoff.saves(), 0);
}

#[tokio::test]
async fn test_unparseable_supplier_page_aborts_without_cutoff() {
    let h = harness(Some("t"), MockIndexProvider::new(), MemoryCutoffStore::default(), false);
    h.source
        .push_page(SUPPLIERS, json!({ "items": [{ "SupplierId": "A" }], "hasMore": true }));
    h.source.push_page(SUPPLIERS, json!({ "items": "garbage" }));

    let err = h.orchestrator.run(SyncMode::Full).await.unwrap_err();

    assert!(matches!(err, PipelineError::ParseError(_)));
    assert!(h.index.attempted_ids().is_empty());
    assert_eq!(h.cutoff.current(), None);
}

#[tokio::test]
async fn test_cutoff_file_round_trip_between_runs() {
    let dir = tempdir().unwrap();
    let store = Arc::new(FileCutoffStore::new(dir.path().join("lastuploadtime.bin")));
    let source = MockRestSource::new();
    let index = Arc::new(MockIndexProvider::new());

    let orchestrator = Orchestrator::new(
        Arc::new(MockTokenProvider {
            token: Some("t".to_string()),
        }),
        Arc::new(source.clone()),
        SupplierLoader::new(
            index.clone(),
            LoaderConfig {
                connection_id: "oraclesuppliers".to_string(),
                supplier_url: SUPPLIERS.to_string(),
                icon_url: DEFAULT_ICON_URL.to_string(),
                tenant_id: "tenant-1".to_string(),
            },
        ),
        store.clone(),
        OrchestratorConfig::new(CollectorConfig::new(SUPPLIERS)),
    );

    let first = orchestrator.run(SyncMode::Full).await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some(first.started_at));

    // Records last updated before the first run are skipped on the next incremental run
    two_suppliers(&source);
    let second = orchestrator.run(SyncMode::Incremental).await.unwrap();

    assert_eq!(second.suppliers_collected, 0);
    assert!(index.attempted_ids().is_empty());
    assert_eq!(store.load().await.unwrap(), Some(second.started_at));
}
