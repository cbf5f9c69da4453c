//! Settings read from the environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use supplier_sync_repository::config::{DEFAULT_GRAPH_BASE_URL, DEFAULT_LOGIN_BASE_URL};
use supplier_sync_repository::GraphConfig;
use supplier_sync_shared::SyncMode;
use tracing::warn;

use crate::loader::DEFAULT_ICON_URL;
use crate::source::{OAuthCredentials, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use crate::state::DEFAULT_CUTOFF_FILE;
use crate::SupplierSyncError;

/// Default delay between child-table attempts, in milliseconds.
const DEFAULT_CHILD_FETCH_RETRY_DELAY_MS: u64 = 2000;

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub oracle: OAuthCredentials,
    pub supplier_url: String,
    pub graph: GraphConfig,
    pub connection_id: String,
    pub sync_mode: SyncMode,
    pub cutoff_file: PathBuf,
    pub max_suppliers: Option<usize>,
    pub child_retry: RetryPolicy,
    pub hold_cutoff_on_upload_failure: bool,
    pub icon_url: String,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `ORACLE_CLIENT_ID`, `ORACLE_CLIENT_SECRET`, `ORACLE_SCOPE`, `ORACLE_ACCESS_TOKEN_URL`
    /// - `ORACLE_SUPPLIER_URL`: Supplier list endpoint
    /// - `GRAPH_TENANT_ID`, `GRAPH_CLIENT_ID`, `GRAPH_CLIENT_SECRET`
    /// - `GRAPH_CONNECTION_ID`: Destination connection
    ///
    /// Optional:
    /// - `SYNC_MODE`: "full" or "incremental" (default: incremental)
    /// - `CUTOFF_FILE`: Cutoff file path (default: lastuploadtime.bin)
    /// - `MAX_SUPPLIERS`: Stop paging after this many suppliers (default: unlimited)
    /// - `CHILD_FETCH_MAX_ATTEMPTS`: Attempts per child-table page (default: 3)
    /// - `CHILD_FETCH_RETRY_DELAY_MS`: Delay between attempts (default: 2000)
    /// - `HOLD_CUTOFF_ON_UPLOAD_FAILURE`: Keep the old cutoff when uploads fail (default: false)
    /// - `GRAPH_BASE_URL`, `GRAPH_LOGIN_URL`: Endpoint overrides
    /// - `ITEM_ICON_URL`: Icon shown for every item
    pub fn from_env() -> Result<Self, SupplierSyncError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns the raw value of a key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SupplierSyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| {
            get(key).ok_or_else(|| {
                SupplierSyncError::config(format!("Missing required setting {}", key))
            })
        };

        let oracle = OAuthCredentials {
            client_id: required("ORACLE_CLIENT_ID")?,
            client_secret: required("ORACLE_CLIENT_SECRET")?,
            scope: required("ORACLE_SCOPE")?,
            token_url: required("ORACLE_ACCESS_TOKEN_URL")?,
        };
        let supplier_url = required("ORACLE_SUPPLIER_URL")?;

        let graph = GraphConfig::new(
            required("GRAPH_TENANT_ID")?,
            required("GRAPH_CLIENT_ID")?,
            required("GRAPH_CLIENT_SECRET")?,
        )
        .with_endpoints(
            get("GRAPH_BASE_URL").unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_string()),
            get("GRAPH_LOGIN_URL").unwrap_or_else(|| DEFAULT_LOGIN_BASE_URL.to_string()),
        );
        let connection_id = required("GRAPH_CONNECTION_ID")?;

        let sync_mode = match get("SYNC_MODE") {
            None => SyncMode::Incremental,
            Some(raw) => SyncMode::parse(&raw).unwrap_or_else(|| {
                warn!(sync_mode = %raw, "Invalid SYNC_MODE, defaulting to 'incremental'");
                SyncMode::Incremental
            }),
        };

        let max_attempts = parse_or(
            get("CHILD_FETCH_MAX_ATTEMPTS"),
            "CHILD_FETCH_MAX_ATTEMPTS",
            DEFAULT_MAX_ATTEMPTS,
        );
        let retry_delay_ms = parse_or(
            get("CHILD_FETCH_RETRY_DELAY_MS"),
            "CHILD_FETCH_RETRY_DELAY_MS",
            DEFAULT_CHILD_FETCH_RETRY_DELAY_MS,
        );

        Ok(Self {
            oracle,
            supplier_url,
            graph,
            connection_id,
            sync_mode,
            cutoff_file: PathBuf::from(
                get("CUTOFF_FILE").unwrap_or_else(|| DEFAULT_CUTOFF_FILE.to_string()),
            ),
            max_suppliers: get("MAX_SUPPLIERS").and_then(|raw| match raw.parse::<usize>() {
                Ok(max) => Some(max),
                Err(_) => {
                    warn!(max_suppliers = %raw, "Invalid MAX_SUPPLIERS, paging without a cap");
                    None
                }
            }),
            child_retry: RetryPolicy::new(max_attempts, Duration::from_millis(retry_delay_ms)),
            hold_cutoff_on_upload_failure: get("HOLD_CUTOFF_ON_UPLOAD_FAILURE")
                .map(|raw| parse_flag(&raw))
                .unwrap_or(false),
            icon_url: get("ITEM_ICON_URL").unwrap_or_else(|| DEFAULT_ICON_URL.to_string()),
        })
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &str, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "Invalid numeric setting, using default");
            default
        }),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
