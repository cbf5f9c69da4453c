//! Supplier Sync Main Entry Point
//!
//! Runs one supplier sync cycle and exits. The mode comes from `SYNC_MODE`.

use dotenv::dotenv;
use std::env;
use supplier_sync::{Dependencies, Settings, SupplierSyncError};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("supplier_sync=info,supplier_sync_repository=info"));

    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .init();

        info!(
            service_name = "supplier-sync",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with JSON format"
        );
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();

        info!(
            service_name = "supplier-sync",
            service_version = env!("CARGO_PKG_VERSION"),
            "Tracing initialized with console output"
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), SupplierSyncError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    let settings = Settings::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;

    info!(mode = %settings.sync_mode, "Starting supplier sync");

    let deps = match Dependencies::new(&settings) {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    match deps.orchestrator.run(settings.sync_mode).await {
        Ok(report) if report.is_success() => {
            info!(
                suppliers = report.suppliers_collected,
                "All suppliers uploaded to the index"
            );
            Ok(())
        }
        Ok(report) => {
            warn!(
                suppliers = report.suppliers_collected,
                failed = report.upload.failed,
                cutoff_advanced = report.cutoff_advanced,
                "Upload of suppliers encountered errors"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Supplier sync failed");
            Err(e.into())
        }
    }
}
