//! # Supplier Sync
//!
//! Supplier connector - pages supplier records out of Oracle Fusion, renders
//! each supplier and its related tables into one text document, and upserts
//! the documents into a Microsoft Graph external connection.
//!
//! ## Architecture
//!
//! One run is a straight sequence with no concurrency:
//!
//! 1. **Source**: Acquires a token and pages the supplier REST API
//! 2. **Processor**: Filters suppliers and renders their documents
//! 3. **Loader**: Upserts documents into the index
//! 4. **Orchestrator**: Drives the run and advances the cutoff
//!
//! ## Modules
//!
//! - [`config`]: Settings and dependency initialization
//! - [`source`]: Token exchange, paging, retry and child tables
//! - [`processor`]: Supplier collection and document rendering
//! - [`loader`]: Index upload
//! - [`state`]: Durable cutoff storage
//! - [`orchestrator`]: Coordinates a run
//! - [`errors`]: Error types for the pipeline

pub mod config;
pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod source;
pub mod state;

pub use config::{Dependencies, Settings};
pub use errors::PipelineError;
pub use orchestrator::{Orchestrator, OrchestratorConfig, RunReport};

use thiserror::Error;

/// Errors that can occur during startup or a sync run.
#[derive(Error, Debug)]
pub enum SupplierSyncError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] PipelineError),
}

impl SupplierSyncError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
