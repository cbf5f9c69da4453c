//! Index provider trait definition.
//!
//! This module defines the abstract interface for index write operations,
//! allowing for different backend implementations and mocks in tests.

use async_trait::async_trait;
use tracing::debug;

use crate::errors::IndexError;
use crate::types::{BatchOperationSummary, ExternalItem};

/// Abstracts the index that supplier documents are pushed into.
///
/// Implementations are injected into the loader to enable dependency injection
/// and easy testing with mock implementations.
///
/// # Note on Document Creation
///
/// There is no separate create function. `upsert_item` creates the item if it
/// doesn't exist and replaces it if it does, keyed only by the item id.
#[async_trait]
pub trait IndexProvider: Send + Sync {
    /// Create or replace one item in the given connection.
    ///
    /// # Arguments
    ///
    /// * `connection_id` - The destination connection (index) identifier
    /// * `item` - The item to write
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the item was written
    /// * `Err(IndexError)` - If the item was rejected or could not be sent
    async fn upsert_item(&self, connection_id: &str, item: &ExternalItem)
        -> Result<(), IndexError>;

    /// Upsert items one at a time, in order, and summarize the outcome.
    ///
    /// A failing item never stops the loop; its error is recorded in the summary
    /// and the next item is attempted.
    async fn bulk_upsert_items(
        &self,
        connection_id: &str,
        items: &[ExternalItem],
    ) -> BatchOperationSummary {
        let mut summary = BatchOperationSummary::default();

        for item in items {
            let outcome = self.upsert_item(connection_id, item).await;
            debug!(item_id = %item.id, success = outcome.is_ok(), "Upserted item");
            summary.record(item.id.clone(), outcome);
        }

        summary
    }
}
