//! # Supplier Sync Shared
//!
//! This crate defines shared data structures used across the supplier sync workspace.
//! It includes the supplier entity, projected child-table rows and the sync mode.

pub mod types;

pub use types::child_record::{json_to_text, ChildRecord, Item};
pub use types::supplier::Supplier;
pub use types::sync_mode::SyncMode;
