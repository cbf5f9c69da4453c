//! # Supplier Sync Repository
//!
//! This crate provides the trait and implementation for pushing supplier
//! documents into the search index consumed by the assistant. It includes
//! definitions for errors, the provider interface, item payload types and a
//! concrete implementation for Microsoft Graph external connections.

pub mod config;
pub mod errors;
pub mod graph;
pub mod interfaces;
pub mod types;
pub mod utils;

pub use config::GraphConfig;
pub use errors::IndexError;
pub use graph::GraphProvider;
pub use interfaces::IndexProvider;
pub use types::{
    AccessType, Acl, AclType, BatchOperationResult, BatchOperationSummary, ContentType,
    ExternalItem, ItemContent, ItemProperties,
};
pub use utils::validate_item_id;
