//! Microsoft Graph implementation of the index provider.
//!
//! This module provides a concrete implementation of `IndexProvider`
//! that upserts items into a Graph external connection.

mod auth;
mod provider;

pub use auth::GraphTokenCache;
pub use provider::GraphProvider;
