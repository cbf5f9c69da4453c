//! Processor module for the supplier sync pipeline.
//!
//! Turns supplier pages and their child tables into rendered suppliers.

mod collector;
mod renderer;

pub use collector::{CollectorConfig, SupplierCollector};
pub use renderer::DocumentRenderer;
