//! Core data structures used across the supplier sync pipeline.

pub mod child_record;
pub mod supplier;
pub mod sync_mode;

pub use child_record::ChildRecord;
pub use supplier::Supplier;
pub use sync_mode::SyncMode;
