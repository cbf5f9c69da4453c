//! Durable run state.

mod cutoff;

pub use cutoff::{CutoffStore, FileCutoffStore, DEFAULT_CUTOFF_FILE};
