//! Sync mode selection.

use std::fmt;

/// Which suppliers a run pushes to the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Every supplier returned by the source.
    Full,
    /// Only suppliers modified after the stored cutoff.
    Incremental,
}

impl SyncMode {
    /// Parse a mode name, case-insensitive.
    ///
    /// Accepts "full"/"all" and "incremental"/"modified"/"updated".
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "full" | "all" => Some(Self::Full),
            "incremental" | "modified" | "updated" => Some(Self::Incremental),
            _ => None,
        }
    }

    /// Returns true for incremental runs.
    pub fn is_incremental(&self) -> bool {
        matches!(self, Self::Incremental)
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Incremental => write!(f, "incremental"),
        }
    }
}
