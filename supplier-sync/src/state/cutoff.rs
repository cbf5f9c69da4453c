//! Durable storage for the last-run cutoff timestamp.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, info};

use crate::errors::PipelineError;

/// Default cutoff file name, relative to the working directory.
pub const DEFAULT_CUTOFF_FILE: &str = "lastuploadtime.bin";

/// Reads and writes the cutoff used by incremental runs.
#[async_trait]
pub trait CutoffStore: Send + Sync {
    /// The stored cutoff, or `None` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<DateTime<Utc>>, PipelineError>;

    /// Replace the stored cutoff.
    async fn save(&self, cutoff: DateTime<Utc>) -> Result<(), PipelineError>;
}

/// Cutoff kept as a single RFC 3339 timestamp in a text file.
#[derive(Debug, Clone)]
pub struct FileCutoffStore {
    path: PathBuf,
}

impl FileCutoffStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CutoffStore for FileCutoffStore {
    async fn load(&self) -> Result<Option<DateTime<Utc>>, PipelineError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No cutoff file");
                return Ok(None);
            }
            Err(e) => {
                return Err(PipelineError::cutoff(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let cutoff = DateTime::parse_from_rfc3339(contents.trim()).map_err(|e| {
            PipelineError::cutoff(format!(
                "Invalid timestamp in {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(Some(cutoff.with_timezone(&Utc)))
    }

    async fn save(&self, cutoff: DateTime<Utc>) -> Result<(), PipelineError> {
        let value = cutoff.to_rfc3339_opts(SecondsFormat::AutoSi, true);
        tokio::fs::write(&self.path, &value).await.map_err(|e| {
            PipelineError::cutoff(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        info!(path = %self.path.display(), cutoff = %value, "Saved cutoff");
        Ok(())
    }
}
