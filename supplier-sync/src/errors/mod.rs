//! Error types for the supplier sync pipeline.
//!
//! Every variant here is fatal for a run. Failures that are contained
//! (a child table that stays unavailable, a rejected upload) never become a
//! `PipelineError`; they are logged and folded into the run report.

use thiserror::Error;

/// Errors that abort a sync run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The source token exchange failed or returned no token.
    #[error("Auth error: {0}")]
    AuthError(String),

    /// A top-level supplier page could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The durable cutoff could not be read or written.
    #[error("Cutoff error: {0}")]
    CutoffError(String),

    /// The index side could not be set up.
    #[error("Loader error: {0}")]
    LoaderError(String),
}

impl PipelineError {
    /// Create an auth error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a cutoff error.
    pub fn cutoff(msg: impl Into<String>) -> Self {
        Self::CutoffError(msg.into())
    }

    /// Create a loader error.
    pub fn loader(msg: impl Into<String>) -> Self {
        Self::LoaderError(msg.into())
    }
}

impl From<supplier_sync_repository::IndexError> for PipelineError {
    fn from(err: supplier_sync_repository::IndexError) -> Self {
        Self::LoaderError(err.to_string())
    }
}
