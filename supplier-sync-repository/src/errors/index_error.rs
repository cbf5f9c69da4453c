//! Index error types.
//!
//! This module defines the unified error type for all index operations,
//! including transport failures, authentication failures and item rejections
//! reported by the backend.

use thiserror::Error;

/// Unified errors from index operations.
///
/// Used by the `IndexProvider` trait for every operation. Errors are cloneable so
/// they can be carried inside a [`crate::BatchOperationSummary`].
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    /// Validation error (e.g., empty or malformed item id).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to reach the index backend.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Failed to obtain a token for the index backend.
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// The backend rejected an upsert.
    #[error("Upsert failed with status {status}: {code} {message}")]
    UpsertError {
        status: u16,
        code: String,
        message: String,
    },

    /// Failed to parse a response from the index backend.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize an item for the index backend.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl IndexError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an authentication error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::AuthError(msg.into())
    }

    /// Create an upsert error from the backend's status, error code and message.
    pub fn upsert(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpsertError {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// HTTP status reported by the backend, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UpsertError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
