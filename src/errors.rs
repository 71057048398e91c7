// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::QueueOperation;

#[derive(Error, Debug)]
pub enum ConsumeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Queue access error during {operation}: {message}")]
    QueueAccess {
        operation: QueueOperation,
        message: String,
        /// The same call may succeed later (network trouble, throttling, 5xx).
        transient: bool,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConsumeError {
    /// Queue failure worth retrying.
    pub fn transient(operation: QueueOperation, message: impl Into<String>) -> Self {
        ConsumeError::QueueAccess {
            operation,
            message: message.into(),
            transient: true,
        }
    }

    /// Queue failure that will not go away on its own (missing queue, denied
    /// access, stale receipt handle, malformed request).
    pub fn permanent(operation: QueueOperation, message: impl Into<String>) -> Self {
        ConsumeError::QueueAccess {
            operation,
            message: message.into(),
            transient: false,
        }
    }

    /// Whether retrying the same queue call might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ConsumeError::QueueAccess { transient: true, .. })
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ConsumeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_queue_errors_are_retryable() {
        assert!(ConsumeError::transient(QueueOperation::Receive, "connection reset").is_retryable());
        assert!(!ConsumeError::permanent(QueueOperation::Receive, "no such queue").is_retryable());
        assert!(!ConsumeError::ConfigError("bad".into()).is_retryable());
    }
}
