//! Error types for flatset core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in flatset core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] flatset_storage::StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file header is missing or malformed.
    ///
    /// A store file cannot be used without a decodable header, so this
    /// error aborts the open.
    #[error("invalid header: {message}")]
    InvalidHeader {
        /// Description of the problem.
        message: String,
    },

    /// A record points past the end of the file or cannot be read whole.
    #[error("record corruption: {message}")]
    RecordCorruption {
        /// Description of the corruption.
        message: String,
    },

    /// A payload is too large for the 4-byte length prefix.
    #[error("payload too large: {size} bytes exceeds maximum {max}")]
    PayloadTooLarge {
        /// The payload size in bytes.
        size: usize,
        /// The maximum supported payload size.
        max: usize,
    },

    /// Another handle holds the store open.
    #[error("store locked: another handle has exclusive access")]
    StoreLocked,

    /// The store has been closed.
    #[error("store is closed")]
    StoreClosed,

    /// Operation not permitted in the current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

impl CoreError {
    /// Creates an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Creates a record corruption error.
    pub fn record_corruption(message: impl Into<String>) -> Self {
        Self::RecordCorruption {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }
}
