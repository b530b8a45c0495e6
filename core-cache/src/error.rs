//! # Cache Error Types

use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The network responded, but with a non-success status, while populating
    /// a tier. The store is left unmodified.
    #[error("Fetch failed with status {status}")]
    FetchFailed { status: u16 },

    /// The blob storage capability is absent in this runtime. Callers degrade
    /// to pass-through network behavior with no persistence.
    #[error("Cache storage unavailable")]
    StorageUnavailable,

    /// Transport-level failure (connection, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The request could not be routed (malformed URL or key).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CacheError {
    /// Returns `true` when the failure may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, CacheError::Network(_))
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
