//! Error types for store operations.

use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in the storage layer.
///
/// Storage failures are fatal to the request that hit them; they are
/// reported to the caller and never retried internally.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error made the store unavailable.
    #[error("store unavailable: {0}")]
    Unavailable(#[from] io::Error),

    /// The identity is not usable as a record name.
    #[error("identity {0:?} is not a valid record name")]
    InvalidIdentity(String),
}
