//! Error types for the client.

use profiledb_schema::SchemaError;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur on the client side.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure communicating with the server.
    ///
    /// Surfaced for create and pull; background pushes swallow this
    /// by design.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server rejected the request as invalid (400-equivalent).
    #[error("server rejected the request: {0}")]
    Rejected(String),

    /// The identity is unknown to the server.
    #[error("no record for identity {0:?}")]
    NotFound(String),

    /// Local pre-validation against the client-held schema failed.
    /// No network call was made and the cache is untouched.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The field is absent from the mirror cache.
    #[error("field {field:?} is not in the mirror cache")]
    UnknownField {
        /// The requested field name.
        field: String,
    },

    /// No profile is bound yet; this is a usage error, not a data
    /// condition.
    #[error("no profile bound; call create_or_bind or bind_by_pull first")]
    NotBound,

    /// The identity cache on disk could not be read or written.
    #[error("identity cache error: {0}")]
    Cache(#[from] std::io::Error),

    /// The server's response could not be decoded.
    #[error("protocol error: {0}")]
    Protocol(String),
}
