//! Error types for the server.

use profiledb_protocol::{ErrorBody, Status};
use profiledb_schema::{SchemaError, ValidationReport};
use profiledb_store::StoreError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while handling a request.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A create candidate failed full-profile validation.
    #[error("{0}")]
    Validation(ValidationReport),

    /// A pushed field/value pair failed schema validation.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The identity is unknown to the store.
    #[error("no record for identity {0:?}")]
    NotFound(String),

    /// The request envelope is missing keys, names an unknown
    /// endpoint, or is not structured at all.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Durable storage failed; the request is not retried.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A stored record or response could not be encoded or decoded.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Returns the protocol status for this error.
    pub fn status(&self) -> Status {
        match self {
            ServerError::Validation(_)
            | ServerError::Schema(_)
            | ServerError::MalformedRequest(_) => Status::BadRequest,
            ServerError::NotFound(_) => Status::NotFound,
            ServerError::Store(_) | ServerError::Internal(_) => Status::Unavailable,
        }
    }

    /// Returns true if the client caused this error (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServerError::Validation(_)
                | ServerError::Schema(_)
                | ServerError::NotFound(_)
                | ServerError::MalformedRequest(_)
        )
    }

    /// Builds the wire error body for this error.
    ///
    /// Validation failures carry the full missing/mistyped/required
    /// breakdown; everything else carries only the message.
    pub fn error_body(&self) -> ErrorBody {
        match self {
            ServerError::Validation(report) => ErrorBody::validation(report),
            other => ErrorBody::message(other.to_string()),
        }
    }
}
