//! Status semantics shared by both sides.

use std::fmt;

/// The outcome class of a protocol operation.
///
/// Named after the HTTP statuses of the reference binding, but any
/// transport that can carry a small integer can map these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The record was created (201-equivalent).
    Created,
    /// The request succeeded with a body (200-equivalent).
    Ok,
    /// The request succeeded with no body (204-equivalent).
    NoContent,
    /// The client supplied a malformed or invalid request (400-equivalent).
    BadRequest,
    /// The identity is unknown to the store (404-equivalent).
    NotFound,
    /// Durable storage failed (503-equivalent).
    Unavailable,
}

impl Status {
    /// Returns the numeric code of the reference binding.
    pub fn code(&self) -> u16 {
        match self {
            Status::Created => 201,
            Status::Ok => 200,
            Status::NoContent => 204,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::Unavailable => 503,
        }
    }

    /// Maps a numeric code back to a status, if it is one of ours.
    pub fn from_code(code: u16) -> Option<Status> {
        match code {
            201 => Some(Status::Created),
            200 => Some(Status::Ok),
            204 => Some(Status::NoContent),
            400 => Some(Status::BadRequest),
            404 => Some(Status::NotFound),
            503 => Some(Status::Unavailable),
            _ => None,
        }
    }

    /// Returns true for the success statuses.
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Created | Status::Ok | Status::NoContent)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for status in [
            Status::Created,
            Status::Ok,
            Status::NoContent,
            Status::BadRequest,
            Status::NotFound,
            Status::Unavailable,
        ] {
            assert_eq!(Status::from_code(status.code()), Some(status));
        }
        assert_eq!(Status::from_code(418), None);
    }

    #[test]
    fn success_classification() {
        assert!(Status::Created.is_success());
        assert!(Status::NoContent.is_success());
        assert!(!Status::BadRequest.is_success());
        assert!(!Status::Unavailable.is_success());
    }
}
