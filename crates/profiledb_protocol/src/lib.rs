//! # profiledb Protocol
//!
//! Message shapes and status semantics shared by the profiledb server
//! and client. This is the contract both sides must honor identically;
//! it is not a runtime component of its own.
//!
//! ## Operations
//!
//! | operation | request | success | failure |
//! |---|---|---|---|
//! | create | field map | [`Status::Created`], `{id, ...fields}` | [`Status::BadRequest`] with missing/mistyped detail and the required-field list |
//! | pull | `{endpoint, id}` | [`Status::Ok`], `{...fields}` (no id echoed) | [`Status::NotFound`] for an unknown id |
//! | push | `{endpoint, id, field, value}` | [`Status::NoContent`], empty body | [`Status::BadRequest`] for a malformed envelope or type mismatch, [`Status::NotFound`] for an unknown id |
//! | fetch-schema | (none) | [`Status::Ok`], `{fieldName: typeTag}` | - |
//!
//! Bodies are JSON. An unknown `endpoint` value is a
//! [`Status::BadRequest`] naming the offending value; a non-JSON body
//! is a [`Status::BadRequest`] describing the required content type;
//! storage failure is [`Status::Unavailable`].
//!
//! The server parses requests through the permissive envelope types
//! ([`PullEnvelope`], [`PushEnvelope`]) so that it can name exactly
//! which required key is missing; clients emit the strict request
//! types, which serialize to the same JSON.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod envelope;
mod messages;
mod status;

pub use envelope::{PullEnvelope, PushEnvelope};
pub use messages::{
    CreateRequest, CreateResponse, ErrorBody, PullRequest, PullResponse, PushRequest,
    SchemaResponse,
};
pub use status::Status;

/// The profile record kind, currently the only registered endpoint.
pub const ENDPOINT_PROFILE: &str = "profile";

/// HTTP routes of the reference binding.
pub mod routes {
    /// Create a new record.
    pub const CREATE: &str = "/create";
    /// Fetch the full record for an identity.
    pub const PULL: &str = "/pull";
    /// Set one field on an existing record.
    pub const PUSH: &str = "/push";
    /// Fetch the field-name to type-tag map.
    pub const SCHEMA: &str = "/schema";
}
