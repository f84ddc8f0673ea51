//! # profiledb Server
//!
//! Request dispatcher and reference HTTP binding for the profiledb
//! server.
//!
//! This crate provides:
//! - The [`Dispatcher`]: table-driven routing of create, pull, push
//!   and fetch-schema requests by endpoint name
//! - The [`RecordEndpoint`] trait: one validate/get/set entry per
//!   record kind; adding a kind means registering an entry, not
//!   branching in the dispatcher
//! - [`ProfileEndpoint`]: the profile record kind over a
//!   [`profiledb_schema::SchemaRegistry`] and a
//!   [`profiledb_store::ProfileStore`]
//! - An axum HTTP binding ([`http`]) for the wire table in
//!   [`profiledb_protocol`]
//!
//! # Invariants
//!
//! - Validation always happens before any store mutation; a persisted
//!   profile is always fully schema-valid
//! - Identity tokens are minted exactly once at creation and never
//!   reused
//! - Each request is stateless given the store and the registry
//!
//! # Example
//!
//! ```rust
//! use profiledb_schema::{FieldType, SchemaRegistry};
//! use profiledb_server::Dispatcher;
//! use profiledb_store::MemoryStore;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(SchemaRegistry::new([
//!     ("level".to_string(), FieldType::Int),
//! ]));
//! let dispatcher = Dispatcher::with_profile(registry, Arc::new(MemoryStore::new()));
//! // Bind dispatcher.handle_create() / handle_pull() / handle_push()
//! // to a transport, or use profiledb_server::http::serve.
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod dispatcher;
mod endpoint;
mod error;
pub mod http;

pub use config::{ServerConfig, DEFAULT_PORT};
pub use dispatcher::Dispatcher;
pub use endpoint::{ProfileEndpoint, RecordEndpoint};
pub use error::{ServerError, ServerResult};
