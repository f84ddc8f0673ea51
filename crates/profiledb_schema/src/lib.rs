//! # profiledb Schema
//!
//! Field type tags and schema validation for profiledb.
//!
//! A schema is a fixed mapping from field name to a declared
//! [`FieldType`]. It is loaded once at startup and never mutated by
//! requests. Both the server and the client hold a [`SchemaRegistry`]:
//! the server's copy is authoritative, the client's is fetched from the
//! server and used for local pre-validation only.
//!
//! ## Matching rules
//!
//! Values are JSON values (`serde_json::Value`). Most type tags require
//! an exact kind match; `number` accepts any numeric value (int or
//! float) and `any` accepts every value.
//!
//! ```rust
//! use profiledb_schema::{FieldType, SchemaRegistry};
//! use serde_json::json;
//!
//! let registry = SchemaRegistry::new([
//!     ("level".to_string(), FieldType::Int),
//!     ("name".to_string(), FieldType::String),
//! ]);
//!
//! assert!(registry.is_valid("level", &json!(3)));
//! assert!(!registry.is_valid("level", &json!("three")));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod field_type;
mod registry;

pub use error::SchemaError;
pub use field_type::{FieldType, ValueKind};
pub use registry::{FieldFault, SchemaRegistry, ValidationReport};

/// A profile field map: field name to JSON value.
///
/// This is the in-memory shape of one profile record on both sides of
/// the protocol.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;
