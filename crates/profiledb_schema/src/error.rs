//! Error types for schema validation.

use crate::field_type::{FieldType, ValueKind};
use thiserror::Error;

/// Errors that can occur when validating a single field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// The field name is not declared in the schema.
    #[error("unknown field {field:?}")]
    UnknownField {
        /// The offending field name.
        field: String,
    },

    /// The value does not satisfy the field's declared type.
    #[error("invalid type for field {field:?}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The field name.
        field: String,
        /// The declared type.
        expected: FieldType,
        /// The runtime kind of the supplied value.
        actual: ValueKind,
    },

    /// A schema document failed to parse.
    #[error("invalid schema document: {0}")]
    InvalidDocument(String),
}
