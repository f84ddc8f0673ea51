//! Declared field types and runtime value kinds.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A declared type tag for one schema field.
///
/// Tags serialize as the lowercase strings used on the wire
/// (`"string"`, `"int"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// A text string.
    String,
    /// Any numeric value, int or float.
    Number,
    /// A boolean.
    Boolean,
    /// The JSON null value.
    Null,
    /// A JSON object.
    Object,
    /// A JSON array.
    Array,
    /// An integer-valued number.
    Int,
    /// A float-valued number.
    Float,
    /// Any value at all.
    Any,
}

impl FieldType {
    /// All known type tags, in declaration order.
    pub const ALL: [FieldType; 9] = [
        FieldType::String,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Null,
        FieldType::Object,
        FieldType::Array,
        FieldType::Int,
        FieldType::Float,
        FieldType::Any,
    ];

    /// Returns the wire tag for this type.
    pub fn tag(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Null => "null",
            FieldType::Object => "object",
            FieldType::Array => "array",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Any => "any",
        }
    }

    /// Parses a wire tag back into a type.
    pub fn from_tag(tag: &str) -> Option<FieldType> {
        FieldType::ALL.iter().copied().find(|t| t.tag() == tag)
    }

    /// Returns true iff `value`'s runtime kind satisfies this type.
    ///
    /// `number` accepts int or float; `any` accepts everything; all
    /// other tags require an exact kind match. Booleans are never
    /// numbers.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldType::Any => true,
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Null => value.is_null(),
            FieldType::Object => value.is_object(),
            FieldType::Array => value.is_array(),
            FieldType::Int => value.is_i64() || value.is_u64(),
            FieldType::Float => value.is_f64(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The runtime kind of a JSON value, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// JSON null.
    Null,
    /// JSON boolean.
    Bool,
    /// Integer-valued JSON number.
    Int,
    /// Float-valued JSON number.
    Float,
    /// JSON string.
    String,
    /// JSON array.
    Array,
    /// JSON object.
    Object,
}

impl ValueKind {
    /// Classifies a JSON value.
    pub fn of(value: &Value) -> ValueKind {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) if n.is_f64() => ValueKind::Float,
            Value::Number(_) => ValueKind::Int,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}
