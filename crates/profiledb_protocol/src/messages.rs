//! Strict request and response shapes.

use profiledb_schema::{FieldFault, FieldMap, FieldType, ValidationReport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Request to create a new record. The body is the bare field map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateRequest {
    /// The initial field values; must cover every declared field.
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl CreateRequest {
    /// Creates a new create request.
    pub fn new(fields: FieldMap) -> Self {
        Self { fields }
    }
}

/// Successful create response: the assigned identity plus the stored fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateResponse {
    /// The server-assigned identity token.
    pub id: String,
    /// The stored field values.
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl CreateResponse {
    /// Creates a new create response.
    pub fn new(id: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Request to fetch the full record for an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    /// The record kind.
    pub endpoint: String,
    /// The identity to fetch.
    pub id: String,
}

impl PullRequest {
    /// Creates a new pull request for the given endpoint and identity.
    pub fn new(endpoint: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            id: id.into(),
        }
    }
}

/// Successful pull response: the stored fields, without the identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullResponse {
    /// The stored field values.
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl PullResponse {
    /// Creates a new pull response.
    pub fn new(fields: FieldMap) -> Self {
        Self { fields }
    }
}

/// Request to set exactly one field on an existing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushRequest {
    /// The record kind.
    pub endpoint: String,
    /// The identity to mutate.
    pub id: String,
    /// The field to set.
    pub field: String,
    /// The new value.
    pub value: Value,
}

impl PushRequest {
    /// Creates a new push request.
    pub fn new(
        endpoint: impl Into<String>,
        id: impl Into<String>,
        field: impl Into<String>,
        value: Value,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            id: id.into(),
            field: field.into(),
            value,
        }
    }
}

/// The fetch-schema response: field name to type tag.
pub type SchemaResponse = BTreeMap<String, String>;

/// The body of every error response.
///
/// `error` is always present. Create-validation failures additionally
/// carry which declared fields were missing, which supplied keys were
/// unknown or mistyped, and the complete required-field map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable description of the failure.
    pub error: String,
    /// Declared fields absent from a create candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<String>>,
    /// Supplied keys that were unknown or mistyped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faults: Option<Vec<FieldFault>>,
    /// The complete required-field map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<BTreeMap<String, FieldType>>,
}

impl ErrorBody {
    /// Creates an error body carrying only a message.
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            missing: None,
            faults: None,
            required: None,
        }
    }

    /// Creates an error body from a full validation report.
    pub fn validation(report: &ValidationReport) -> Self {
        Self {
            error: report.to_string(),
            missing: Some(report.missing.clone()),
            faults: Some(report.faults.clone()),
            required: Some(report.required.clone()),
        }
    }
}
