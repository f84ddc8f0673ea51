//! Permissive server-side request envelopes.
//!
//! The server decodes incoming bodies into these shapes rather than
//! the strict request types so that a missing key becomes an absent
//! option instead of a decode failure, and the dispatcher can name
//! exactly which required key is missing.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The envelope of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullEnvelope {
    /// The record kind, if supplied.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// The identity, if supplied.
    #[serde(default)]
    pub id: Option<String>,
}

/// The envelope of a push request.
///
/// `value` distinguishes an absent key from an explicit JSON `null`:
/// `null` is a legal field value under the `null` and `any` type tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PushEnvelope {
    /// The record kind, if supplied.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// The identity, if supplied.
    #[serde(default)]
    pub id: Option<String>,
    /// The field name, if supplied.
    #[serde(default)]
    pub field: Option<String>,
    /// The new value; `Some(Value::Null)` when the key was present
    /// with a JSON `null`, `None` when the key was absent.
    #[serde(default, deserialize_with = "present_value")]
    pub value: Option<Value>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
