//! The schema registry: single source of truth for field validity.

use crate::error::SchemaError;
use crate::field_type::{FieldType, ValueKind};
use crate::FieldMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The mapping from field name to declared type.
///
/// A registry is immutable for the lifetime of a running deployment.
/// All methods are pure queries; validation never has side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistry {
    fields: BTreeMap<String, FieldType>,
}

impl SchemaRegistry {
    /// Creates a registry from field declarations.
    pub fn new(fields: impl IntoIterator<Item = (String, FieldType)>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Parses a registry from a JSON document of the form
    /// `{"level": "int", "name": "string"}`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDocument`] if the document is not
    /// a JSON object of known type tags.
    pub fn from_json(bytes: &[u8]) -> Result<Self, SchemaError> {
        let fields: BTreeMap<String, FieldType> = serde_json::from_slice(bytes)
            .map_err(|e| SchemaError::InvalidDocument(e.to_string()))?;
        Ok(Self { fields })
    }

    /// Builds a registry from a tag map as served by `fetch-schema`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDocument`] on an unknown type tag.
    pub fn from_tag_map(tags: &BTreeMap<String, String>) -> Result<Self, SchemaError> {
        let mut fields = BTreeMap::new();
        for (name, tag) in tags {
            let field_type = FieldType::from_tag(tag).ok_or_else(|| {
                SchemaError::InvalidDocument(format!("unknown type tag {tag:?} for field {name:?}"))
            })?;
            fields.insert(name.clone(), field_type);
        }
        Ok(Self { fields })
    }

    /// Returns the registry as a tag map for the wire.
    pub fn to_tag_map(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|(name, t)| (name.clone(), t.tag().to_string()))
            .collect()
    }

    /// Returns the declared type for a field, if the field exists.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).copied()
    }

    /// Returns the number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the declared fields.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields.iter().map(|(name, t)| (name.as_str(), *t))
    }

    /// Returns true iff `name` is declared and `value` satisfies its type.
    pub fn is_valid(&self, name: &str, value: &Value) -> bool {
        self.check_field(name, value).is_ok()
    }

    /// Checks one field/value pair, reporting the specific fault.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownField`] if `name` is not declared,
    /// [`SchemaError::TypeMismatch`] if the value kind does not match.
    pub fn check_field(&self, name: &str, value: &Value) -> Result<(), SchemaError> {
        let expected = self.field_type(name).ok_or_else(|| SchemaError::UnknownField {
            field: name.to_string(),
        })?;
        if expected.accepts(value) {
            Ok(())
        } else {
            Err(SchemaError::TypeMismatch {
                field: name.to_string(),
                expected,
                actual: ValueKind::of(value),
            })
        }
    }

    /// Returns true iff `candidate` covers every declared field and
    /// every key in it passes [`Self::is_valid`].
    pub fn validate_profile(&self, candidate: &FieldMap) -> bool {
        self.check_profile(candidate).is_ok()
    }

    /// Validates a full candidate profile, reporting every fault.
    ///
    /// The report lists the declared fields missing from `candidate`,
    /// the keys in `candidate` that are unknown or mistyped, and the
    /// complete required-field map.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationReport`] when the candidate is not fully valid.
    pub fn check_profile(&self, candidate: &FieldMap) -> Result<(), ValidationReport> {
        let mut report = ValidationReport {
            missing: Vec::new(),
            faults: Vec::new(),
            required: self.fields.clone(),
        };

        for name in self.fields.keys() {
            if !candidate.contains_key(name) {
                report.missing.push(name.clone());
            }
        }

        for (name, value) in candidate {
            if let Err(err) = self.check_field(name, value) {
                report.faults.push(FieldFault {
                    field: name.clone(),
                    expected: self.field_type(name),
                    actual: ValueKind::of(value),
                    detail: err.to_string(),
                });
            }
        }

        if report.missing.is_empty() && report.faults.is_empty() {
            Ok(())
        } else {
            Err(report)
        }
    }
}

/// One invalid key found while validating a candidate profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFault {
    /// The offending field name.
    pub field: String,
    /// The declared type, absent when the field is unknown.
    pub expected: Option<FieldType>,
    /// The runtime kind of the supplied value.
    pub actual: ValueKind,
    /// Human-readable description of the fault.
    pub detail: String,
}

/// The full result of a failed profile validation.
///
/// Carries enough detail for documentation-quality error responses:
/// which declared fields were missing, which supplied keys were
/// unknown or mistyped, and the complete required-field listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Declared fields absent from the candidate.
    pub missing: Vec<String>,
    /// Supplied keys that are unknown or mistyped.
    pub faults: Vec<FieldFault>,
    /// Every declared field with its required type.
    pub required: BTreeMap<String, FieldType>,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "profile failed validation")?;
        if !self.missing.is_empty() {
            write!(f, "; missing fields: {}", self.missing.join(", "))?;
        }
        for fault in &self.faults {
            write!(f, "; {}", fault.detail)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::new([
            ("level".to_string(), FieldType::Int),
            ("name".to_string(), FieldType::String),
            ("tags".to_string(), FieldType::Array),
        ])
    }

    fn fields(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn field_type_lookup() {
        let reg = registry();
        assert_eq!(reg.field_type("level"), Some(FieldType::Int));
        assert_eq!(reg.field_type("score"), None);
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn is_valid_rejects_unknown_and_mistyped() {
        let reg = registry();
        assert!(reg.is_valid("level", &json!(3)));
        assert!(!reg.is_valid("level", &json!("three")));
        assert!(!reg.is_valid("score", &json!(3)));
    }

    #[test]
    fn check_field_reports_fault() {
        let reg = registry();
        let err = reg.check_field("level", &json!("three")).unwrap_err();
        assert_eq!(
            err,
            SchemaError::TypeMismatch {
                field: "level".into(),
                expected: FieldType::Int,
                actual: ValueKind::String,
            }
        );

        let err = reg.check_field("score", &json!(1)).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownField { .. }));
    }

    #[test]
    fn full_profile_validates() {
        let reg = registry();
        let candidate = fields(json!({"level": 1, "name": "Ava", "tags": []}));
        assert!(reg.validate_profile(&candidate));
    }

    #[test]
    fn missing_field_is_reported_with_required_list() {
        let reg = registry();
        let candidate = fields(json!({"level": 1, "tags": []}));

        let report = reg.check_profile(&candidate).unwrap_err();
        assert_eq!(report.missing, vec!["name".to_string()]);
        assert!(report.faults.is_empty());
        assert_eq!(report.required.len(), 3);
        assert!(report.to_string().contains("name"));
    }

    #[test]
    fn mistyped_and_unknown_keys_are_reported() {
        let reg = registry();
        let candidate = fields(json!({
            "level": "one",
            "name": "Ava",
            "tags": [],
            "stray": true
        }));

        let report = reg.check_profile(&candidate).unwrap_err();
        assert!(report.missing.is_empty());
        assert_eq!(report.faults.len(), 2);

        let level = report.faults.iter().find(|f| f.field == "level").unwrap();
        assert_eq!(level.expected, Some(FieldType::Int));
        assert_eq!(level.actual, ValueKind::String);

        let stray = report.faults.iter().find(|f| f.field == "stray").unwrap();
        assert_eq!(stray.expected, None);
    }

    #[test]
    fn from_json_document() {
        let reg = SchemaRegistry::from_json(br#"{"level": "int", "name": "string"}"#).unwrap();
        assert_eq!(reg.field_type("level"), Some(FieldType::Int));

        let err = SchemaRegistry::from_json(br#"{"level": "integer"}"#).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDocument(_)));
    }

    #[test]
    fn tag_map_roundtrip() {
        let reg = registry();
        let tags = reg.to_tag_map();
        assert_eq!(tags.get("level").map(String::as_str), Some("int"));

        let rebuilt = SchemaRegistry::from_tag_map(&tags).unwrap();
        assert_eq!(rebuilt, reg);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_value() -> impl Strategy<Value = Value> {
            let leaf = prop_oneof![
                Just(json!(null)),
                any::<bool>().prop_map(|b| json!(b)),
                any::<i64>().prop_map(|n| json!(n)),
                any::<f64>().prop_filter("finite", |f| f.is_finite()).prop_map(|f| json!(f)),
                ".*".prop_map(|s: String| json!(s)),
            ];
            leaf.prop_recursive(3, 16, 4, |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                    prop::collection::btree_map(".*", inner, 0..4)
                        .prop_map(|m| json!(m)),
                ]
            })
        }

        proptest! {
            #[test]
            fn any_accepts_every_value(value in arb_value()) {
                let reg = SchemaRegistry::new([("f".to_string(), FieldType::Any)]);
                prop_assert!(reg.is_valid("f", &value));
            }

            #[test]
            fn number_is_union_of_int_and_float(value in arb_value()) {
                let number = FieldType::Number.accepts(&value);
                let parts = FieldType::Int.accepts(&value) || FieldType::Float.accepts(&value);
                prop_assert_eq!(number, parts);
            }

            #[test]
            fn exactly_one_kind_matches(value in arb_value()) {
                // Exact-match tags partition the value space.
                let exact = [
                    FieldType::String,
                    FieldType::Boolean,
                    FieldType::Null,
                    FieldType::Object,
                    FieldType::Array,
                    FieldType::Int,
                    FieldType::Float,
                ];
                let matches = exact.iter().filter(|t| t.accepts(&value)).count();
                prop_assert_eq!(matches, 1);
            }
        }
    }
}
