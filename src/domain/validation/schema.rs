//! Validation schema documents.
//!
//! A schema is an ordered mapping of field name to rules. JSON objects are
//! read entry by entry so the declared field order survives deserialization.

use once_cell::sync::Lazy;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::rule::RuleSpec;
use crate::domain::foundation::ConfigError;

static OPPORTUNITY: Lazy<Result<ValidationSchema, ConfigError>> =
    Lazy::new(|| ValidationSchema::from_json_str(include_str!("schemas/opportunity.json")));

/// Rules declared for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: String,
    pub rules: Vec<RuleSpec>,
}

/// An ordered field -> rules mapping, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationSchema {
    fields: Vec<SchemaField>,
}

impl ValidationSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field with its rules.
    ///
    /// Declaring the same field twice is reported when the schema is compiled.
    pub fn field(mut self, name: impl Into<String>, rules: Vec<RuleSpec>) -> Self {
        self.fields.push(SchemaField {
            name: name.into(),
            rules,
        });
        self
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Parses a schema from its JSON document form.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::parse)
    }

    /// The schema for opportunity records, with a cross-field contact check.
    pub fn opportunity() -> Result<Self, ConfigError> {
        (*OPPORTUNITY).clone()
    }
}

impl Serialize for ValidationSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.name, &field.rules)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ValidationSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SchemaVisitor;

        impl<'de> Visitor<'de> for SchemaVisitor {
            type Value = ValidationSchema;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a map of field names to rule lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, rules)) = access.next_entry::<String, Vec<RuleSpec>>()? {
                    fields.push(SchemaField { name, rules });
                }
                Ok(ValidationSchema { fields })
            }
        }

        deserializer.deserialize_map(SchemaVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::RuleKind;

    #[test]
    fn json_preserves_field_order() {
        let schema = ValidationSchema::from_json_str(
            r#"{
                "zeta": [{"kind": "required", "message": "Zeta required"}],
                "alpha": [{"kind": "email", "message": "Bad email"}],
                "mid": []
            }"#,
        )
        .unwrap();

        let names: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn duplicate_json_keys_are_kept_for_compile_to_reject() {
        let schema = ValidationSchema::from_json_str(
            r#"{"a": [], "a": [{"kind": "required", "message": "x"}]}"#,
        )
        .unwrap();
        assert_eq!(schema.fields().len(), 2);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = ValidationSchema::from_json_str(r#"{"a": [{"kind": "bogus"}]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn serialization_keeps_order() {
        let schema = ValidationSchema::new()
            .field("b", vec![RuleSpec::required("B")])
            .field("a", vec![RuleSpec::required("A")]);
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.find("\"b\"").unwrap() < json.find("\"a\"").unwrap());

        let back = ValidationSchema::from_json_str(&json).unwrap();
        assert_eq!(back, schema);
    }

    #[test]
    fn opportunity_schema_loads() {
        let schema = ValidationSchema::opportunity().unwrap();
        let title = &schema.fields()[0];
        assert_eq!(title.name, "title");
        assert_eq!(title.rules[0].kind, RuleKind::Required);
        assert!(schema
            .fields()
            .iter()
            .any(|f| f.rules.iter().any(|r| r.kind == RuleKind::Custom)));
        assert_eq!(ValidationSchema::opportunity().unwrap(), schema);
    }
}
