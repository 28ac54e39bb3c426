//! Canonical in-memory form of a JSON Schema (draft-07) node.
//!
//! A schema value is either a plain boolean (`true` = anything, `false` =
//! nothing) or an object carrying the recognized keywords. Unknown keywords
//! are tolerated and ignored. The pipeline deserializes into this form only
//! after reflection and resolution have run over the raw value tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::model::JsonType;

/// Extension attribute written by the name reflector. Callers may pre-seed
/// it; reflection skips positions where it is already present.
pub const INFERRED_NAME_KEY: &str = "x-modelgen-inferred-name";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Schema {
    Bool(bool),
    Object(Box<SchemaObject>),
}

impl Schema {
    pub fn as_object(&self) -> Option<&SchemaObject> {
        match self {
            Schema::Object(o) => Some(o.as_ref()),
            Schema::Bool(_) => None,
        }
    }
}

/// The `type` keyword: a single tag or a set of tags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TypeKeyword {
    One(JsonType),
    Many(Vec<JsonType>),
}

/// The `items` keyword: one schema for every element, or a positional tuple.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Items {
    Single(Box<Schema>),
    Tuple(Vec<Schema>),
}

/// A `dependencies` entry: a list of property names, or a subschema that
/// must also validate when the key property is present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Dependency {
    Keys(Vec<String>),
    Schema(Schema),
}

/// The canonical form is the post-resolution shape: `$schema` is checked by
/// the input processor on the raw value, and `$ref`/`definitions` are gone
/// by the time conversion runs, so none of them appear here.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SchemaObject {
    #[serde(rename = "$id")]
    pub id: Option<String>,

    pub title: Option<String>,
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub types: Option<TypeKeyword>,

    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,

    /// `const: null` is meaningful, so presence is tracked explicitly.
    #[serde(rename = "const", deserialize_with = "some_value")]
    pub const_value: Option<Value>,

    pub properties: Option<BTreeMap<String, Schema>>,

    pub items: Option<Items>,

    #[serde(rename = "additionalProperties")]
    pub additional_properties: Option<Schema>,

    #[serde(rename = "patternProperties")]
    pub pattern_properties: Option<BTreeMap<String, Schema>>,

    pub required: Option<Vec<String>>,

    #[serde(rename = "allOf")]
    pub all_of: Option<Vec<Schema>>,

    #[serde(rename = "anyOf")]
    pub any_of: Option<Vec<Schema>>,

    #[serde(rename = "oneOf")]
    pub one_of: Option<Vec<Schema>>,

    pub not: Option<Schema>,

    pub dependencies: Option<BTreeMap<String, Dependency>>,

    #[serde(rename = "x-modelgen-inferred-name")]
    pub inferred_name: Option<String>,
}

fn some_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_de::schema_from_value;
    use serde_json::json;

    #[test]
    fn boolean_schemas_deserialize() {
        assert_eq!(schema_from_value(&json!(true)).unwrap(), Schema::Bool(true));
        assert_eq!(schema_from_value(&json!(false)).unwrap(), Schema::Bool(false));
    }

    #[test]
    fn type_keyword_single_and_set() {
        let s = schema_from_value(&json!({"type": "string"})).unwrap();
        let o = s.as_object().unwrap();
        assert_eq!(o.types, Some(TypeKeyword::One(JsonType::String)));

        let s = schema_from_value(&json!({"type": ["string", "null"]})).unwrap();
        let o = s.as_object().unwrap();
        assert_eq!(
            o.types,
            Some(TypeKeyword::Many(vec![JsonType::String, JsonType::Null]))
        );
    }

    #[test]
    fn items_single_tuple_and_boolean() {
        let s = schema_from_value(&json!({"items": {"type": "integer"}})).unwrap();
        assert!(matches!(
            s.as_object().unwrap().items,
            Some(Items::Single(_))
        ));

        let s = schema_from_value(&json!({"items": [{"type": "integer"}, true]})).unwrap();
        match &s.as_object().unwrap().items {
            Some(Items::Tuple(elems)) => assert_eq!(elems.len(), 2),
            other => panic!("expected tuple items, got {other:?}"),
        }

        let s = schema_from_value(&json!({"items": true})).unwrap();
        assert!(matches!(
            s.as_object().unwrap().items,
            Some(Items::Single(ref b)) if **b == Schema::Bool(true)
        ));
    }

    #[test]
    fn const_null_is_present() {
        let s = schema_from_value(&json!({"const": null})).unwrap();
        assert_eq!(s.as_object().unwrap().const_value, Some(Value::Null));

        let s = schema_from_value(&json!({})).unwrap();
        assert_eq!(s.as_object().unwrap().const_value, None);
    }

    #[test]
    fn dependency_forms() {
        let s = schema_from_value(&json!({
            "dependencies": {
                "a": ["b", "c"],
                "d": {"properties": {"e": {"type": "string"}}}
            }
        }))
        .unwrap();
        let deps = s.as_object().unwrap().dependencies.as_ref().unwrap();
        assert!(matches!(deps["a"], Dependency::Keys(_)));
        assert!(matches!(deps["d"], Dependency::Schema(_)));
    }

    #[test]
    fn unknown_keywords_are_ignored() {
        let s = schema_from_value(&json!({
            "type": "string",
            "minLength": 3,
            "x-vendor-thing": {"whatever": true}
        }))
        .unwrap();
        assert!(s.as_object().is_some());
    }
}
