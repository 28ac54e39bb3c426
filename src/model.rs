// Normalized intermediate: one CommonModel per nameable schema node.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::Schema;

/// The seven JSON types. Ordering gives `BTreeSet<JsonType>` a stable,
/// sorted iteration for deterministic output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl JsonType {
    pub const ALL: [JsonType; 7] = [
        JsonType::Null,
        JsonType::Boolean,
        JsonType::Integer,
        JsonType::Number,
        JsonType::String,
        JsonType::Array,
        JsonType::Object,
    ];

    /// Type of a literal value, as used when inferring `type` from
    /// `enum`/`const`. Integer-written numbers are `integer`, everything
    /// else numeric is `number`.
    pub fn infer(value: &Value) -> JsonType {
        match value {
            Value::Null => JsonType::Null,
            Value::Bool(_) => JsonType::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => JsonType::Integer,
            Value::Number(_) => JsonType::Number,
            Value::String(_) => JsonType::String,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }

}

/// Items of an array model: a single element model or a positional tuple.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModelItems {
    Single(Box<CommonModel>),
    Tuple(Vec<CommonModel>),
}

/// The pipeline's normalized intermediate form.
///
/// Created empty by the interpreter when it enters a schema, filled by the
/// keyword handlers, and afterwards mutated only by the simplifier when
/// merging duplicates. After simplification, child positions hold either a
/// reference model (an id pointing into the model map) or an inline "any"
/// model.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CommonModel {
    #[serde(rename = "$id")]
    pub id: String,

    /// Sorted-unique set of JSON types, or absent when unconstrained.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub types: Option<BTreeSet<JsonType>>,

    /// Allowed literal values. `Some(vec![])` admits no value at all
    /// (the `false` schema).
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, CommonModel>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<ModelItems>,

    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<CommonModel>>,

    #[serde(rename = "patternProperties", skip_serializing_if = "BTreeMap::is_empty")]
    pub pattern_properties: BTreeMap<String, CommonModel>,

    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub required: BTreeSet<String>,

    /// Ids of models this one inherits from (object-typed `allOf` members).
    #[serde(rename = "extend", skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,

    /// Back-pointer to the source schema for downstream decisions.
    #[serde(skip)]
    pub original: Option<Box<Schema>>,
}

impl CommonModel {
    pub fn named(id: impl Into<String>) -> Self {
        CommonModel {
            id: id.into(),
            ..CommonModel::default()
        }
    }

    /// A placeholder model carrying only an id, pointing into the model map.
    pub fn reference(id: impl Into<String>) -> Self {
        CommonModel::named(id)
    }

    pub fn add_type(&mut self, t: JsonType) {
        self.types.get_or_insert_with(BTreeSet::new).insert(t);
    }

    pub fn has_type(&self, t: JsonType) -> bool {
        self.types.as_ref().is_some_and(|ts| ts.contains(&t))
    }

    /// Append enum values not already present, preserving first-seen order.
    pub fn union_enum(&mut self, values: &[Value]) {
        let existing = self.enum_values.get_or_insert_with(Vec::new);
        for v in values {
            if !existing.contains(v) {
                existing.push(v.clone());
            }
        }
    }

    /// An object model has the `object` type and at least one object-shaped
    /// constraint. Everything else is a simple model.
    pub fn is_object_model(&self) -> bool {
        self.has_type(JsonType::Object)
            && (!self.properties.is_empty()
                || !self.extends.is_empty()
                || !self.pattern_properties.is_empty()
                || self.additional_properties.is_some())
    }

    /// "Any" models are never extracted as sub-models: either the type set
    /// covers all seven JSON types, or the model carries no constraint at
    /// all (the `true` schema).
    pub fn is_any(&self) -> bool {
        match &self.types {
            Some(ts) => ts.len() == JsonType::ALL.len(),
            None => {
                self.enum_values.is_none()
                    && self.properties.is_empty()
                    && self.items.is_none()
                    && self.additional_properties.is_none()
                    && self.pattern_properties.is_empty()
                    && self.extends.is_empty()
            }
        }
    }

    /// Enum-bearing model with no composition; rendered as an enum type.
    pub fn is_enum_only(&self) -> bool {
        self.enum_values.is_some()
            && self.properties.is_empty()
            && self.items.is_none()
            && self.additional_properties.is_none()
            && self.pattern_properties.is_empty()
            && self.extends.is_empty()
    }
}
