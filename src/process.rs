//! Pipeline orchestrator: validate, reflect, resolve, convert, interpret,
//! simplify. Each invocation owns its schema tree and model set end to end;
//! independent runs share no state.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Warning};
use crate::model::CommonModel;
use crate::{interpret, path_de, reflect, resolve, simplify};

/// `$schema` values this processor accepts. Absence also means draft-07.
const SUPPORTED_DRAFTS: [&str; 4] = [
    "http://json-schema.org/draft-07/schema#",
    "http://json-schema.org/draft-07/schema",
    "https://json-schema.org/draft-07/schema#",
    "https://json-schema.org/draft-07/schema",
];

pub const DEFAULT_ROOT_NAME: &str = "root";

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutput {
    /// Flat model map keyed by `$id`. Child positions reference other
    /// entries by id or hold an inline "any" model.
    pub models: BTreeMap<String, CommonModel>,
    /// The input, verbatim, for the downstream renderer.
    pub original_input: Value,
    pub warnings: Vec<Warning>,
}

/// True iff the input is a schema this processor can take: a boolean, or an
/// object whose `$schema` is absent or names a supported draft.
pub fn should_process(input: &Value) -> bool {
    match input {
        Value::Bool(_) => true,
        Value::Object(map) => match map.get("$schema") {
            None => true,
            Some(Value::String(draft)) => SUPPORTED_DRAFTS.contains(&draft.as_str()),
            Some(_) => false,
        },
        _ => false,
    }
}

pub fn process(input: &Value) -> Result<ProcessOutput, Error> {
    process_named(input, DEFAULT_ROOT_NAME)
}

pub fn process_named(input: &Value, root_name: &str) -> Result<ProcessOutput, Error> {
    validate(input)?;

    let mut working = input.clone();
    reflect::reflect(&mut working, root_name);
    debug!("reflected schema names");

    let resolved = resolve::resolve(&working)?;
    debug!("resolved references");

    let schema = path_de::schema_from_value(&resolved)?;

    let seed = reflect::child_name("", root_name);
    let interpreted = interpret::interpret(&schema, &seed);
    debug!(count = interpreted.len(), "interpreted models");

    let mut warnings = Vec::new();
    let models = simplify::simplify(interpreted, &mut warnings);
    debug!(
        count = models.len(),
        warnings = warnings.len(),
        "simplified model map"
    );

    Ok(ProcessOutput {
        models,
        original_input: input.clone(),
        warnings,
    })
}

fn validate(input: &Value) -> Result<(), Error> {
    match input {
        Value::Bool(_) => Ok(()),
        Value::Object(map) => match map.get("$schema") {
            None => Ok(()),
            Some(Value::String(draft)) if SUPPORTED_DRAFTS.contains(&draft.as_str()) => Ok(()),
            Some(Value::String(draft)) => Err(Error::UnsupportedSchemaDraft(draft.clone())),
            Some(other) => Err(Error::InvalidInput(format!(
                "$schema must be a string, got {other}"
            ))),
        },
        other => Err(Error::InvalidInput(format!(
            "a schema is an object or a boolean, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::JsonType;
    use serde_json::json;

    #[test]
    fn simple_object_extracts_the_property_model() {
        let input = json!({
            "$id": "A",
            "type": "object",
            "properties": {"x": {"type": "string"}}
        });
        let output = process(&input).unwrap();

        let a = &output.models["A"];
        assert!(a.is_object_model());
        assert_eq!(a.properties["x"].id, "x");
        assert!(output.models["x"].has_type(JsonType::String));
        assert_eq!(output.original_input, input);
    }

    #[test]
    fn enum_model_stays_a_single_entry() {
        let input = json!({"$id": "S", "type": "string", "enum": ["a", "b", "c"]});
        let output = process(&input).unwrap();

        assert_eq!(output.models.len(), 1);
        let s = &output.models["S"];
        assert!(s.has_type(JsonType::String));
        assert_eq!(
            s.enum_values,
            Some(vec![json!("a"), json!("b"), json!("c")])
        );
    }

    #[test]
    fn cyclic_reference_terminates_with_an_empty_object_model() {
        let input = json!({
            "type": "object",
            "properties": {"node": {"$ref": "#/definitions/node"}},
            "definitions": {
                "node": {
                    "type": "object",
                    "properties": {"child": {"$ref": "#/definitions/node"}}
                }
            }
        });
        let output = process(&input).unwrap();

        let node = &output.models["node"];
        let child_id = &node.properties["child"].id;
        let child = &output.models[child_id];
        assert!(child.has_type(JsonType::Object));
        assert!(child.properties.is_empty());
    }

    #[test]
    fn all_types_union_is_any_and_stays_inline() {
        let all_seven = json!(["null", "boolean", "integer", "number", "string", "array", "object"]);
        let output = process(&json!({"type": all_seven})).unwrap();
        assert!(output.models["root"].is_any());

        let output = process(&json!({
            "type": "object",
            "properties": {"v": {"type": all_seven}}
        }))
        .unwrap();
        assert!(!output.models.contains_key("v"));
        assert!(output.models["root"].properties["v"].is_any());
    }

    #[test]
    fn nested_property_names_concatenate() {
        let output = process(&json!({
            "properties": {
                "outer": {
                    "properties": {"inner": {"type": "object"}}
                }
            }
        }))
        .unwrap();
        assert!(output.models.contains_key("outer_inner"));
    }

    #[test]
    fn unsupported_draft_is_rejected() {
        let input = json!({"$schema": "http://json-schema.org/draft-99/schema#"});
        assert!(!should_process(&input));
        assert!(matches!(
            process(&input),
            Err(Error::UnsupportedSchemaDraft(_))
        ));
    }

    #[test]
    fn draft_07_is_accepted() {
        let input = json!({"$schema": "http://json-schema.org/draft-07/schema#", "type": "string"});
        assert!(should_process(&input));
        assert!(process(&input).is_ok());
    }

    #[test]
    fn non_schema_input_is_invalid() {
        assert!(!should_process(&json!([1, 2, 3])));
        assert!(matches!(
            process(&json!("nope")),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn boolean_schema_processes() {
        assert!(should_process(&json!(true)));
        let output = process(&json!(true)).unwrap();
        assert!(output.models["root"].is_any());
    }

    #[test]
    fn processing_is_idempotent_over_original_input() {
        let input = json!({
            "$id": "A",
            "type": "object",
            "properties": {"x": {"type": "string"}},
            "required": ["x"]
        });
        let once = process(&input).unwrap();
        let twice = process(&once.original_input).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn anyof_members_reach_the_map() {
        let output = process(&json!({
            "anyOf": [{"type": "string"}, {"type": "integer"}]
        }))
        .unwrap();

        assert!(output.models.contains_key("anyOf_0"));
        assert!(output.models.contains_key("anyOf_1"));
        let root = &output.models["root"];
        assert!(root.has_type(JsonType::String));
        assert!(root.has_type(JsonType::Integer));
    }

    #[test]
    fn allof_extends_point_at_map_entries() {
        let output = process(&json!({
            "type": "object",
            "allOf": [
                {"type": "object", "properties": {"a": {"type": "string"}}},
                {"type": "string"}
            ]
        }))
        .unwrap();

        let root = &output.models["root"];
        assert_eq!(root.extends, vec!["allOf_0"]);
        assert!(output.models.contains_key("allOf_0"));
        assert!(root.has_type(JsonType::String));
    }

    #[test]
    fn every_child_reference_resolves_in_the_map() {
        let output = process(&json!({
            "type": "object",
            "properties": {
                "a": {"type": "object", "properties": {"b": {"type": "integer"}}},
                "c": {"items": [{"type": "string"}, {"enum": [1, 2]}]},
                "d": {"type": "object", "additionalProperties": {"type": "boolean"}}
            },
            "patternProperties": {"^e": {"type": "number"}}
        }))
        .unwrap();

        fn check(model: &CommonModel, map: &BTreeMap<String, CommonModel>) {
            let mut slots: Vec<&CommonModel> = model.properties.values().collect();
            match &model.items {
                Some(crate::model::ModelItems::Single(m)) => slots.push(&**m),
                Some(crate::model::ModelItems::Tuple(ms)) => slots.extend(ms.iter()),
                None => {}
            }
            if let Some(m) = &model.additional_properties {
                slots.push(&**m);
            }
            slots.extend(model.pattern_properties.values());

            for slot in slots {
                assert!(
                    slot.is_any() || map.contains_key(&slot.id),
                    "dangling reference `{}` in `{}`",
                    slot.id,
                    model.id
                );
            }
            for id in &model.extends {
                assert!(map.contains_key(id), "dangling extend `{id}`");
            }
        }

        for model in output.models.values() {
            check(model, &output.models);
            assert!(!model.id.is_empty());
        }
    }
}
