//! `properties`, `patternProperties`, `additionalProperties`, `required`,
//! `dependencies`.

use tracing::warn;

use crate::interpret::Interpreter;
use crate::model::{CommonModel, JsonType};
use crate::reflect::child_name;
use crate::schema::{Dependency, Schema, SchemaObject};

pub fn interpret_properties(obj: &SchemaObject, model: &mut CommonModel, interp: &mut Interpreter) {
    let Some(props) = &obj.properties else { return };
    for (key, schema) in props {
        let child = interp.interpret_schema(schema, &child_name(&model.id, key));
        model.properties.insert(key.clone(), child);
    }
}

pub fn interpret_pattern_properties(
    obj: &SchemaObject,
    model: &mut CommonModel,
    interp: &mut Interpreter,
) {
    let Some(patterns) = &obj.pattern_properties else { return };
    for (i, (pattern, schema)) in patterns.iter().enumerate() {
        if regex::Regex::new(pattern).is_err() {
            warn!(%pattern, "patternProperties key does not compile as a regex");
        }
        let fallback = child_name(&model.id, &format!("pattern_property_{i}"));
        let child = interp.interpret_schema(schema, &fallback);
        model.pattern_properties.insert(pattern.clone(), child);
    }
}

pub fn interpret_required(obj: &SchemaObject, model: &mut CommonModel) {
    if let Some(required) = &obj.required {
        model.required.extend(required.iter().cloned());
    }
}

/// Only object models accept additional properties; when the keyword is
/// absent they default to `true` (any value).
pub fn interpret_additional_properties(
    obj: &SchemaObject,
    model: &mut CommonModel,
    interp: &mut Interpreter,
) {
    if !model.has_type(JsonType::Object) {
        return;
    }
    let default = Schema::Bool(true);
    let schema = obj.additional_properties.as_ref().unwrap_or(&default);
    let fallback = child_name(&model.id, "additionalProperty");
    let child = interp.interpret_schema(schema, &fallback);
    model.additional_properties = Some(Box::new(child));
}

/// Schema dependencies are interpreted and folded into the parent as a
/// union of constraints. Property dependencies carry no shape and are
/// ignored.
pub fn interpret_dependencies(
    obj: &SchemaObject,
    model: &mut CommonModel,
    interp: &mut Interpreter,
) {
    let Some(deps) = &obj.dependencies else { return };
    for (key, dep) in deps {
        let Dependency::Schema(schema) = dep else { continue };
        let dep_model = interp.interpret_schema(schema, &child_name(&model.id, key));

        if let Some(tags) = &dep_model.types {
            for t in tags {
                model.add_type(*t);
            }
        }
        if let Some(values) = &dep_model.enum_values {
            model.union_enum(values);
        }
        model.required.extend(dep_model.required.iter().cloned());
        for (prop, child) in dep_model.properties {
            model.properties.entry(prop).or_insert(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpret::interpret;
    use crate::model::JsonType;
    use crate::path_de::schema_from_value;
    use serde_json::json;

    fn primary(v: serde_json::Value) -> crate::model::CommonModel {
        let schema = schema_from_value(&v).unwrap();
        interpret(&schema, "root").remove(0)
    }

    #[test]
    fn additional_properties_default_to_any_on_objects() {
        let m = primary(json!({"type": "object"}));
        let extra = m.additional_properties.expect("defaulted");
        assert!(extra.is_any());
    }

    #[test]
    fn additional_properties_are_not_defaulted_on_scalars() {
        let m = primary(json!({"type": "string"}));
        assert!(m.additional_properties.is_none());
    }

    #[test]
    fn explicit_additional_properties_are_interpreted() {
        let m = primary(json!({
            "type": "object",
            "additionalProperties": {"type": "integer"}
        }));
        let extra = m.additional_properties.unwrap();
        assert!(extra.has_type(JsonType::Integer));
    }

    #[test]
    fn pattern_properties_are_registered_under_the_pattern() {
        let m = primary(json!({
            "patternProperties": {"^x-": {"type": "string"}}
        }));
        assert!(m.pattern_properties["^x-"].has_type(JsonType::String));
    }

    #[test]
    fn required_is_copied_verbatim() {
        let m = primary(json!({
            "type": "object",
            "properties": {"a": true, "b": true},
            "required": ["a", "b"]
        }));
        assert_eq!(
            m.required.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn schema_dependencies_merge_into_the_parent() {
        let m = primary(json!({
            "type": "object",
            "properties": {"credit_card": {"type": "integer"}},
            "dependencies": {
                "credit_card": {
                    "properties": {"billing_address": {"type": "string"}},
                    "required": ["billing_address"]
                }
            }
        }));
        assert!(m.properties.contains_key("billing_address"));
        assert!(m.required.contains("billing_address"));
    }

    #[test]
    fn property_dependencies_are_ignored() {
        let m = primary(json!({
            "type": "object",
            "dependencies": {"a": ["b"]}
        }));
        assert!(!m.required.contains("b"));
    }
}
