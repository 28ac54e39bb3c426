//! `items`: one schema for every element, or a positional tuple.

use crate::interpret::Interpreter;
use crate::model::{CommonModel, JsonType, ModelItems};
use crate::reflect::child_name;
use crate::schema::{Items, SchemaObject};

pub fn interpret_items(obj: &SchemaObject, model: &mut CommonModel, interp: &mut Interpreter) {
    let Some(items) = &obj.items else { return };

    match items {
        Items::Single(schema) => {
            let child = interp.interpret_schema(schema, &child_name(&model.id, "items"));
            model.items = Some(ModelItems::Single(Box::new(child)));
        }
        Items::Tuple(schemas) => {
            let elems = schemas
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    interp.interpret_schema(s, &child_name(&model.id, &format!("items_{i}")))
                })
                .collect();
            model.items = Some(ModelItems::Tuple(elems));
        }
    }

    // Element schemas make the carrier an array unless it says otherwise.
    if obj.types.is_none() {
        model.add_type(JsonType::Array);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::interpret;
    use crate::path_de::schema_from_value;
    use serde_json::json;

    fn primary(v: serde_json::Value) -> CommonModel {
        let schema = schema_from_value(&v).unwrap();
        interpret(&schema, "root").remove(0)
    }

    #[test]
    fn single_items_produce_one_child_model() {
        let m = primary(json!({"items": {"type": "string"}}));
        assert!(m.has_type(JsonType::Array));
        match m.items {
            Some(ModelItems::Single(child)) => assert!(child.has_type(JsonType::String)),
            other => panic!("expected single items, got {other:?}"),
        }
    }

    #[test]
    fn tuple_items_keep_their_order() {
        let m = primary(json!({"items": [{"type": "string"}, {"type": "integer"}]}));
        match m.items {
            Some(ModelItems::Tuple(elems)) => {
                assert_eq!(elems.len(), 2);
                assert!(elems[0].has_type(JsonType::String));
                assert!(elems[1].has_type(JsonType::Integer));
            }
            other => panic!("expected tuple items, got {other:?}"),
        }
    }

    #[test]
    fn explicit_type_is_not_widened() {
        let m = primary(json!({"type": "string", "items": {"type": "integer"}}));
        assert!(!m.has_type(JsonType::Array));
    }
}
