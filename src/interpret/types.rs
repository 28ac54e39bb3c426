//! `type`, `enum`, `const`, and type inference.

use crate::model::{CommonModel, JsonType};
use crate::schema::{SchemaObject, TypeKeyword};

pub fn interpret_type(obj: &SchemaObject, model: &mut CommonModel) {
    if let Some(values) = &obj.enum_values {
        model.enum_values = Some(values.clone());
    }
    // const is a single-value enum; the stricter constraint wins.
    if let Some(value) = &obj.const_value {
        model.enum_values = Some(vec![value.clone()]);
    }

    match &obj.types {
        Some(TypeKeyword::One(t)) => model.add_type(*t),
        Some(TypeKeyword::Many(tags)) => {
            for t in tags {
                model.add_type(*t);
            }
        }
        None => {
            if let Some(values) = model.enum_values.clone() {
                for v in &values {
                    model.add_type(JsonType::infer(v));
                }
            }
        }
    }

    // A schema with named or pattern properties is an object even when it
    // does not say so.
    if obj.types.is_none() && (obj.properties.is_some() || obj.pattern_properties.is_some()) {
        model.add_type(JsonType::Object);
    }
}
