//! `allOf`, `anyOf`, `oneOf`, `not`.
//!
//! `allOf` models inheritance: object-typed members become `extend` entries
//! and are emitted as siblings, non-object members fold their constraints
//! into the parent. `anyOf`/`oneOf` model union alternatives: every member
//! becomes a sibling and the parent's type set is widened with the member
//! types. The asymmetry is deliberate and load-bearing.

use serde_json::Value;

use crate::interpret::Interpreter;
use crate::model::CommonModel;
use crate::reflect::child_name;
use crate::schema::{Schema, SchemaObject};

pub fn interpret_all_of(obj: &SchemaObject, model: &mut CommonModel, interp: &mut Interpreter) {
    let Some(members) = &obj.all_of else { return };
    for (i, member) in members.iter().enumerate() {
        let fallback = child_name(&model.id, &format!("allOf_{i}"));
        let member_model = interp.interpret_schema(member, &fallback);

        if member_model.is_object_model() {
            if !model.extends.contains(&member_model.id) {
                model.extends.push(member_model.id.clone());
            }
            interp.push_sibling(member_model);
        } else {
            if let Some(tags) = &member_model.types {
                for t in tags {
                    model.add_type(*t);
                }
            }
            if let Some(values) = &member_model.enum_values {
                model.union_enum(values);
            }
        }
    }
}

pub fn interpret_any_of(obj: &SchemaObject, model: &mut CommonModel, interp: &mut Interpreter) {
    if let Some(members) = &obj.any_of {
        interpret_union(members, "anyOf", model, interp);
    }
}

pub fn interpret_one_of(obj: &SchemaObject, model: &mut CommonModel, interp: &mut Interpreter) {
    if let Some(members) = &obj.one_of {
        interpret_union(members, "oneOf", model, interp);
    }
}

fn interpret_union(
    members: &[Schema],
    keyword: &str,
    model: &mut CommonModel,
    interp: &mut Interpreter,
) {
    for (i, member) in members.iter().enumerate() {
        let fallback = child_name(&model.id, &format!("{keyword}_{i}"));
        let member_model = interp.interpret_schema(member, &fallback);

        if let Some(tags) = &member_model.types {
            for t in tags {
                model.add_type(*t);
            }
        }
        interp.push_sibling(member_model);
    }
}

/// Best effort: subtract the negated schema's enum values when both sides
/// carry enums. General schema negation is out of scope.
pub fn interpret_not(obj: &SchemaObject, model: &mut CommonModel) {
    let Some(not_obj) = obj.not.as_ref().and_then(Schema::as_object) else {
        return;
    };

    let negated: Option<Vec<Value>> = not_obj
        .const_value
        .as_ref()
        .map(|v| vec![v.clone()])
        .or_else(|| not_obj.enum_values.clone());

    let Some(negated) = negated else { return };
    let Some(values) = model.enum_values.as_mut() else { return };
    values.retain(|v| !negated.contains(v));
}
