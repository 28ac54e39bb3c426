//! Keyword interpretation.
//!
//! Walks a resolved schema and projects every recognized keyword into a
//! CommonModel. Handlers are independent of each other except where the
//! order below notes otherwise; each has the same shape (schema object,
//! model under construction, interpreter) and lives in a submodule by
//! concern.
//!
//! Design notes:
//! - `allOf` models inheritance (`extend`); `anyOf`/`oneOf` model union
//!   alternatives emitted as sibling models. The asymmetry is deliberate.
//! - Missing constraints get defaults instead of errors; interpretation
//!   never fails on a schema that deserialized.

pub mod composition;
pub mod items;
pub mod object;
pub mod types;

use crate::model::CommonModel;
use crate::schema::{Schema, SchemaObject};

/// Interpret a resolved schema. The first model in the list is the primary
/// model for the schema; the rest are siblings discovered along the way
/// (`anyOf`/`oneOf` members, object-typed `allOf` parents).
pub fn interpret(schema: &Schema, seed: &str) -> Vec<CommonModel> {
    let mut interpreter = Interpreter::default();
    let primary = interpreter.interpret_schema(schema, seed);

    let mut out = Vec::with_capacity(1 + interpreter.siblings.len());
    out.push(primary);
    out.extend(interpreter.siblings);
    out
}

#[derive(Default)]
pub struct Interpreter {
    siblings: Vec<CommonModel>,
}

impl Interpreter {
    pub fn interpret_schema(&mut self, schema: &Schema, fallback: &str) -> CommonModel {
        match schema {
            // `true`: anything goes; no constraint recorded.
            Schema::Bool(true) => {
                let mut model = CommonModel::named(fallback);
                model.original = Some(Box::new(schema.clone()));
                model
            }
            // `false`: an empty enum admits no value.
            Schema::Bool(false) => {
                let mut model = CommonModel::named(fallback);
                model.enum_values = Some(Vec::new());
                model.original = Some(Box::new(schema.clone()));
                model
            }
            Schema::Object(obj) => self.interpret_object(obj, schema, fallback),
        }
    }

    fn interpret_object(
        &mut self,
        obj: &SchemaObject,
        schema: &Schema,
        fallback: &str,
    ) -> CommonModel {
        let id = obj
            .id
            .clone()
            .or_else(|| obj.title.clone())
            .or_else(|| obj.inferred_name.clone())
            .unwrap_or_else(|| fallback.to_string());

        let mut model = CommonModel::named(id);
        model.original = Some(Box::new(schema.clone()));

        types::interpret_type(obj, &mut model);
        object::interpret_properties(obj, &mut model, self);
        object::interpret_pattern_properties(obj, &mut model, self);
        object::interpret_required(obj, &mut model);
        // After the type handlers: the object-typed check below must see
        // inferred types, not just explicit ones.
        object::interpret_additional_properties(obj, &mut model, self);
        items::interpret_items(obj, &mut model, self);
        composition::interpret_all_of(obj, &mut model, self);
        composition::interpret_any_of(obj, &mut model, self);
        composition::interpret_one_of(obj, &mut model, self);
        composition::interpret_not(obj, &mut model);
        object::interpret_dependencies(obj, &mut model, self);

        model
    }

    pub(crate) fn push_sibling(&mut self, model: CommonModel) {
        self.siblings.push(model);
    }
}
