//! Rust type rendering over the simplified model map.
//!
//! One renderer, enough to make the pipeline output tangible: object models
//! become serde structs, string enums become Rust enums, everything else
//! becomes a type alias. Reference slots render as the PascalCase name of
//! the map entry they point at; inline "any" slots render as
//! `serde_json::Value`.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{CommonModel, JsonType, ModelItems};

pub struct RustRenderer {
    out: String,
}

impl RustRenderer {
    pub fn new() -> Self {
        Self { out: String::new() }
    }

    pub fn render(&mut self, models: &BTreeMap<String, CommonModel>) {
        self.line("// Generated by modelgen. Do not edit by hand.");
        self.line("use serde::{Deserialize, Serialize};");
        self.line("");
        for (id, model) in models {
            self.render_model(id, model, models);
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn render_model(&mut self, id: &str, model: &CommonModel, models: &BTreeMap<String, CommonModel>) {
        self.doc_comment(model);
        let name = pascal_case(id);
        if let Some(variants) = string_enum_variants(model) {
            self.render_enum(&name, &variants);
        } else if model.is_object_model() {
            self.render_struct(&name, model, models);
        } else {
            let ty = type_expr(model, models);
            self.line(&format!("pub type {name} = {ty};"));
            self.line("");
        }
    }

    fn render_struct(
        &mut self,
        name: &str,
        model: &CommonModel,
        models: &BTreeMap<String, CommonModel>,
    ) {
        // Rust has no struct inheritance, so `extend` parents are flattened
        // into the child's field list.
        let (fields, required) = inherited_fields(model, models);

        self.line("#[derive(Debug, Clone, Serialize, Deserialize)]");
        self.line(&format!("pub struct {name} {{"));

        for (prop, child) in fields {
            let field = snake_ident(prop);
            if field != prop {
                self.line(&format!("    #[serde(rename = \"{prop}\")]"));
            }
            let mut ty = slot_type(child, models);
            if !required.contains(prop) {
                ty = format!("Option<{ty}>");
            }
            self.line(&format!("    pub {field}: {ty},"));
        }

        // Extra keys survive round-trips when additionalProperties has real
        // shape. The default "any" case stays out of the struct.
        if let Some(extra) = &model.additional_properties {
            if !extra.is_any() {
                let ty = slot_type(extra, models);
                self.line("    #[serde(flatten)]");
                self.line(&format!(
                    "    pub additional_properties: std::collections::BTreeMap<String, {ty}>,"
                ));
            }
        }

        self.line("}");
        self.line("");
    }

    fn render_enum(&mut self, name: &str, variants: &[String]) {
        self.line("#[derive(Debug, Clone, Serialize, Deserialize)]");
        self.line(&format!("pub enum {name} {{"));

        let mut seen = BTreeSet::new();
        for value in variants {
            let mut variant = pascal_case(value);
            while !seen.insert(variant.clone()) {
                variant.push('_');
            }
            self.line(&format!("    #[serde(rename = \"{value}\")]"));
            self.line(&format!("    {variant},"));
        }

        self.line("}");
        self.line("");
    }

    fn doc_comment(&mut self, model: &CommonModel) {
        let description = model
            .original
            .as_ref()
            .and_then(|s| s.as_object())
            .and_then(|o| o.description.as_deref());
        if let Some(description) = description {
            for line in description.lines() {
                self.line(&format!("/// {line}"));
            }
        }
    }

    fn line(&mut self, s: &str) {
        self.out.push_str(s);
        self.out.push('\n');
    }
}

impl Default for RustRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Struct fields including everything inherited through `extend`. Parents
/// are walked first (transitively) so the model's own declarations win on a
/// name clash; a seen-set keeps malformed extend cycles finite.
fn inherited_fields<'a>(
    model: &'a CommonModel,
    models: &'a BTreeMap<String, CommonModel>,
) -> (BTreeMap<&'a str, &'a CommonModel>, BTreeSet<&'a str>) {
    fn collect<'a>(
        model: &'a CommonModel,
        models: &'a BTreeMap<String, CommonModel>,
        fields: &mut BTreeMap<&'a str, &'a CommonModel>,
        required: &mut BTreeSet<&'a str>,
        seen: &mut BTreeSet<&'a str>,
    ) {
        if !seen.insert(&model.id) {
            return;
        }
        for parent in model.extends.iter().filter_map(|id| models.get(id)) {
            collect(parent, models, fields, required, seen);
        }
        for (prop, child) in &model.properties {
            fields.insert(prop, child);
        }
        for prop in &model.required {
            required.insert(prop);
        }
    }

    let mut fields = BTreeMap::new();
    let mut required = BTreeSet::new();
    let mut seen = BTreeSet::new();
    collect(model, models, &mut fields, &mut required, &mut seen);
    (fields, required)
}

fn string_enum_variants(model: &CommonModel) -> Option<Vec<String>> {
    if !model.is_enum_only() {
        return None;
    }
    let values = model.enum_values.as_ref()?;
    values
        .iter()
        .map(|v| v.as_str().map(String::from))
        .collect()
}

/// Type of a child slot: a named reference into the map, or an inline
/// expression for "any" and other unextracted models.
fn slot_type(child: &CommonModel, models: &BTreeMap<String, CommonModel>) -> String {
    if models.contains_key(&child.id) {
        pascal_case(&child.id)
    } else {
        type_expr(child, models)
    }
}

fn type_expr(model: &CommonModel, models: &BTreeMap<String, CommonModel>) -> String {
    let Some(types) = &model.types else {
        return "serde_json::Value".to_string();
    };

    // X | null collapses to Option<X>.
    if types.len() == 2 && types.contains(&JsonType::Null) {
        let inner = types.iter().find(|t| **t != JsonType::Null).copied();
        if let Some(inner) = inner {
            return format!("Option<{}>", scalar_expr(inner, model, models));
        }
    }

    if types.len() != 1 {
        return "serde_json::Value".to_string();
    }
    scalar_expr(*types.iter().next().expect("non-empty set"), model, models)
}

fn scalar_expr(t: JsonType, model: &CommonModel, models: &BTreeMap<String, CommonModel>) -> String {
    match t {
        JsonType::Null => "()".to_string(),
        JsonType::Boolean => "bool".to_string(),
        JsonType::Integer => "i64".to_string(),
        JsonType::Number => "f64".to_string(),
        JsonType::String => "String".to_string(),
        JsonType::Array => match &model.items {
            Some(ModelItems::Single(item)) => format!("Vec<{}>", slot_type(item, models)),
            Some(ModelItems::Tuple(elems)) => {
                let parts: Vec<String> = elems.iter().map(|e| slot_type(e, models)).collect();
                format!("({})", parts.join(", "))
            }
            None => "Vec<serde_json::Value>".to_string(),
        },
        JsonType::Object => {
            "std::collections::BTreeMap<String, serde_json::Value>".to_string()
        }
    }
}

fn pascal_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = true;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if upper_next {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            upper_next = c.is_ascii_digit();
        } else {
            upper_next = true;
        }
    }
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'V');
    }
    out
}

fn snake_ident(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_lower = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
            prev_lower = false;
        }
    }
    let out = out.trim_end_matches('_').to_string();
    let mut out = if out.is_empty() { "field".to_string() } else { out };
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if RUST_KEYWORDS.contains(&out.as_str()) {
        out.push('_');
    }
    out
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "yield",
];
