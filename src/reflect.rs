//! Name reflection.
//!
//! One pass over the raw schema tree, before resolution. Every object
//! subschema at a position where it may become a model gets a stable
//! `x-modelgen-inferred-name`, built from the parent's name context and the
//! position key. The tree is annotated in place; no new tree is produced.
//!
//! The root name is taken verbatim from the caller-supplied seed, and the
//! name context restarts empty below it, so direct children of the root are
//! named by their position key alone while deeper nodes concatenate
//! (`outer` -> `outer_inner`). Definitions restart the context the same way:
//! their members are named by the definition key, not prefixed by the
//! parent. Boolean schemas cannot carry the attribute and are skipped.

use serde_json::Value;

use crate::schema::INFERRED_NAME_KEY;

pub fn reflect(root: &mut Value, seed: &str) {
    reflect_node(root, &sanitize(seed), true);
}

/// Join two name components with `_`. An empty parent context yields the
/// key alone.
pub fn child_name(parent: &str, key: &str) -> String {
    let key = sanitize(key);
    if parent.is_empty() {
        key
    } else {
        format!("{parent}_{key}")
    }
}

/// Inferred names stay within `[a-zA-Z0-9_]`.
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn reflect_node(node: &mut Value, name: &str, is_root: bool) {
    let Value::Object(map) = node else {
        return;
    };

    if !name.is_empty() && !map.contains_key(INFERRED_NAME_KEY) {
        map.insert(
            INFERRED_NAME_KEY.to_string(),
            Value::String(name.to_string()),
        );
    }

    // The name context passed down is derived from the position path, not
    // from a pre-seeded attribute, so overrides never leak into children.
    let ctx = if is_root { "" } else { name };

    if let Some(Value::Object(props)) = map.get_mut("properties") {
        for (key, value) in props.iter_mut() {
            reflect_node(value, &child_name(ctx, key), false);
        }
    }

    for keyword in ["allOf", "anyOf", "oneOf"] {
        if let Some(Value::Array(members)) = map.get_mut(keyword) {
            for (i, member) in members.iter_mut().enumerate() {
                reflect_node(member, &child_name(ctx, &format!("{keyword}_{i}")), false);
            }
        }
    }

    match map.get_mut("items") {
        Some(Value::Array(elems)) => {
            for (i, elem) in elems.iter_mut().enumerate() {
                reflect_node(elem, &child_name(ctx, &format!("items_{i}")), false);
            }
        }
        Some(single) => reflect_node(single, &child_name(ctx, "items"), false),
        None => {}
    }

    if let Some(value) = map.get_mut("additionalProperties") {
        reflect_node(value, &child_name(ctx, "additionalProperty"), false);
    }

    if let Some(Value::Object(patterns)) = map.get_mut("patternProperties") {
        // Regex keys make poor identifiers; a sequential index names them.
        for (i, (_, value)) in patterns.iter_mut().enumerate() {
            reflect_node(value, &child_name(ctx, &format!("pattern_property_{i}")), false);
        }
    }

    if let Some(Value::Object(deps)) = map.get_mut("dependencies") {
        for (key, value) in deps.iter_mut() {
            // Property dependencies (arrays of names) fall through the
            // object check inside.
            reflect_node(value, &child_name(ctx, key), false);
        }
    }

    if let Some(Value::Object(defs)) = map.get_mut("definitions") {
        for (key, value) in defs.iter_mut() {
            reflect_node(value, &sanitize(key), false);
        }
    }

    if let Some(value) = map.get_mut("not") {
        reflect_node(value, &child_name(ctx, "not"), false);
    }
}
