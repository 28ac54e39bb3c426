//! Reference resolution.
//!
//! Rebuilds the reflected tree with every `$ref` replaced by the referenced
//! subtree. References are JSON Pointers relative to the root document;
//! anything else (external URIs, anchor fragments) is out of scope and
//! fails with `UnresolvedReference`.
//!
//! Cycles are broken by substituting an empty object schema at the second
//! encounter of any target on the current resolution path, which keeps the
//! output a finite tree. The sentinel inherits the ref site's inferred name
//! so the naming invariant survives resolution.

use serde_json::{Map, Value};

use crate::error::Error;
use crate::schema::INFERRED_NAME_KEY;

pub fn resolve(root: &Value) -> Result<Value, Error> {
    let mut stack = Vec::new();
    let mut out = resolve_node(root, root, &mut stack)?;

    // Members have been inlined where referenced; the container stays.
    if let Value::Object(map) = &mut out {
        if map.contains_key("definitions") {
            map.insert("definitions".to_string(), Value::Object(Map::new()));
        }
    }

    Ok(out)
}

fn resolve_node(node: &Value, root: &Value, stack: &mut Vec<String>) -> Result<Value, Error> {
    match node {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref") {
                let Some(reference) = reference.as_str() else {
                    return Err(Error::InvalidInput("$ref must be a string".to_string()));
                };
                return resolve_ref(reference, map, root, stack);
            }

            let mut out = Map::new();
            for (key, value) in map {
                // Literal positions are data, not schemas.
                if key == "enum" || key == "const" {
                    out.insert(key.clone(), value.clone());
                } else {
                    out.insert(key.clone(), resolve_node(value, root, stack)?);
                }
            }
            Ok(Value::Object(out))
        }
        Value::Array(elems) => elems
            .iter()
            .map(|v| resolve_node(v, root, stack))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}

fn resolve_ref(
    reference: &str,
    site: &Map<String, Value>,
    root: &Value,
    stack: &mut Vec<String>,
) -> Result<Value, Error> {
    let Some(pointer) = reference.strip_prefix('#') else {
        return Err(Error::UnresolvedReference(reference.to_string()));
    };

    let target = root
        .pointer(pointer)
        .ok_or_else(|| Error::UnresolvedReference(reference.to_string()))?;

    if stack.iter().any(|seen| seen == pointer) {
        return Ok(cycle_sentinel(site));
    }

    stack.push(pointer.to_string());
    let resolved = resolve_node(target, root, stack);
    stack.pop();
    resolved
}

/// `{ "type": "object", "properties": {} }`, named after the ref site when
/// it carries an inferred name.
fn cycle_sentinel(site: &Map<String, Value>) -> Value {
    let mut sentinel = Map::new();
    sentinel.insert("type".to_string(), Value::String("object".to_string()));
    sentinel.insert("properties".to_string(), Value::Object(Map::new()));
    if let Some(name) = site.get(INFERRED_NAME_KEY) {
        sentinel.insert(INFERRED_NAME_KEY.to_string(), name.clone());
    }
    Value::Object(sentinel)
}
