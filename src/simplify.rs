//! Simplification.
//!
//! One pass over the interpreter's output that extracts child models into a
//! flat map keyed by `$id`, rewrites their parent positions as reference
//! models, and merges models that share an id. Consumes its input; the
//! returned map is the final shape handed to renderers.
//!
//! Extraction policy: every child-position model is extracted, except "any"
//! models (full seven-type set, or no constraints at all), which stay
//! inline. Merging is best effort: set-like constraints union, and where
//! two models disagree irreconcilably the newer entry wins and a
//! `MergeConflict` warning is recorded.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::mem;

use tracing::debug;

use crate::error::Warning;
use crate::model::{CommonModel, ModelItems};

pub fn simplify(
    models: Vec<CommonModel>,
    warnings: &mut Vec<Warning>,
) -> BTreeMap<String, CommonModel> {
    let mut out = BTreeMap::new();
    for model in models {
        register(model, &mut out, warnings);
    }
    out
}

fn register(
    mut model: CommonModel,
    out: &mut BTreeMap<String, CommonModel>,
    warnings: &mut Vec<Warning>,
) {
    extract_children(&mut model, out, warnings);

    match out.entry(model.id.clone()) {
        Entry::Vacant(slot) => {
            slot.insert(model);
        }
        Entry::Occupied(mut slot) => {
            debug!(id = %model.id, "merging duplicate model");
            merge_models(slot.get_mut(), model, warnings);
        }
    }
}

fn extract_children(
    model: &mut CommonModel,
    out: &mut BTreeMap<String, CommonModel>,
    warnings: &mut Vec<Warning>,
) {
    for child in model.properties.values_mut() {
        rewrite_slot(child, out, warnings);
    }
    match &mut model.items {
        Some(ModelItems::Single(child)) => rewrite_slot(child, out, warnings),
        Some(ModelItems::Tuple(elems)) => {
            for child in elems {
                rewrite_slot(child, out, warnings);
            }
        }
        None => {}
    }
    if let Some(child) = &mut model.additional_properties {
        rewrite_slot(child, out, warnings);
    }
    for child in model.pattern_properties.values_mut() {
        rewrite_slot(child, out, warnings);
    }
}

/// Move the model behind a child slot into the map and leave a reference
/// model in its place. "Any" models stay inline.
fn rewrite_slot(
    slot: &mut CommonModel,
    out: &mut BTreeMap<String, CommonModel>,
    warnings: &mut Vec<Warning>,
) {
    if slot.is_any() {
        return;
    }
    let id = slot.id.clone();
    let extracted = mem::replace(slot, CommonModel::reference(&id));
    register(extracted, out, warnings);
}

/// Merge `incoming` into `existing` (same id). Unions where possible; on an
/// irreconcilable disagreement the incoming side wins and a warning is
/// recorded.
pub fn merge_models(
    existing: &mut CommonModel,
    incoming: CommonModel,
    warnings: &mut Vec<Warning>,
) {
    let owner = existing.id.clone();

    if let Some(tags) = incoming.types {
        for t in tags {
            existing.add_type(t);
        }
    }
    if let Some(values) = incoming.enum_values {
        existing.union_enum(&values);
    }
    existing.required.extend(incoming.required);
    for id in incoming.extends {
        if !existing.extends.contains(&id) {
            existing.extends.push(id);
        }
    }

    for (key, child) in incoming.properties {
        match existing.properties.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(child);
            }
            Entry::Occupied(mut slot) => {
                let label = format!("property `{}`", slot.key());
                merge_child(slot.get_mut(), child, &owner, &label, warnings);
            }
        }
    }

    for (pattern, child) in incoming.pattern_properties {
        match existing.pattern_properties.entry(pattern) {
            Entry::Vacant(slot) => {
                slot.insert(child);
            }
            Entry::Occupied(mut slot) => {
                let label = format!("patternProperties `{}`", slot.key());
                merge_child(slot.get_mut(), child, &owner, &label, warnings);
            }
        }
    }

    if let Some(child) = incoming.additional_properties {
        if let Some(slot) = &mut existing.additional_properties {
            merge_child(slot, *child, &owner, "additionalProperties", warnings);
        } else {
            existing.additional_properties = Some(child);
        }
    }

    if let Some(items) = incoming.items {
        merge_items(existing, items, &owner, warnings);
    }

    if existing.original.is_none() {
        existing.original = incoming.original;
    }
}

fn merge_items(
    existing: &mut CommonModel,
    incoming: ModelItems,
    owner: &str,
    warnings: &mut Vec<Warning>,
) {
    let merged = match (existing.items.take(), incoming) {
        (None, incoming) => incoming,
        (Some(ModelItems::Single(mut slot)), ModelItems::Single(child)) => {
            merge_child(&mut slot, *child, owner, "items", warnings);
            ModelItems::Single(slot)
        }
        (Some(ModelItems::Tuple(mut slots)), ModelItems::Tuple(children))
            if slots.len() == children.len() =>
        {
            for (i, (slot, child)) in slots.iter_mut().zip(children).enumerate() {
                let label = format!("items[{i}]");
                merge_child(slot, child, owner, &label, warnings);
            }
            ModelItems::Tuple(slots)
        }
        (Some(_), incoming) => {
            warnings.push(Warning::MergeConflict {
                id: owner.to_string(),
                detail: "incompatible items shapes; keeping the newer one".to_string(),
            });
            incoming
        }
    };
    existing.items = Some(merged);
}

/// Children are reference models or inline "any" at this point; two
/// references to the same id are trivially equal, anything else is a
/// conflict the newer side wins.
fn merge_child(
    existing: &mut CommonModel,
    incoming: CommonModel,
    owner: &str,
    slot: &str,
    warnings: &mut Vec<Warning>,
) {
    if existing.id == incoming.id {
        return;
    }
    warnings.push(Warning::MergeConflict {
        id: owner.to_string(),
        detail: format!(
            "{slot} resolves to both `{}` and `{}`; keeping `{}`",
            existing.id, incoming.id, incoming.id
        ),
    });
    *existing = incoming;
}
