//! Row hydration: prefix demultiplexing into nested entities.
//!
//! Walks the same path tree as planning, in the same order. For each
//! relation it moves the `{table}_`-prefixed columns out of the flat
//! attribute set (removal is mandatory: leftover keys would leak into the
//! parent's own attributes and corrupt later prefix scans), decides
//! absent-vs-present on the related primary key, applies the relation's
//! default-attribute policy, and attaches the result under the relation
//! name. A relationship reached via several paths is processed once per
//! row; later paths continue from the entity the first pass attached.

use hashbrown::HashMap;

use crate::entity::{Entity, Row};
use crate::error::{Result, StitchError};
use crate::path::PathMap;
use crate::schema::{EntityDef, Registry};

/// Populates `root`'s relation tree from one flat row.
///
/// `attributes` is the full flat row including all joined columns; consumed
/// prefixed keys are removed from it, leaving the root entity's own columns
/// behind.
pub fn hydrate_row(
    registry: &Registry,
    root_def: &EntityDef,
    root: &mut Entity,
    attributes: &mut Row,
    paths: &PathMap,
) -> Result<()> {
    // Per-row dedup: structural pair -> where the related entity landed in
    // the tree, or None when the related row was absent with no stand-in.
    let mut seen: HashMap<(String, String), Option<Vec<String>>> = HashMap::new();

    for (path, _) in paths.iter() {
        let mut current_def = root_def;
        // None = walking beneath an absent relation; columns of deeper
        // segments are still consumed, nothing is attached.
        let mut location: Option<Vec<String>> = Some(Vec::new());

        for segment in path.split('.') {
            let relation = registry.relation(current_def, segment)?;
            let related_def = registry.entity(&relation.target)?;
            let dedup = (current_def.name.clone(), related_def.name.clone());

            if let Some(known) = seen.get(&dedup) {
                location = known.clone();
                current_def = related_def;
                continue;
            }

            let related_attrs = extract_prefixed(attributes, related_def);

            let Some(parent_location) = location.clone() else {
                seen.insert(dedup, None);
                current_def = related_def;
                continue;
            };

            let absent = related_attrs
                .get(&related_def.primary_key)
                .ok_or_else(|| StitchError::MissingKeyColumn {
                    table: related_def.table.clone(),
                    column: related_def.primary_key.clone(),
                })?
                .is_null();

            let parent = entity_at_mut(root, &parent_location)?;
            if absent {
                match &relation.default_attributes {
                    Some(defaults) => {
                        let mut stand_in = Entity::new(related_def.name.clone());
                        for (name, value) in defaults {
                            stand_in.set_attr(name.clone(), value.clone());
                        }
                        parent.set_relation(segment, Some(stand_in));
                        let mut attached = parent_location;
                        attached.push(segment.to_string());
                        seen.insert(dedup, Some(attached.clone()));
                        location = Some(attached);
                    }
                    None => {
                        parent.set_relation(segment, None);
                        seen.insert(dedup, None);
                        location = None;
                    }
                }
            } else {
                parent.set_relation(
                    segment,
                    Some(Entity::from_attributes(
                        related_def.name.clone(),
                        related_attrs,
                    )),
                );
                let mut attached = parent_location;
                attached.push(segment.to_string());
                seen.insert(dedup, Some(attached.clone()));
                location = Some(attached);
            }

            current_def = related_def;
        }
    }

    Ok(())
}

/// Moves every `{table}_`-prefixed key out of `attributes`, stripped of the
/// prefix. Deleting from the source set is what keeps sibling relations'
/// scans clean.
fn extract_prefixed(attributes: &mut Row, related: &EntityDef) -> Row {
    let prefix = related.alias_prefix();
    let keys: Vec<String> = attributes
        .keys()
        .filter(|key| key.starts_with(&prefix))
        .cloned()
        .collect();

    let mut extracted = Row::with_capacity(keys.len());
    for key in keys {
        if let Some(value) = attributes.remove(&key) {
            let stripped = key[prefix.len()..].to_string();
            if extracted.insert(stripped, value).is_some() {
                // Two source keys collapsed to one stripped name; the later
                // one wins. Reachable when table names prefix each other.
                crate::stitch_trace_collision!(&key, &prefix);
            }
        }
    }
    extracted
}

fn entity_at_mut<'e>(root: &'e mut Entity, location: &[String]) -> Result<&'e mut Entity> {
    let mut current = root;
    for name in location {
        current = current.relation_mut(name).ok_or_else(|| {
            StitchError::Mapping(format!(
                "hydrated relation `{name}` missing from entity tree"
            ))
        })?;
    }
    Ok(current)
}
