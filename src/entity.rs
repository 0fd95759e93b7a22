//! In-memory entities: an attribute map plus attached relations.

use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::value::SqlValue;

/// One flat result row / attribute set: column label to value.
pub type Row = HashMap<String, SqlValue>;

/// A hydrated entity.
///
/// Relations are kept in attachment order. A slot holding `None` records
/// that the relation was loaded and the related row was absent, distinct
/// from a relation that was never requested, which has no slot at all.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    entity: String,
    attributes: Row,
    relations: Vec<(String, Option<Entity>)>,
}

impl Entity {
    /// Creates an empty entity of the named type.
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            attributes: Row::new(),
            relations: Vec::new(),
        }
    }

    /// Creates an entity directly from an attribute set, no casting applied.
    pub fn from_attributes(entity: impl Into<String>, attributes: Row) -> Self {
        Self {
            entity: entity.into(),
            attributes,
            relations: Vec::new(),
        }
    }

    /// The entity type name this instance was built as.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn attr(&self, name: &str) -> Option<&SqlValue> {
        self.attributes.get(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn attributes(&self) -> &Row {
        &self.attributes
    }

    /// Merges an attribute set into this entity, overwriting existing keys.
    pub fn fill(&mut self, attributes: Row) {
        if self.attributes.is_empty() {
            self.attributes = attributes;
            return;
        }
        self.attributes.extend(attributes);
    }

    /// The related entity attached under `name`. `None` when the relation
    /// was absent or never loaded; see [`Entity::has_relation`] for the
    /// difference.
    pub fn relation(&self, name: &str) -> Option<&Entity> {
        self.relations
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, e)| e.as_ref())
    }

    pub(crate) fn relation_mut(&mut self, name: &str) -> Option<&mut Entity> {
        self.relations
            .iter_mut()
            .find(|(n, _)| n == name)
            .and_then(|(_, e)| e.as_mut())
    }

    /// Whether a slot exists for `name`, i.e. the relation was loaded (even
    /// if the related row turned out to be absent).
    pub fn has_relation(&self, name: &str) -> bool {
        self.relations.iter().any(|(n, _)| n == name)
    }

    /// Sets (or replaces) the relation slot under `name`.
    pub fn set_relation(&mut self, name: impl Into<String>, related: Option<Entity>) {
        let name = name.into();
        if let Some(slot) = self.relations.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = related;
        } else {
            self.relations.push((name, related));
        }
    }

    /// Flattens the entity and its relation tree into a canonical sorted
    /// key/value form: own attributes under their names, nested entities
    /// under `relation.attribute` keys, absent relations as a single
    /// `relation` key holding NULL.
    pub fn flatten(&self) -> BTreeMap<String, SqlValue> {
        let mut out = BTreeMap::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut BTreeMap<String, SqlValue>) {
        for (name, value) in &self.attributes {
            out.insert(format!("{prefix}{name}"), value.clone());
        }
        for (name, related) in &self.relations {
            match related {
                Some(entity) => {
                    entity.flatten_into(&format!("{prefix}{name}."), out);
                }
                None => {
                    out.insert(format!("{prefix}{name}"), SqlValue::Null);
                }
            }
        }
    }
}
