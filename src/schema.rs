//! Runtime entity and relation metadata.
//!
//! Hosts register their entities up front: table name, primary key, and the
//! relations each entity exposes. Planning and hydration resolve relation
//! names against this registry at run time.

use hashbrown::HashMap;

use crate::error::{Result, StitchError};
use crate::sql::{Sql, Token};
use crate::value::SqlValue;

/// How a single-row relationship is keyed.
///
/// Resolved once from the relation metadata; nothing downstream re-inspects
/// the relation kind after this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationShape {
    /// Single related row via a key the related table owns ("belongs to"):
    /// the current table's `foreign_key` points at the related table's
    /// `owner_key`.
    OwnerKeyed {
        foreign_key: String,
        owner_key: String,
    },
    /// Single related row via a key the current table owns ("has one"):
    /// the related table's `foreign_key` points back at the current table's
    /// `parent_key`.
    ParentKeyed {
        foreign_key: String,
        parent_key: String,
    },
    /// Collection-valued ("has many"). Never join-fetchable; requesting it
    /// in a join path is a configuration error.
    OwnedSet {
        foreign_key: String,
        parent_key: String,
    },
}

impl RelationShape {
    /// Human-readable kind, for error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            RelationShape::OwnerKeyed { .. } => "belongs-to",
            RelationShape::ParentKeyed { .. } => "has-one",
            RelationShape::OwnedSet { .. } => "has-many",
        }
    }

    /// The ON predicate joining `current_table` to `related_table`:
    /// `fk = key`, with each side qualified by the table that owns it.
    pub fn join_condition(&self, current_table: &str, related_table: &str) -> Sql {
        match self {
            RelationShape::OwnerKeyed {
                foreign_key,
                owner_key,
            } => Sql::qualified(current_table.to_string(), foreign_key.clone())
                .push(Token::EQ)
                .append(Sql::qualified(related_table.to_string(), owner_key.clone())),
            RelationShape::ParentKeyed {
                foreign_key,
                parent_key,
            }
            | RelationShape::OwnedSet {
                foreign_key,
                parent_key,
            } => Sql::qualified(related_table.to_string(), foreign_key.clone())
                .push(Token::EQ)
                .append(Sql::qualified(current_table.to_string(), parent_key.clone())),
        }
    }
}

/// One named relation on an entity.
#[derive(Debug, Clone)]
pub struct RelationDef {
    /// Relation name, as used in join paths
    pub name: String,
    /// Target entity name in the registry
    pub target: String,
    pub shape: RelationShape,
    /// Attributes for a stand-in entity when the related row is absent.
    /// `None` leaves the relation explicitly unset instead.
    pub default_attributes: Option<Vec<(String, SqlValue)>>,
}

impl RelationDef {
    /// A "has one" relation: the related table carries the foreign key.
    pub fn has_one(
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
        parent_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            shape: RelationShape::ParentKeyed {
                foreign_key: foreign_key.into(),
                parent_key: parent_key.into(),
            },
            default_attributes: None,
        }
    }

    /// A "belongs to" relation: the current table carries the foreign key.
    pub fn belongs_to(
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
        owner_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            shape: RelationShape::OwnerKeyed {
                foreign_key: foreign_key.into(),
                owner_key: owner_key.into(),
            },
            default_attributes: None,
        }
    }

    /// A "has many" relation. Registered for completeness and rejected by
    /// the join planner.
    pub fn has_many(
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
        parent_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            shape: RelationShape::OwnedSet {
                foreign_key: foreign_key.into(),
                parent_key: parent_key.into(),
            },
            default_attributes: None,
        }
    }

    /// Declares the default-attribute policy: when the related row is
    /// absent, hydration attaches a stand-in entity with these attributes.
    pub fn with_default<I, K, V>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<SqlValue>,
    {
        self.default_attributes = Some(
            attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }
}

/// One registered entity: table, primary key, relations.
#[derive(Debug, Clone)]
pub struct EntityDef {
    pub name: String,
    pub table: String,
    pub primary_key: String,
    relations: Vec<RelationDef>,
}

impl EntityDef {
    /// Creates an entity with the conventional `id` primary key.
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            primary_key: "id".to_string(),
            relations: Vec::new(),
        }
    }

    /// Overrides the primary-key column.
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    /// Adds a relation.
    pub fn relation(mut self, relation: RelationDef) -> Self {
        self.relations.push(relation);
        self
    }

    /// Looks up a relation by name.
    pub fn get_relation(&self, name: &str) -> Option<&RelationDef> {
        self.relations.iter().find(|r| r.name == name)
    }

    /// The column-alias prefix joined columns of this entity's table carry:
    /// `{table}_`. Planner and hydrator both derive it here so the two
    /// sides of the protocol cannot drift.
    pub fn alias_prefix(&self) -> String {
        let mut prefix = String::with_capacity(self.table.len() + 1);
        prefix.push_str(&self.table);
        prefix.push('_');
        prefix
    }
}

/// Entity registry, looked up by entity name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: HashMap<String, EntityDef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity, replacing any previous definition of the name.
    pub fn register(&mut self, entity: EntityDef) -> &mut Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    /// Looks up an entity by name.
    pub fn entity(&self, name: &str) -> Result<&EntityDef> {
        self.entities
            .get(name)
            .ok_or_else(|| StitchError::UnknownEntity(name.to_string()))
    }

    /// Resolves a relation name against an entity.
    pub fn relation<'r>(&self, entity: &'r EntityDef, name: &str) -> Result<&'r RelationDef> {
        entity
            .get_relation(name)
            .ok_or_else(|| StitchError::UnknownRelation {
                entity: entity.name.clone(),
                relation: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_condition_direction_depends_on_shape() {
        let has_one = RelationDef::has_one("profile", "profile", "user_id", "id");
        assert_eq!(
            has_one.shape.join_condition("users", "profiles").sql(),
            r#""profiles"."user_id" = "users"."id""#
        );

        let belongs_to = RelationDef::belongs_to("user", "user", "user_id", "id");
        assert_eq!(
            belongs_to.shape.join_condition("profiles", "users").sql(),
            r#""profiles"."user_id" = "users"."id""#
        );
    }

    #[test]
    fn registry_reports_unknown_names() {
        let mut registry = Registry::new();
        registry.register(EntityDef::new("user", "users"));
        let user = registry.entity("user").unwrap();

        assert!(matches!(
            registry.relation(user, "nope"),
            Err(StitchError::UnknownRelation { .. })
        ));
        assert!(matches!(
            registry.entity("ghost"),
            Err(StitchError::UnknownEntity(_))
        ));
    }
}
