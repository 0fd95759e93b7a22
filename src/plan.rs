//! Join planning: aliased columns and deduplicated LEFT JOINs.
//!
//! For every requested relation path the planner resolves the relation
//! chain, validates the relation shape, and emits the related table's
//! columns under the `{table}_` alias prefix plus one LEFT JOIN. A
//! relationship reached via several paths is planned once: the dedup key is
//! the ordered (source entity, target entity) pair.
//!
//! Planning performs no I/O beyond (cached) catalog lookups; any error here
//! aborts the fetch before a statement reaches the database.

use hashbrown::HashSet;

use crate::catalog::{ColumnCache, TableCatalog};
use crate::error::{Result, StitchError};
use crate::path::PathMap;
use crate::schema::{EntityDef, Registry, RelationShape};
use crate::sql::{Sql, SqlChunk, Token};

/// The planned select/join fragments for one fetch.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Column fragments in emission order: base columns first, then each
    /// planned relation's aliased columns.
    pub select: Vec<Sql>,
    /// One LEFT JOIN fragment per planned relationship.
    pub joins: Vec<Sql>,
}

impl Plan {
    /// Assembles the full SELECT statement.
    pub fn select_sql(&self, root_table: &str, filter: &Sql, limit: Option<u32>) -> Sql {
        let mut sql = Sql::token(Token::SELECT)
            .append(Sql::join(self.select.iter().cloned(), Token::COMMA))
            .push(Token::FROM)
            .push(SqlChunk::Ident(root_table.to_string().into()));
        for join in &self.joins {
            sql.append_mut(join.clone());
        }
        if !filter.is_empty() {
            sql = sql.push(Token::WHERE).append(filter.clone());
        }
        if let Some(n) = limit {
            sql = sql.push(Token::LIMIT).append(Sql::raw(n.to_string()));
        }
        sql
    }
}

/// Plans the joined fetch for `root` over the requested `paths`.
///
/// `columns` are the caller's base columns (`*` selects all of the root
/// table's columns); each is qualified with the root table unless it
/// already carries a qualifier.
pub fn plan(
    registry: &Registry,
    catalog: &dyn TableCatalog,
    cache: &ColumnCache,
    root: &EntityDef,
    paths: &PathMap,
    columns: &[String],
) -> Result<Plan> {
    let mut select: Vec<Sql> = columns
        .iter()
        .map(|column| qualify_column(&root.table, column))
        .collect();
    let mut joins: Vec<Sql> = Vec::new();
    let mut prefixes: Vec<String> = Vec::new();
    // Scoped to this one fetch; never shared across invocations.
    let mut planned: HashSet<(String, String)> = HashSet::new();

    for (path, constraint) in paths.iter() {
        let mut current = root;
        let segments: Vec<&str> = path.split('.').collect();
        let last = segments.len() - 1;

        for (index, segment) in segments.iter().enumerate() {
            let relation = registry.relation(current, segment)?;
            let related = registry.entity(&relation.target)?;

            if matches!(relation.shape, RelationShape::OwnedSet { .. }) {
                return Err(StitchError::UnsupportedShape {
                    entity: current.name.clone(),
                    relation: segment.to_string(),
                    shape: relation.shape.kind(),
                });
            }

            let dedup = (current.name.clone(), related.name.clone());
            if planned.insert(dedup) {
                let table_columns =
                    cache.get_or_populate(&related.table, || catalog.columns(&related.table))?;
                let prefix = related.alias_prefix();
                for column in table_columns.iter() {
                    select.push(
                        Sql::qualified(related.table.clone(), column.clone())
                            .alias(format!("{prefix}{column}")),
                    );
                }

                let mut on = relation.shape.join_condition(&current.table, &related.table);
                // The path's constraint belongs to the final segment only;
                // intermediate joins stay unconstrained.
                if index == last && !constraint.is_empty() {
                    on = on.push(Token::AND).append(constraint.clone());
                }
                joins.push(
                    Sql::raw("LEFT JOIN")
                        .push(SqlChunk::Ident(related.table.clone().into()))
                        .push(Token::ON)
                        .append(on),
                );
                prefixes.push(prefix);
            }

            current = related;
        }
    }

    // A bare caller column that matches a joined prefix would be consumed by
    // hydration as if it were that relation's column.
    for column in columns {
        if column.contains('.') {
            continue;
        }
        for prefix in &prefixes {
            if column.starts_with(prefix.as_str()) {
                crate::stitch_trace_collision!(column, prefix);
            }
        }
    }

    Ok(Plan { select, joins })
}

/// Qualifies a caller-given column with `table`. A reference that already
/// contains a qualifier passes through unchanged.
fn qualify_column(table: &str, column: &str) -> Sql {
    match column.split_once('.') {
        Some((qualifier, name)) if name == "*" => Sql::ident(qualifier.to_string())
            .push(Token::DOT)
            .push(Token::STAR),
        Some((qualifier, name)) => {
            Sql::qualified(qualifier.to_string(), name.to_string())
        }
        None if column == "*" => Sql::ident(table.to_string())
            .push(Token::DOT)
            .push(Token::STAR),
        None => Sql::qualified(table.to_string(), column.to_string()),
    }
}
