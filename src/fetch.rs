//! Connection-owning fetch API.
//!
//! [`Stitch`] wraps a `rusqlite::Connection` together with the entity
//! registry and the process-lifetime column cache. [`Fetch`] is the
//! per-query builder: accumulate relation paths and filters, then execute
//! with [`Fetch::one`] or [`Fetch::all`].

use rusqlite::{Connection, params_from_iter};

use crate::catalog::{ColumnCache, PragmaCatalog};
use crate::entity::{Entity, Row};
use crate::error::Result;
use crate::expr::{and, eq, val};
use crate::hydrate::hydrate_row;
use crate::path::{IntoJoinPaths, PathMap};
use crate::plan::plan;
use crate::schema::Registry;
use crate::sql::Sql;
use crate::value::SqlValue;

/// Database handle plus the metadata it serves.
pub struct Stitch {
    conn: Connection,
    registry: Registry,
    columns: ColumnCache,
}

impl Stitch {
    pub fn new(conn: Connection, registry: Registry) -> Self {
        Self {
            conn,
            registry,
            columns: ColumnCache::new(),
        }
    }

    /// Gets a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The shared column cache, exposed for manual invalidation.
    pub fn column_cache(&self) -> &ColumnCache {
        &self.columns
    }

    /// Starts a fetch for the named entity. The name resolves lazily, at
    /// execution time.
    pub fn fetch(&self, entity: &str) -> Fetch<'_> {
        Fetch {
            stitch: self,
            entity: entity.to_string(),
            paths: PathMap::new(),
            filter: Sql::empty(),
            columns: vec!["*".to_string()],
            limit: None,
        }
    }
}

/// One pending fetch: immutable-until-executed builder state.
pub struct Fetch<'a> {
    stitch: &'a Stitch,
    entity: String,
    paths: PathMap,
    filter: Sql,
    columns: Vec<String>,
    limit: Option<u32>,
}

impl Fetch<'_> {
    /// Adds relation paths to join-fetch. Repeatable; maps merge with
    /// later constraints overriding earlier ones for the same path.
    pub fn join_with(mut self, paths: impl IntoJoinPaths) -> Self {
        self.paths.merge(paths.into_paths());
        self
    }

    /// Sets the WHERE predicate, replacing any previous one.
    pub fn filter(mut self, predicate: Sql) -> Self {
        self.filter = predicate;
        self
    }

    /// Selects specific base columns instead of `*`.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(mut self, n: u32) -> Self {
        self.limit = Some(n);
        self
    }

    /// Fetches a single entity by primary key.
    pub fn one(mut self, id: impl Into<SqlValue>) -> Result<Option<Entity>> {
        let root = self.stitch.registry.entity(&self.entity)?;
        let key = eq(
            Sql::qualified(root.table.clone(), root.primary_key.clone()),
            val(id),
        );
        self.filter = if self.filter.is_empty() {
            key
        } else {
            and(self.filter, key)
        };
        self.limit = Some(1);

        let mut entities = self.run()?;
        Ok(entities.pop())
    }

    /// Fetches all matching entities.
    pub fn all(self) -> Result<Vec<Entity>> {
        self.run()
    }

    fn run(self) -> Result<Vec<Entity>> {
        let registry = &self.stitch.registry;
        let root = registry.entity(&self.entity)?;

        // Planning happens entirely before execution: a bad path or shape
        // aborts here, with no statement sent.
        let catalog = PragmaCatalog::new(&self.stitch.conn);
        let plan = plan(
            registry,
            &catalog,
            &self.stitch.columns,
            root,
            &self.paths,
            &self.columns,
        )?;
        let sql = plan.select_sql(&root.table, &self.filter, self.limit);
        let (text, params) = sql.build();
        crate::stitch_trace_query!(&text, params.len());

        let mut stmt = self.stitch.conn.prepare(&text)?;
        let labels: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let mut rows = stmt.query(params_from_iter(params))?;

        let mut entities = Vec::new();
        while let Some(db_row) = rows.next()? {
            let mut attributes = Row::with_capacity(labels.len());
            for (index, label) in labels.iter().enumerate() {
                attributes.insert(label.clone(), SqlValue::from(db_row.get_ref(index)?));
            }

            let mut entity = Entity::new(root.name.clone());
            hydrate_row(registry, root, &mut entity, &mut attributes, &self.paths)?;
            // Whatever hydration left behind is the root's own attribute set.
            entity.fill(attributes);
            entities.push(entity);
        }

        Ok(entities)
    }
}
