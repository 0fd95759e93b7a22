//! Table column catalogs and the process-lifetime column cache.
//!
//! The planner needs "list the column names of table T" to emit aliased
//! select lists. [`TableCatalog`] is the lookup interface; [`ColumnCache`]
//! memoizes lookups for the life of the process. Table schemas are assumed
//! immutable while the process runs; the cache never invalidates on its
//! own, only via [`ColumnCache::clear`].

use std::sync::{Arc, RwLock};

use hashbrown::HashMap;

use crate::error::Result;

/// Column-name lookup for a table.
pub trait TableCatalog {
    /// Ordered column names of `table`.
    fn columns(&self, table: &str) -> Result<Vec<String>>;
}

/// Get-or-populate cache over any [`TableCatalog`].
///
/// Read-mostly shared state: concurrent fetches may populate the same table
/// redundantly, which is harmless (idempotent recomputation, last writer
/// wins).
#[derive(Debug, Default)]
pub struct ColumnCache {
    cached: RwLock<HashMap<String, Arc<[String]>>>,
}

impl ColumnCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached columns for `table`, populating from `populate`
    /// on a miss.
    pub fn get_or_populate(
        &self,
        table: &str,
        populate: impl FnOnce() -> Result<Vec<String>>,
    ) -> Result<Arc<[String]>> {
        if let Some(columns) = self
            .cached
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(table)
        {
            return Ok(Arc::clone(columns));
        }

        let columns: Arc<[String]> = populate()?.into();
        self.cached
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(table.to_string(), Arc::clone(&columns));
        Ok(columns)
    }

    /// Drops all cached listings.
    pub fn clear(&self) {
        self.cached
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

/// Catalog backed by SQLite's `PRAGMA table_info`.
#[cfg(feature = "rusqlite")]
pub struct PragmaCatalog<'c> {
    conn: &'c rusqlite::Connection,
}

#[cfg(feature = "rusqlite")]
impl<'c> PragmaCatalog<'c> {
    pub fn new(conn: &'c rusqlite::Connection) -> Self {
        Self { conn }
    }
}

#[cfg(feature = "rusqlite")]
impl TableCatalog for PragmaCatalog<'_> {
    fn columns(&self, table: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingCatalog {
        calls: Cell<usize>,
    }

    impl TableCatalog for CountingCatalog {
        fn columns(&self, _table: &str) -> Result<Vec<String>> {
            self.calls.set(self.calls.get() + 1);
            Ok(vec!["id".to_string()])
        }
    }

    #[test]
    fn cache_populates_once_per_table() {
        let catalog = CountingCatalog { calls: Cell::new(0) };
        let cache = ColumnCache::new();

        for _ in 0..3 {
            let cols = cache
                .get_or_populate("users", || catalog.columns("users"))
                .unwrap();
            assert_eq!(&*cols, &["id".to_string()][..]);
        }
        assert_eq!(catalog.calls.get(), 1);

        cache.clear();
        cache
            .get_or_populate("users", || catalog.columns("users"))
            .unwrap();
        assert_eq!(catalog.calls.get(), 2);
    }
}
