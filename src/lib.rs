//! Join-based eager loading for single-row relations.
//!
//! `stitch` fetches an entity together with its has-one / belongs-to
//! relations, including dotted nested paths like `profile.city.country`,
//! in a single `LEFT JOIN` query, instead of one follow-up query per
//! relation. Joined columns travel under a `{table}_` alias prefix and are
//! demultiplexed back into a nested entity graph per row.
//!
//! ```no_run
//! use stitch::prelude::*;
//!
//! # fn main() -> stitch::Result<()> {
//! let mut registry = Registry::new();
//! registry
//!     .register(
//!         EntityDef::new("user", "users")
//!             .relation(RelationDef::has_one("profile", "profile", "user_id", "id")),
//!     )
//!     .register(EntityDef::new("profile", "profiles"));
//!
//! let conn = rusqlite::Connection::open_in_memory()?;
//! let db = Stitch::new(conn, registry);
//!
//! let user = db
//!     .fetch("user")
//!     .join_with(("profile", eq(col("profiles.type"), val("buyer"))))
//!     .one(1)?;
//! # let _ = user;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod entity;
pub mod error;
pub mod expr;
#[cfg(feature = "rusqlite")]
pub mod fetch;
pub mod hydrate;
pub mod path;
pub mod plan;
pub mod schema;
pub mod sql;
mod tracing;
pub mod value;

pub use error::{Result, StitchError};

/// Common imports for building registries and fetches.
pub mod prelude {
    pub use crate::catalog::{ColumnCache, TableCatalog};
    pub use crate::entity::{Entity, Row};
    pub use crate::error::{Result, StitchError};
    pub use crate::expr::{and, col, eq, gt, gte, is_not_null, is_null, lt, lte, ne, or, val};
    #[cfg(feature = "rusqlite")]
    pub use crate::fetch::{Fetch, Stitch};
    pub use crate::path::{IntoJoinPaths, PathMap};
    pub use crate::schema::{EntityDef, Registry, RelationDef, RelationShape};
    pub use crate::sql::{Sql, SqlChunk, Token};
    pub use crate::value::SqlValue;
}
