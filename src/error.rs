use thiserror::Error;

#[derive(Debug, Error)]
pub enum StitchError {
    /// No entity registered under this name
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// A path segment named a relation the entity does not expose
    #[error("unknown relation `{relation}` on entity `{entity}`")]
    UnknownRelation { entity: String, relation: String },

    /// A join path reached a collection-valued relation
    #[error(
        "join_with: only has-one and belongs-to relations can be joined, `{relation}` on `{entity}` is {shape}"
    )]
    UnsupportedShape {
        entity: String,
        relation: String,
        shape: &'static str,
    },

    /// The joined columns for a table did not include its key column
    #[error("missing key column `{column}` in joined columns for table `{table}`")]
    MissingKeyColumn { table: String, column: String },

    /// Error listing columns from a table catalog
    #[error("catalog error: {0}")]
    Catalog(String),

    /// Error mapping data
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Rusqlite specific errors
    #[cfg(feature = "rusqlite")]
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

/// Result type for fetch operations
pub type Result<T> = std::result::Result<T, StitchError>;
