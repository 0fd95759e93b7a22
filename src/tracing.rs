//! Tracing utilities for fetch observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]`
//! boilerplate at every call site.

/// Emit a debug-level tracing event with the SQL text and parameter count.
///
/// ```ignore
/// stitch_trace_query!(&sql_str, params.len());
/// ```
#[macro_export]
macro_rules! stitch_trace_query {
    ($sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(sql = %$sql, params = $param_count, "stitch.query");
    };
}

/// Emit a warning when a column key collides with a relation's alias
/// prefix, or when two keys strip down to the same attribute name.
#[macro_export]
macro_rules! stitch_trace_collision {
    ($key:expr, $prefix:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(key = %$key, prefix = %$prefix, "stitch.column_collision");
    };
}
