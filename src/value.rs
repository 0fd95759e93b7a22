//! Owned dynamic SQL values.
//!
//! Column values move through the engine as [`SqlValue`]s: rows come back
//! from the driver as maps of them, bind parameters are collected from them,
//! and hydrated entities store them. The variant set matches SQLite's storage
//! classes.

use core::fmt;

/// A single dynamically-typed column value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SqlValue {
    /// NULL value
    #[default]
    Null,
    /// Integer value (i64)
    Integer(i64),
    /// Real value (f64)
    Real(f64),
    /// Text value
    Text(String),
    /// Blob value
    Blob(Vec<u8>),
}

impl SqlValue {
    /// True for the NULL variant. Hydration's absence test lives on this.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Integer accessor, `None` for any other variant.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Text accessor, `None` for any other variant.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Integer(i) => write!(f, "{i}"),
            SqlValue::Real(r) => write!(f, "{r}"),
            SqlValue::Text(s) => write!(f, "'{s}'"),
            SqlValue::Blob(b) => write!(f, "<{} byte blob>", b.len()),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Integer(value as i64)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Integer(value as i64)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(value: Vec<u8>) -> Self {
        SqlValue::Blob(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}

#[cfg(feature = "rusqlite")]
mod rusqlite_impls {
    use super::SqlValue;

    impl rusqlite::ToSql for SqlValue {
        fn to_sql(&self) -> ::rusqlite::Result<::rusqlite::types::ToSqlOutput<'_>> {
            match self {
                SqlValue::Null => Ok(rusqlite::types::ToSqlOutput::Owned(
                    rusqlite::types::Value::Null,
                )),
                SqlValue::Integer(i) => Ok(rusqlite::types::ToSqlOutput::Owned(
                    rusqlite::types::Value::Integer(*i),
                )),
                SqlValue::Real(f) => Ok(rusqlite::types::ToSqlOutput::Owned(
                    rusqlite::types::Value::Real(*f),
                )),
                SqlValue::Text(s) => Ok(rusqlite::types::ToSqlOutput::Borrowed(
                    rusqlite::types::ValueRef::Text(s.as_bytes()),
                )),
                SqlValue::Blob(b) => Ok(rusqlite::types::ToSqlOutput::Borrowed(
                    rusqlite::types::ValueRef::Blob(b),
                )),
            }
        }
    }

    impl From<rusqlite::types::ValueRef<'_>> for SqlValue {
        fn from(value: rusqlite::types::ValueRef<'_>) -> Self {
            match value {
                rusqlite::types::ValueRef::Null => SqlValue::Null,
                rusqlite::types::ValueRef::Integer(i) => SqlValue::Integer(i),
                rusqlite::types::ValueRef::Real(f) => SqlValue::Real(f),
                rusqlite::types::ValueRef::Text(bytes) => {
                    SqlValue::Text(String::from_utf8_lossy(bytes).into_owned())
                }
                rusqlite::types::ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
            }
        }
    }
}
