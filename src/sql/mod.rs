//! SQL fragment builder with flat chunk storage.
//!
//! Statements are assembled as sequences of [`SqlChunk`]s (keywords, quoted
//! identifiers, raw text, bind parameters) and rendered in one pass with
//! automatic spacing. Parameters stay attached to the fragment until
//! [`Sql::build`] collects them in placeholder order.

mod chunk;
mod tokens;

pub use chunk::SqlChunk;
pub use tokens::Token;

use core::fmt::{Display, Write};
use std::borrow::Cow;

use smallvec::SmallVec;

use crate::value::SqlValue;

/// An owned SQL fragment.
///
/// Uses `SmallVec<[SqlChunk; 8]>` for inline storage of typical fragments
/// without heap allocation.
#[derive(Debug, Clone, Default)]
pub struct Sql {
    pub chunks: SmallVec<[SqlChunk; 8]>,
}

impl Sql {
    // ==================== constructors ====================

    /// Creates an empty fragment
    #[inline]
    pub const fn empty() -> Self {
        Self {
            chunks: SmallVec::new_const(),
        }
    }

    /// Creates a fragment with a single token
    #[inline]
    pub fn token(t: Token) -> Self {
        Self {
            chunks: smallvec::smallvec![SqlChunk::Token(t)],
        }
    }

    /// Creates a fragment with a quoted identifier
    #[inline]
    pub fn ident(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            chunks: smallvec::smallvec![SqlChunk::Ident(name.into())],
        }
    }

    /// Creates a fragment with raw text (unquoted)
    #[inline]
    pub fn raw(text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            chunks: smallvec::smallvec![SqlChunk::Raw(text.into())],
        }
    }

    /// Creates a fragment with a single bind parameter
    #[inline]
    pub fn param(value: impl Into<SqlValue>) -> Self {
        Self {
            chunks: smallvec::smallvec![SqlChunk::Param(value.into())],
        }
    }

    /// Creates a qualified reference: "table"."column"
    pub fn qualified(
        table: impl Into<Cow<'static, str>>,
        column: impl Into<Cow<'static, str>>,
    ) -> Self {
        Sql::ident(table).push(Token::DOT).push(SqlChunk::Ident(column.into()))
    }

    // ==================== builder methods ====================

    /// Append another fragment (flat extend)
    #[inline]
    pub fn append(mut self, other: impl Into<Sql>) -> Self {
        let other = other.into();

        if self.chunks.is_empty() {
            return other;
        }
        if other.chunks.is_empty() {
            return self;
        }

        self.chunks.extend(other.chunks);
        self
    }

    #[inline]
    pub fn append_mut(&mut self, other: impl Into<Sql>) {
        let other = other.into();

        if self.chunks.is_empty() {
            self.chunks = other.chunks;
            return;
        }
        if other.chunks.is_empty() {
            return;
        }

        self.chunks.extend(other.chunks);
    }

    /// Push a single chunk
    #[inline]
    pub fn push(mut self, chunk: impl Into<SqlChunk>) -> Self {
        self.chunks.push(chunk.into());
        self
    }

    #[inline]
    pub fn push_mut(&mut self, chunk: impl Into<SqlChunk>) {
        self.chunks.push(chunk.into());
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    // ==================== combinators ====================

    /// Joins multiple fragments with a separator token
    pub fn join<T>(sqls: T, separator: Token) -> Sql
    where
        T: IntoIterator<Item = Sql>,
    {
        let mut iter = sqls.into_iter();
        let Some(first) = iter.next() else {
            return Sql::empty();
        };

        let mut result = first;
        for item in iter {
            result.chunks.push(SqlChunk::Token(separator));
            if !item.chunks.is_empty() {
                result.chunks.extend(item.chunks);
            }
        }
        result
    }

    /// Wrap in parentheses: (self)
    #[inline]
    pub fn parens(self) -> Self {
        Sql::token(Token::LPAREN).append(self).push(Token::RPAREN)
    }

    /// Creates an aliased version: self AS "name"
    pub fn alias(self, name: impl Into<Cow<'static, str>>) -> Sql {
        self.push(Token::AS).push(SqlChunk::Ident(name.into()))
    }

    // ==================== output methods ====================

    /// Returns the SQL string with positional `?` placeholders.
    pub fn sql(&self) -> String {
        let sql_cap = self.chunks.len().saturating_mul(8).max(128);
        let mut buf = String::with_capacity(sql_cap);
        for (i, chunk) in self.chunks.iter().enumerate() {
            chunk.write(&mut buf);
            if self.needs_space(i) {
                let _ = buf.write_char(' ');
            }
        }
        buf
    }

    /// Generates the SQL string and collects parameter references in a single
    /// pass, in placeholder order. This is the driver execution path.
    pub fn build(&self) -> (String, Vec<&SqlValue>) {
        let sql_cap = self.chunks.len().saturating_mul(8).max(128);
        let mut buf = String::with_capacity(sql_cap);
        let mut params: Vec<&SqlValue> = Vec::new();

        for (i, chunk) in self.chunks.iter().enumerate() {
            chunk.write(&mut buf);
            if let SqlChunk::Param(value) = chunk {
                params.push(value);
            }
            if self.needs_space(i) {
                let _ = buf.write_char(' ');
            }
        }

        (buf, params)
    }

    /// Returns an iterator over parameter values in placeholder order.
    pub fn params(&self) -> impl Iterator<Item = &SqlValue> {
        self.chunks.iter().filter_map(|chunk| {
            if let SqlChunk::Param(value) = chunk {
                Some(value)
            } else {
                None
            }
        })
    }

    fn needs_space(&self, index: usize) -> bool {
        let Some(next) = self.chunks.get(index + 1) else {
            return false;
        };

        let current = &self.chunks[index];
        chunk_needs_space(current, next)
    }
}

/// Canonical spacing logic for chunk rendering.
fn chunk_needs_space(current: &SqlChunk, next: &SqlChunk) -> bool {
    // No space if current raw text ends with space
    if let SqlChunk::Raw(text) = current {
        if text.ends_with(' ') {
            return false;
        }
    }

    // No space if next raw text starts with space
    if let SqlChunk::Raw(text) = next {
        if text.starts_with(' ') {
            return false;
        }
    }

    match (current, next) {
        // No space before closing/separator punctuation
        (_, SqlChunk::Token(Token::RPAREN | Token::COMMA | Token::DOT)) => false,
        // No space after opening punctuation
        (SqlChunk::Token(Token::LPAREN | Token::DOT), _) => false,
        // Space after comma
        (SqlChunk::Token(Token::COMMA), _) => true,
        // Space after closing paren if next is word-like (e.g., ") FROM")
        (SqlChunk::Token(Token::RPAREN), next) => next.is_word_like(),
        // Space before opening paren if preceded by word-like (e.g., "AS (")
        (current, SqlChunk::Token(Token::LPAREN)) => current.is_word_like(),
        // Space around comparison operators
        (SqlChunk::Token(t), _) if t.is_operator() => true,
        (_, SqlChunk::Token(t)) if t.is_operator() => true,
        // Space between all word-like chunks
        _ => current.is_word_like() && next.is_word_like(),
    }
}

// ==================== trait implementations ====================

impl From<Token> for Sql {
    fn from(value: Token) -> Self {
        Sql::token(value)
    }
}

impl Display for Sql {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let params: Vec<_> = self.params().collect();
        write!(f, r#"sql: "{}", params: {:?}"#, self.sql(), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_renders_without_dot_spacing() {
        let sql = Sql::qualified("users", "id");
        assert_eq!(sql.sql(), r#""users"."id""#);
    }

    #[test]
    fn alias_renders_as_quoted() {
        let sql = Sql::qualified("profiles", "id").alias("profiles_id");
        assert_eq!(sql.sql(), r#""profiles"."id" AS "profiles_id""#);
    }

    #[test]
    fn select_list_spacing() {
        let cols = Sql::join(
            [
                Sql::ident("users").push(Token::DOT).push(Token::STAR),
                Sql::qualified("profiles", "id").alias("profiles_id"),
            ],
            Token::COMMA,
        );
        let sql = Sql::token(Token::SELECT)
            .append(cols)
            .push(Token::FROM)
            .push(SqlChunk::Ident("users".into()));
        assert_eq!(
            sql.sql(),
            r#"SELECT "users".*, "profiles"."id" AS "profiles_id" FROM "users""#
        );
    }

    #[test]
    fn params_collect_in_order() {
        let sql = Sql::qualified("profiles", "type")
            .push(Token::EQ)
            .append(Sql::param("buyer"))
            .push(Token::AND)
            .append(Sql::qualified("profiles", "id"))
            .push(Token::GT)
            .append(Sql::param(1i64));
        let (text, params) = sql.build();
        assert_eq!(text, r#""profiles"."type" = ? AND "profiles"."id" > ?"#);
        assert_eq!(params.len(), 2);
        assert_eq!(params[0], &SqlValue::Text("buyer".into()));
        assert_eq!(params[1], &SqlValue::Integer(1));
    }
}
