use std::borrow::Cow;

use super::tokens::Token;
use crate::value::SqlValue;

/// One atom of a SQL statement.
///
/// - `Token` - keywords and operators (SELECT, FROM, =, etc.)
/// - `Ident` - a quoted identifier ("table_name", "column_name")
/// - `Raw` - unquoted raw SQL text (compound keywords, literals)
/// - `Param` - a positional bind parameter carrying its value
#[derive(Clone, Debug)]
pub enum SqlChunk {
    /// SQL keywords and operators, rendered with automatic spacing rules
    Token(Token),

    /// Quoted identifier for user-provided names
    /// Renders as: "name" (with quotes)
    Ident(Cow<'static, str>),

    /// Raw SQL text, rendered as-is without quoting
    Raw(Cow<'static, str>),

    /// Bind parameter, rendered as a positional `?` placeholder
    Param(SqlValue),
}

impl SqlChunk {
    /// Write chunk content to buffer
    pub(crate) fn write(&self, buf: &mut impl core::fmt::Write) {
        match self {
            SqlChunk::Token(token) => {
                let _ = buf.write_str(token.as_str());
            }
            SqlChunk::Ident(name) => {
                let _ = buf.write_char('"');
                let _ = buf.write_str(name);
                let _ = buf.write_char('"');
            }
            SqlChunk::Raw(text) => {
                let _ = buf.write_str(text);
            }
            SqlChunk::Param(_) => {
                let _ = buf.write_char('?');
            }
        }
    }

    /// Check if this chunk is "word-like" (needs space separation from other word-like chunks)
    #[inline]
    pub(crate) const fn is_word_like(&self) -> bool {
        match self {
            SqlChunk::Token(t) => {
                !matches!(
                    t,
                    Token::LPAREN
                        | Token::RPAREN
                        | Token::COMMA
                        | Token::DOT
                        | Token::EQ
                        | Token::NE
                        | Token::LT
                        | Token::GT
                        | Token::LE
                        | Token::GE
                )
            }
            SqlChunk::Ident(_) | SqlChunk::Raw(_) | SqlChunk::Param(_) => true,
        }
    }
}

impl From<Token> for SqlChunk {
    #[inline]
    fn from(value: Token) -> Self {
        Self::Token(value)
    }
}
