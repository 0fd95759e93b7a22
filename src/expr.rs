//! Condition helpers for filters and join constraints.
//!
//! These build [`Sql`] predicate fragments. Column references come from
//! [`col`], literal values from [`val`]; the comparison helpers combine them.

use std::borrow::Cow;

use crate::sql::{Sql, SqlChunk, Token};
use crate::value::SqlValue;

/// Format a comparison with the given operator token
fn comparison(left: Sql, operator: Token, right: Sql) -> Sql {
    left.push(operator).append(right)
}

/// Create a column reference.
///
/// A dotted reference renders table-qualified; a bare name renders as a
/// plain identifier.
///
/// ```
/// # use stitch::expr::col;
/// assert_eq!(col("users.id").sql(), r#""users"."id""#);
/// assert_eq!(col("type").sql(), r#""type""#);
/// ```
pub fn col(reference: &str) -> Sql {
    match reference.split_once('.') {
        Some((table, column)) => Sql::qualified(
            Cow::Owned(table.to_string()),
            Cow::Owned(column.to_string()),
        ),
        None => Sql::ident(Cow::Owned(reference.to_string())),
    }
}

/// Create a bind-parameter value.
pub fn val(value: impl Into<SqlValue>) -> Sql {
    Sql::param(value)
}

/// Create an equality condition (=)
///
/// ```
/// # use stitch::expr::{col, eq, val};
/// let condition = eq(col("profiles.type"), val("buyer"));
/// assert_eq!(condition.sql(), r#""profiles"."type" = ?"#);
/// ```
pub fn eq(left: Sql, right: Sql) -> Sql {
    comparison(left, Token::EQ, right)
}

/// Create a not-equal condition (<>)
pub fn ne(left: Sql, right: Sql) -> Sql {
    comparison(left, Token::NE, right)
}

/// Create a greater-than condition (>)
pub fn gt(left: Sql, right: Sql) -> Sql {
    comparison(left, Token::GT, right)
}

/// Create a greater-than-or-equal condition (>=)
pub fn gte(left: Sql, right: Sql) -> Sql {
    comparison(left, Token::GE, right)
}

/// Create a less-than condition (<)
pub fn lt(left: Sql, right: Sql) -> Sql {
    comparison(left, Token::LT, right)
}

/// Create a less-than-or-equal condition (<=)
pub fn lte(left: Sql, right: Sql) -> Sql {
    comparison(left, Token::LE, right)
}

/// Combine two conditions with AND
pub fn and(left: Sql, right: Sql) -> Sql {
    left.push(Token::AND).append(right)
}

/// Combine two conditions with OR, parenthesized as a group
pub fn or(left: Sql, right: Sql) -> Sql {
    left.push(Token::OR).append(right).parens()
}

/// Create an IS NULL condition
pub fn is_null(expr: Sql) -> Sql {
    expr.push(Token::IS).push(Token::NULL)
}

/// Create an IS NOT NULL condition
pub fn is_not_null(expr: Sql) -> Sql {
    expr.push(Token::IS).push(Token::NOT).push(SqlChunk::Token(Token::NULL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_keeps_operand_order() {
        let sql = and(
            eq(col("profiles.type"), val("buyer")),
            is_not_null(col("profiles.country_id")),
        );
        assert_eq!(
            sql.sql(),
            r#""profiles"."type" = ? AND "profiles"."country_id" IS NOT NULL"#
        );
    }

    #[test]
    fn or_groups_with_parens() {
        let sql = or(eq(col("id"), val(1)), eq(col("id"), val(2)));
        assert_eq!(sql.sql(), r#"("id" = ? OR "id" = ?)"#);
    }
}
