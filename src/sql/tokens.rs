/// SQL keywords and punctuation used by the fragment builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Token {
    SELECT,
    FROM,
    WHERE,
    ON,
    AS,
    AND,
    OR,
    NOT,
    IS,
    NULL,
    LIMIT,
    COMMA,
    DOT,
    STAR,
    LPAREN,
    RPAREN,
    EQ,
    NE,
    LT,
    GT,
    LE,
    GE,
}

impl Token {
    /// The rendered text of this token.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Token::SELECT => "SELECT",
            Token::FROM => "FROM",
            Token::WHERE => "WHERE",
            Token::ON => "ON",
            Token::AS => "AS",
            Token::AND => "AND",
            Token::OR => "OR",
            Token::NOT => "NOT",
            Token::IS => "IS",
            Token::NULL => "NULL",
            Token::LIMIT => "LIMIT",
            Token::COMMA => ",",
            Token::DOT => ".",
            Token::STAR => "*",
            Token::LPAREN => "(",
            Token::RPAREN => ")",
            Token::EQ => "=",
            Token::NE => "<>",
            Token::LT => "<",
            Token::GT => ">",
            Token::LE => "<=",
            Token::GE => ">=",
        }
    }

    /// Comparison operators get a space on both sides.
    pub const fn is_operator(&self) -> bool {
        matches!(
            self,
            Token::EQ | Token::NE | Token::LT | Token::GT | Token::LE | Token::GE
        )
    }
}
