//! Token definitions.

use std::fmt;

/// Keywords of the filter language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    /// `AND`, also the separator inside `BETWEEN`.
    And,
    /// `OR`
    Or,
    /// `NOT`, either negation or an `IN`/`LIKE`/`BETWEEN` modifier.
    Not,
    /// `IN`
    In,
    /// `LIKE`
    Like,
    /// `IS`
    Is,
    /// `NULL`
    Null,
    /// `BETWEEN`
    Between,
    /// `CONTAINS`
    Contains,
    /// `STARTS`, always followed by `WITH`.
    Starts,
    /// `ENDS`, always followed by `WITH`.
    Ends,
    /// `WITH`
    With,
}

impl Keyword {
    /// Look up a lexed word, ignoring case.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        let keyword = match word.to_ascii_uppercase().as_str() {
            "AND" => Self::And,
            "OR" => Self::Or,
            "NOT" => Self::Not,
            "IN" => Self::In,
            "LIKE" => Self::Like,
            "IS" => Self::Is,
            "NULL" => Self::Null,
            "BETWEEN" => Self::Between,
            "CONTAINS" => Self::Contains,
            "STARTS" => Self::Starts,
            "ENDS" => Self::Ends,
            "WITH" => Self::With,
            _ => return None,
        };
        Some(keyword)
    }

    /// Canonical uppercase spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::In => "IN",
            Self::Like => "LIKE",
            Self::Is => "IS",
            Self::Null => "NULL",
            Self::Between => "BETWEEN",
            Self::Contains => "CONTAINS",
            Self::Starts => "STARTS",
            Self::Ends => "ENDS",
            Self::With => "WITH",
        }
    }
}

/// Token categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Column reference, possibly dotted (`users.email`).
    Ident,
    /// Integer or decimal literal, possibly negative.
    Number,
    /// Single-quoted string literal; `text` holds the unescaped content.
    Str,
    /// Comparison operator: `=`, `!=`, `<>`, `>`, `>=`, `<`, `<=`.
    Op,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// A reserved word of the filter language.
    Keyword(Keyword),
}

/// A lexed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What the token is.
    pub kind: TokenKind,
    /// Source text; unescaped content for string literals.
    pub text: String,
    /// Byte offset of the token's first character.
    pub offset: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// Returns `true` if this token is the given keyword.
    #[inline]
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Str => write!(f, "'{}'", self.text.replace('\'', "''")),
            _ => f.write_str(&self.text),
        }
    }
}
