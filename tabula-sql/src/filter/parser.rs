//! Recursive-descent parser for filter expressions.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expression := orExpr
//! orExpr     := andExpr ("OR" andExpr)*
//! andExpr    := notExpr ("AND" notExpr)*
//! notExpr    := "NOT" notExpr | primary
//! primary    := "(" expression ")" | comparison
//! comparison := ident ( simpleOp value
//!                     | "IS" ["NOT"] "NULL"
//!                     | ["NOT"] "IN" "(" value ("," value)* ")"
//!                     | ["NOT"] "LIKE" value
//!                     | ["NOT"] "BETWEEN" value "AND" value
//!                     | "CONTAINS" value
//!                     | "STARTS" "WITH" value
//!                     | "ENDS" "WITH" value )
//! ```
//!
//! Each method returns a [`Fragment`] of SQL text plus the values it bound.
//! Placeholder indices come from a single counter that advances as values
//! are consumed, so left-to-right source order is index order.

use crate::config::FilterConfig;
use crate::dialect::Placeholder;
use crate::error::FilterError;
use crate::lexer::{Keyword, Token, TokenKind};
use crate::validate::{sanitize_string_value, validate_qualified_identifier};
use crate::value::Value;

/// SQL text with the values bound by its placeholders, in order.
#[derive(Debug, Default)]
pub(super) struct Fragment {
    pub(super) sql: String,
    pub(super) params: Vec<Value>,
}

impl Fragment {
    /// Combine two fragments under a boolean operator; params stay left to right.
    fn join(mut self, op: Keyword, rhs: Self) -> Self {
        self.sql.push(' ');
        self.sql.push_str(op.as_str());
        self.sql.push(' ');
        self.sql.push_str(&rhs.sql);
        self.params.extend(rhs.params);
        self
    }

    fn wrap(self, prefix: &str, suffix: &str) -> Self {
        Self {
            sql: format!("{prefix}{}{suffix}", self.sql),
            params: self.params,
        }
    }
}

/// Pattern operators that desugar to `LIKE`.
#[derive(Debug, Clone, Copy)]
enum Pattern {
    Contains,
    StartsWith,
    EndsWith,
}

impl Pattern {
    const fn operator(self) -> &'static str {
        match self {
            Self::Contains => "CONTAINS",
            Self::StartsWith => "STARTS WITH",
            Self::EndsWith => "ENDS WITH",
        }
    }

    fn apply(self, value: &str) -> String {
        match self {
            Self::Contains => format!("%{value}%"),
            Self::StartsWith => format!("{value}%"),
            Self::EndsWith => format!("%{value}"),
        }
    }
}

pub(super) struct Parser<'t, 'c, P: ?Sized> {
    tokens: &'t [Token],
    pos: usize,
    placeholder: &'c P,
    config: &'c FilterConfig,
    /// `None` once the index space is exhausted.
    next_index: Option<usize>,
    depth: usize,
}

impl<'t, 'c, P: Placeholder + ?Sized> Parser<'t, 'c, P> {
    pub(super) const fn new(
        tokens: &'t [Token],
        placeholder: &'c P,
        config: &'c FilterConfig,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            placeholder,
            config,
            next_index: Some(config.start_index),
            depth: 0,
        }
    }

    /// Parse a complete expression; leftover tokens are an error.
    pub(super) fn parse(mut self) -> Result<Fragment, FilterError> {
        let fragment = self.parse_or()?;

        if let Some(token) = self.peek() {
            return Err(FilterError::TrailingInput {
                found: token.to_string(),
                position: token.offset,
            });
        }

        Ok(fragment)
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    /// Consume and return the next token, or fail with what was expected.
    fn next_token(&mut self, expected: &'static str) -> Result<&'t Token, FilterError> {
        let token = self
            .peek()
            .ok_or(FilterError::UnexpectedEnd { expected })?;
        self.pos += 1;
        Ok(token)
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.peek().is_some_and(|t| t.is_keyword(keyword)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_kind(&mut self, kind: TokenKind) -> bool {
        if self.peek().is_some_and(|t| t.kind == kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(
        &mut self,
        keyword: Keyword,
        expected: &'static str,
    ) -> Result<(), FilterError> {
        let token = self.next_token(expected)?;
        if token.is_keyword(keyword) {
            Ok(())
        } else {
            Err(unexpected(expected, token))
        }
    }

    fn expect_kind(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), FilterError> {
        let token = self.next_token(expected)?;
        if token.kind == kind {
            Ok(())
        } else {
            Err(unexpected(expected, token))
        }
    }

    fn enter(&mut self, token_offset: usize) -> Result<(), FilterError> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(FilterError::NestingTooDeep {
                max: self.config.max_depth,
                position: token_offset,
            });
        }
        Ok(())
    }

    const fn leave(&mut self) {
        self.depth -= 1;
    }

    // ------------------------------------------------------------------
    // Grammar
    // ------------------------------------------------------------------

    fn parse_or(&mut self) -> Result<Fragment, FilterError> {
        let mut left = self.parse_and()?;
        while self.eat_keyword(Keyword::Or) {
            let right = self.parse_and()?;
            left = left.join(Keyword::Or, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Fragment, FilterError> {
        let mut left = self.parse_not()?;
        while self.eat_keyword(Keyword::And) {
            let right = self.parse_not()?;
            left = left.join(Keyword::And, right);
        }
        Ok(left)
    }

    /// `NOT` here is always boolean negation. The `NOT IN` / `NOT LIKE` /
    /// `NOT BETWEEN` modifiers are only recognized inside `parse_comparison`,
    /// directly after the column.
    fn parse_not(&mut self) -> Result<Fragment, FilterError> {
        let Some(token) = self.peek() else {
            return self.parse_primary();
        };
        if !token.is_keyword(Keyword::Not) {
            return self.parse_primary();
        }

        self.pos += 1;
        self.enter(token.offset)?;
        let inner = self.parse_not()?;
        self.leave();
        Ok(inner.wrap("NOT ", ""))
    }

    fn parse_primary(&mut self) -> Result<Fragment, FilterError> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::LParen => {
                self.pos += 1;
                self.enter(token.offset)?;
                let inner = self.parse_or()?;
                self.expect_kind(TokenKind::RParen, "`)`")?;
                self.leave();
                Ok(inner.wrap("(", ")"))
            },
            _ => self.parse_comparison(),
        }
    }

    fn parse_comparison(&mut self) -> Result<Fragment, FilterError> {
        let column = self.parse_column()?;
        // Compound-operator modifier, not boolean negation
        let negated = self.eat_keyword(Keyword::Not);
        let not = if negated { "NOT " } else { "" };

        let op = self.next_token("comparison operator")?;
        let mut fragment = Fragment::default();

        match op.kind {
            TokenKind::Op if !negated => {
                let value = self.parse_value()?;
                let placeholder = self.bind(&mut fragment, value)?;
                fragment.sql = format!("{column} {} {placeholder}", op.text);
            },
            TokenKind::Keyword(Keyword::Is) if !negated => {
                let is_not = self.eat_keyword(Keyword::Not);
                self.expect_keyword(Keyword::Null, "NULL")?;
                fragment.sql = if is_not {
                    format!("{column} IS NOT NULL")
                } else {
                    format!("{column} IS NULL")
                };
            },
            TokenKind::Keyword(Keyword::In) => {
                self.expect_kind(TokenKind::LParen, "`(` after IN")?;
                let mut placeholders = Vec::new();
                loop {
                    let value = self.parse_value()?;
                    placeholders.push(self.bind(&mut fragment, value)?);
                    if !self.eat_kind(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect_kind(TokenKind::RParen, "`,` or `)`")?;
                fragment.sql = format!("{column} {not}IN ({})", placeholders.join(", "));
            },
            TokenKind::Keyword(Keyword::Like) => {
                let value = self.parse_value()?;
                let placeholder = self.bind(&mut fragment, value)?;
                fragment.sql = format!("{column} {not}LIKE {placeholder}");
            },
            TokenKind::Keyword(Keyword::Between) => {
                let low = self.parse_value()?;
                let low = self.bind(&mut fragment, low)?;
                self.expect_keyword(Keyword::And, "AND in BETWEEN")?;
                let high = self.parse_value()?;
                let high = self.bind(&mut fragment, high)?;
                fragment.sql = format!("{column} {not}BETWEEN {low} AND {high}");
            },
            TokenKind::Keyword(Keyword::Contains) if !negated => {
                let placeholder = self.parse_pattern(&mut fragment, Pattern::Contains)?;
                fragment.sql = format!("{column} LIKE {placeholder}");
            },
            TokenKind::Keyword(Keyword::Starts) if !negated => {
                self.expect_keyword(Keyword::With, "WITH after STARTS")?;
                let placeholder = self.parse_pattern(&mut fragment, Pattern::StartsWith)?;
                fragment.sql = format!("{column} LIKE {placeholder}");
            },
            TokenKind::Keyword(Keyword::Ends) if !negated => {
                self.expect_keyword(Keyword::With, "WITH after ENDS")?;
                let placeholder = self.parse_pattern(&mut fragment, Pattern::EndsWith)?;
                fragment.sql = format!("{column} LIKE {placeholder}");
            },
            _ if negated => return Err(unexpected("IN, LIKE or BETWEEN after NOT", op)),
            _ => return Err(unexpected("comparison operator", op)),
        }

        Ok(fragment)
    }

    /// Consume a column reference and validate it before anything else.
    fn parse_column(&mut self) -> Result<&'t str, FilterError> {
        let token = self.next_token("column name")?;
        if token.kind != TokenKind::Ident {
            return Err(unexpected("column name", token));
        }

        validate_qualified_identifier(&token.text).map_err(|source| {
            FilterError::InvalidIdentifier {
                column: token.text.clone(),
                position: token.offset,
                source,
            }
        })?;

        let allowed = &self.config.allowed_columns;
        if !allowed.is_empty() && !allowed.iter().any(|c| *c == token.text) {
            return Err(FilterError::ColumnNotAllowed {
                column: token.text.clone(),
                position: token.offset,
            });
        }

        Ok(&token.text)
    }

    fn parse_value(&mut self) -> Result<Value, FilterError> {
        let token = self.next_token("value")?;
        match token.kind {
            TokenKind::Str => self.string_value(token).map(Value::String),
            TokenKind::Number => parse_number(token),
            _ => Err(unexpected("value", token)),
        }
    }

    /// Parse the operand of CONTAINS / STARTS WITH / ENDS WITH and bind the
    /// wildcarded pattern.
    fn parse_pattern(
        &mut self,
        fragment: &mut Fragment,
        pattern: Pattern,
    ) -> Result<String, FilterError> {
        let token = self.next_token("string value")?;
        if token.kind != TokenKind::Str {
            return Err(FilterError::ExpectedString {
                operator: pattern.operator(),
                found: token.to_string(),
                position: token.offset,
            });
        }

        let value = self.string_value(token)?;
        self.bind(fragment, Value::String(pattern.apply(&value)))
    }

    fn string_value(&self, token: &Token) -> Result<String, FilterError> {
        sanitize_string_value(&token.text, self.config.max_value_len).map_err(|source| {
            FilterError::InvalidValue {
                position: token.offset,
                source,
            }
        })
    }

    /// Push `value` and return its placeholder; the index advances by one.
    ///
    /// Called right after the value's token is consumed, which supplies the
    /// error position when the index space runs out.
    fn bind(&mut self, fragment: &mut Fragment, value: Value) -> Result<String, FilterError> {
        let Some(index) = self.next_index else {
            let position = self
                .tokens
                .get(self.pos.saturating_sub(1))
                .map_or(0, |t| t.offset);
            return Err(FilterError::PlaceholderOverflow { position });
        };
        let placeholder = self.placeholder.placeholder(index);
        self.next_index = index.checked_add(1);
        fragment.params.push(value);
        Ok(placeholder)
    }
}

fn parse_number(token: &Token) -> Result<Value, FilterError> {
    let out_of_range = || FilterError::NumberOutOfRange {
        text: token.text.clone(),
        position: token.offset,
    };

    if token.text.contains('.') {
        let value: f64 = token.text.parse().map_err(|_| out_of_range())?;
        if !value.is_finite() {
            return Err(out_of_range());
        }
        Ok(Value::Float(value))
    } else {
        token
            .text
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| out_of_range())
    }
}

fn unexpected(expected: &'static str, token: &Token) -> FilterError {
    FilterError::UnexpectedToken {
        expected,
        found: token.to_string(),
        position: token.offset,
    }
}
