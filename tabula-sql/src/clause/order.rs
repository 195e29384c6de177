//! ORDER BY parsing.

use crate::dialect::quote_qualified;
use crate::error::ClauseError;
use crate::validate::validate_qualified_identifier;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDir {
    /// Ascending (`ASC`).
    #[default]
    Asc,
    /// Descending (`DESC`).
    Desc,
}

impl SortDir {
    /// SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Parse `ASC` / `DESC` in any case.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("ASC") {
            Some(Self::Asc)
        } else if word.eq_ignore_ascii_case("DESC") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

/// One validated `column [ASC|DESC]` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderClause {
    /// Column name, possibly dotted; already validated.
    pub column: String,
    /// Sort direction; `ASC` when omitted.
    pub direction: SortDir,
}

impl OrderClause {
    /// Create a clause. The column is not validated here.
    pub fn new(column: impl Into<String>, direction: SortDir) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// Parse a comma-separated ORDER BY list such as `"created_at DESC, name"`.
///
/// Each clause is `column` or `column direction`; the direction is `ASC` or
/// `DESC` in any case and defaults to `ASC`. Empty clauses are skipped, so
/// blank input yields an empty list.
///
/// # Errors
///
/// - [`ClauseError::TooManyTokens`] when a clause has more than two words
/// - [`ClauseError::InvalidDirection`] for any other direction word
/// - [`ClauseError::InvalidColumn`] when the column fails validation
pub fn parse_order_clause(order: &str) -> Result<Vec<OrderClause>, ClauseError> {
    let mut result = Vec::new();

    for part in order.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let words: Vec<&str> = part.split_whitespace().collect();
        let (column, direction) = match words.as_slice() {
            [column] => (*column, SortDir::Asc),
            [column, direction] => {
                let dir = SortDir::from_word(direction).ok_or_else(|| {
                    ClauseError::InvalidDirection {
                        column: (*column).to_string(),
                        direction: (*direction).to_string(),
                    }
                })?;
                (*column, dir)
            },
            _ => {
                return Err(ClauseError::TooManyTokens {
                    clause: part.to_string(),
                });
            },
        };

        validate_qualified_identifier(column).map_err(|source| ClauseError::InvalidColumn {
            column: column.to_string(),
            source,
        })?;

        result.push(OrderClause::new(column, direction));
    }

    Ok(result)
}

/// Render clauses as the body of an ORDER BY, quoting each segment with
/// `quote`. An empty list renders as the empty string.
///
/// ```
/// use tabula_sql::{build_order_sql, OrderClause, SortDir, quote_mysql};
///
/// let clauses = [OrderClause::new("orders.total", SortDir::Desc)];
/// assert_eq!(build_order_sql(&clauses, quote_mysql), "`orders`.`total` DESC");
/// ```
pub fn build_order_sql<F>(clauses: &[OrderClause], quote: F) -> String
where
    F: Fn(&str) -> String,
{
    clauses
        .iter()
        .map(|c| {
            format!(
                "{} {}",
                quote_qualified(&c.column, &quote),
                c.direction.as_sql()
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}
