//! Filter expression compiler.
//!
//! Turns an untrusted filter string into a parameterized SQL fragment plus
//! its ordered bind values. Values never reach the SQL text; only validated
//! column names do.
//!
//! # Supported Syntax
//!
//! | Filter | SQL (`Dollar`) |
//! |--------|----------------|
//! | `age > 21` | `age > $1` |
//! | `status != 'deleted'` | `status != $1` |
//! | `email IS NOT NULL` | `email IS NOT NULL` |
//! | `role IN ('admin', 'owner')` | `role IN ($1, $2)` |
//! | `role NOT IN ('guest')` | `role NOT IN ($1)` |
//! | `name LIKE 'J%'` | `name LIKE $1` |
//! | `age BETWEEN 18 AND 65` | `age BETWEEN $1 AND $2` |
//! | `name CONTAINS 'oh'` | `name LIKE $1` bound to `%oh%` |
//! | `name STARTS WITH 'Jo'` | `name LIKE $1` bound to `Jo%` |
//! | `name ENDS WITH 'hn'` | `name LIKE $1` bound to `%hn` |
//! | `NOT (a = 1 OR b = 2)` | `NOT (a = $1 OR b = $2)` |
//!
//! Keywords are case-insensitive. `AND` binds tighter than `OR`.

mod parser;

use crate::config::FilterConfig;
use crate::dialect::Placeholder;
use crate::error::FilterError;
use crate::lexer::tokenize;
use crate::value::Value;
use parser::Parser;
use tracing::debug;

/// A compiled filter: SQL text and the values its placeholders bind, in order.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a parsed filter does nothing until it is spliced into a statement"]
pub struct ParsedFilter {
    /// Boolean SQL expression, without a leading `WHERE`.
    pub sql: String,
    /// Bound values, one per placeholder, left to right.
    pub params: Vec<Value>,
}

impl ParsedFilter {
    /// Number of bound values.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// The expression as a `WHERE` clause with a leading space, ready to be
    /// appended to `SELECT ... FROM table`.
    #[must_use]
    pub fn where_clause(&self) -> String {
        format!(" WHERE {}", self.sql)
    }
}

/// Compile a filter expression with default limits.
///
/// `start_index` is the index handed to `placeholder` for the first bound
/// value; each further value gets the next index. Blank input returns
/// `Ok(None)`.
///
/// # Example
///
/// ```
/// use tabula_sql::{parse_filter, Dollar, Value};
///
/// let parsed = parse_filter("(age > 21) AND (status = 'active')", &Dollar, 1)
///     .unwrap()
///     .unwrap();
/// assert_eq!(parsed.sql, "(age > $1) AND (status = $2)");
/// assert_eq!(parsed.params, vec![Value::Int(21), Value::from("active")]);
///
/// assert!(parse_filter("   ", &Dollar, 1).unwrap().is_none());
/// ```
///
/// # Errors
///
/// Returns [`FilterError`] on lex, syntax or semantic errors. No partial SQL
/// is ever returned.
pub fn parse_filter<P: Placeholder + ?Sized>(
    filter: &str,
    placeholder: &P,
    start_index: usize,
) -> Result<Option<ParsedFilter>, FilterError> {
    FilterConfig::new()
        .start_index(start_index)
        .parse(filter, placeholder)
}

pub(crate) fn compile<P: Placeholder + ?Sized>(
    filter: &str,
    placeholder: &P,
    config: &FilterConfig,
) -> Result<Option<ParsedFilter>, FilterError> {
    if filter.trim().is_empty() {
        return Ok(None);
    }

    let result = tokenize(filter)
        .and_then(|tokens| Parser::new(&tokens, placeholder, config).parse());

    match result {
        Ok(fragment) => {
            debug!(
                params = fragment.params.len(),
                start_index = config.start_index,
                "filter compiled"
            );
            Ok(Some(ParsedFilter {
                sql: fragment.sql,
                params: fragment.params,
            }))
        },
        Err(err) => {
            debug!(
                code = err.code(),
                kind = err.kind().as_str(),
                position = ?err.position(),
                "filter rejected"
            );
            Err(err)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{AtP, Dollar, Question};
    use crate::error::{ErrorKind, ValidationError};

    fn sql(filter: &str) -> String {
        parse_filter(filter, &Dollar, 1).unwrap().unwrap().sql
    }

    fn parse(filter: &str) -> ParsedFilter {
        parse_filter(filter, &Dollar, 1).unwrap().unwrap()
    }

    fn err(filter: &str) -> FilterError {
        err_at(filter, 1)
    }

    fn err_at(filter: &str, start_index: usize) -> FilterError {
        parse_filter(filter, &Dollar, start_index).unwrap_err()
    }

    // =========================================================================
    // Comparisons
    // =========================================================================

    #[test]
    fn test_simple_comparison() {
        let parsed = parse("age > 21");
        assert_eq!(parsed.sql, "age > $1");
        assert_eq!(parsed.params, vec![Value::Int(21)]);
    }

    #[test]
    fn test_all_simple_operators() {
        for op in ["=", "!=", "<>", ">", ">=", "<", "<="] {
            assert_eq!(sql(&format!("a {op} 1")), format!("a {op} $1"));
        }
    }

    #[test]
    fn test_value_types() {
        let parsed = parse("a = 1 AND b = -2.5 AND c = 'x'");
        assert_eq!(
            parsed.params,
            vec![Value::Int(1), Value::Float(-2.5), Value::from("x")]
        );
    }

    #[test]
    fn test_is_null() {
        let parsed = parse("email IS NOT NULL");
        assert_eq!(parsed.sql, "email IS NOT NULL");
        assert!(parsed.params.is_empty());
        assert_eq!(sql("deleted_at is null"), "deleted_at IS NULL");
    }

    #[test]
    fn test_in_list() {
        let parsed = parse_filter("name IN ('John', 'Jane')", &Question, 1)
            .unwrap()
            .unwrap();
        assert_eq!(parsed.sql, "name IN (?, ?)");
        assert_eq!(parsed.params, vec![Value::from("John"), Value::from("Jane")]);

        assert_eq!(sql("id IN (7)"), "id IN ($1)");
        assert_eq!(sql("id NOT IN (1, 2, 3)"), "id NOT IN ($1, $2, $3)");
    }

    #[test]
    fn test_like_and_between() {
        assert_eq!(sql("name LIKE 'J%'"), "name LIKE $1");
        assert_eq!(sql("name NOT LIKE 'J%'"), "name NOT LIKE $1");
        assert_eq!(sql("age BETWEEN 18 AND 65"), "age BETWEEN $1 AND $2");
        assert_eq!(sql("age NOT BETWEEN 18 AND 65"), "age NOT BETWEEN $1 AND $2");
    }

    #[test]
    fn test_pattern_operators() {
        let parsed = parse("name CONTAINS 'test'");
        assert_eq!(parsed.sql, "name LIKE $1");
        assert_eq!(parsed.params, vec![Value::from("%test%")]);

        assert_eq!(parse("name STARTS WITH 'Jo'").params, vec![Value::from("Jo%")]);
        assert_eq!(parse("name ends with 'hn'").params, vec![Value::from("%hn")]);
    }

    #[test]
    fn test_pattern_operator_requires_string() {
        assert_eq!(
            err("name CONTAINS 5"),
            FilterError::ExpectedString {
                operator: "CONTAINS",
                found: "5".into(),
                position: 14,
            }
        );
        assert!(matches!(
            err("name STARTS WITH 1.5"),
            FilterError::ExpectedString {
                operator: "STARTS WITH",
                ..
            }
        ));
        assert_eq!(err("name ENDS WITH 1").kind(), ErrorKind::Semantic);
    }

    #[test]
    fn test_pattern_keeps_user_wildcards() {
        assert_eq!(parse("name CONTAINS '50%'").params, vec![Value::from("%50%%")]);
    }

    #[test]
    fn test_qualified_columns() {
        assert_eq!(sql("users.email = 'a'"), "users.email = $1");
        assert_eq!(sql("public.users.email = 'a'"), "public.users.email = $1");
        assert!(matches!(
            err("a.b.c.d = 1"),
            FilterError::InvalidIdentifier {
                source: ValidationError::TooManySegments { segments: 4, .. },
                ..
            }
        ));
        assert!(matches!(
            err("users.drop = 1"),
            FilterError::InvalidIdentifier {
                source: ValidationError::ReservedWord { .. },
                ..
            }
        ));
    }

    // =========================================================================
    // Boolean structure
    // =========================================================================

    #[test]
    fn test_grouped_and() {
        let parsed = parse("(age > 21) AND (status = 'active')");
        assert_eq!(parsed.sql, "(age > $1) AND (status = $2)");
        assert_eq!(parsed.params, vec![Value::Int(21), Value::from("active")]);
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        // Rendered flat; the database applies the same precedence
        assert_eq!(sql("a = 1 OR b = 2 AND c = 3"), "a = $1 OR b = $2 AND c = $3");
        assert_eq!(
            sql("(a = 1 OR b = 2) AND c = 3"),
            "(a = $1 OR b = $2) AND c = $3"
        );
    }

    #[test]
    fn test_prefix_not() {
        assert_eq!(sql("NOT a = 1"), "NOT a = $1");
        assert_eq!(sql("NOT (a = 1 OR b = 2)"), "NOT (a = $1 OR b = $2)");
        assert_eq!(sql("NOT NOT a = 1"), "NOT NOT a = $1");
    }

    #[test]
    fn test_not_modifier_versus_negation() {
        assert_eq!(sql("status NOT IN ('x')"), "status NOT IN ($1)");
        assert_eq!(sql("NOT (status IN ('x'))"), "NOT (status IN ($1))");
        assert_eq!(sql("NOT status IN ('x')"), "NOT status IN ($1)");
    }

    #[test]
    fn test_not_modifier_rejects_other_operators() {
        assert!(matches!(
            err("a NOT = 1"),
            FilterError::UnexpectedToken { position: 6, .. }
        ));
        assert!(matches!(
            err("a NOT IS NULL"),
            FilterError::UnexpectedToken { .. }
        ));
        assert!(matches!(
            err("a NOT CONTAINS 'x'"),
            FilterError::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn test_between_consumes_its_and() {
        let parsed = parse("a BETWEEN 1 AND 2 AND b = 3");
        assert_eq!(parsed.sql, "a BETWEEN $1 AND $2 AND b = $3");
        assert_eq!(
            parsed.params,
            vec![Value::Int(1), Value::Int(2), Value::Int(3)]
        );
    }

    // =========================================================================
    // Placeholders
    // =========================================================================

    #[test]
    fn test_start_index() {
        let parsed = parse_filter("a = 1 AND b IN (2, 3)", &Dollar, 4)
            .unwrap()
            .unwrap();
        assert_eq!(parsed.sql, "a = $4 AND b IN ($5, $6)");
    }

    #[test]
    fn test_placeholder_index_exhausted() {
        let last = parse_filter("a = 1", &Dollar, usize::MAX).unwrap().unwrap();
        assert_eq!(last.sql, format!("a = ${}", usize::MAX));

        let overflow = err_at("a = 1 AND b = 2", usize::MAX);
        assert_eq!(overflow, FilterError::PlaceholderOverflow { position: 14 });
        assert_eq!(overflow.kind(), ErrorKind::Syntax);
        assert_eq!(overflow.code(), "placeholder_overflow");

        assert_eq!(
            err_at("a IN (1, 2, 3)", usize::MAX - 1),
            FilterError::PlaceholderOverflow { position: 12 }
        );
        assert_eq!(
            err_at("a BETWEEN 1 AND 2", usize::MAX),
            FilterError::PlaceholderOverflow { position: 16 }
        );
        assert_eq!(
            err_at("a = 1 OR b CONTAINS 'x'", usize::MAX),
            FilterError::PlaceholderOverflow { position: 20 }
        );
    }

    #[test]
    fn test_at_p_placeholders() {
        let parsed = parse_filter("a = 1 OR b = 2", &AtP, 1).unwrap().unwrap();
        assert_eq!(parsed.sql, "a = @p1 OR b = @p2");
    }

    #[test]
    fn test_closure_placeholder() {
        let numbered = |idx: usize| format!("?{idx}");
        let parsed = parse_filter("a = 1 AND b = 2", &numbered, 1)
            .unwrap()
            .unwrap();
        assert_eq!(parsed.sql, "a = ?1 AND b = ?2");
    }

    #[test]
    fn test_dyn_placeholder() {
        let strategy: &dyn Placeholder = &Dollar;
        let parsed = parse_filter("a = 1", strategy, 1).unwrap().unwrap();
        assert_eq!(parsed.sql, "a = $1");
    }

    // =========================================================================
    // Blank input and errors
    // =========================================================================

    #[test]
    fn test_blank_input() {
        assert_eq!(parse_filter("", &Dollar, 1), Ok(None));
        assert_eq!(parse_filter(" \t\n", &Dollar, 1), Ok(None));
    }

    #[test]
    fn test_digit_led_identifier_is_error() {
        assert!(parse_filter("1bad > 5", &Dollar, 1).is_err());
        assert_eq!(err("1bad > 5").kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_trailing_input() {
        assert_eq!(
            err("a = 1 b = 2"),
            FilterError::TrailingInput {
                found: "b".into(),
                position: 6,
            }
        );
        assert_eq!(
            err("a = 1)"),
            FilterError::TrailingInput {
                found: ")".into(),
                position: 5,
            }
        );
    }

    #[test]
    fn test_unexpected_end() {
        assert_eq!(
            err("a ="),
            FilterError::UnexpectedEnd { expected: "value" }
        );
        assert_eq!(
            err("(a = 1"),
            FilterError::UnexpectedEnd { expected: "`)`" }
        );
        assert_eq!(
            err("a IN (1,"),
            FilterError::UnexpectedEnd { expected: "value" }
        );
        assert_eq!(
            err("a AND"),
            FilterError::UnexpectedToken {
                expected: "comparison operator",
                found: "AND".into(),
                position: 2,
            }
        );
        assert_eq!(
            err("a = 1 AND"),
            FilterError::UnexpectedEnd {
                expected: "column name"
            }
        );
    }

    #[test]
    fn test_value_must_be_literal() {
        assert_eq!(
            err("a = b"),
            FilterError::UnexpectedToken {
                expected: "value",
                found: "b".into(),
                position: 4,
            }
        );
        assert!(matches!(err("a = NULL"), FilterError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_empty_in_list_is_error() {
        assert!(matches!(
            err("a IN ()"),
            FilterError::UnexpectedToken {
                expected: "value",
                ..
            }
        ));
    }

    #[test]
    fn test_integer_overflow() {
        assert_eq!(
            err("a = 99999999999999999999"),
            FilterError::NumberOutOfRange {
                text: "99999999999999999999".into(),
                position: 4,
            }
        );
        assert_eq!(
            parse("a = -9223372036854775808").params,
            vec![Value::Int(i64::MIN)]
        );
    }

    #[test]
    fn test_reserved_column() {
        assert_eq!(
            err("drop = 1"),
            FilterError::InvalidIdentifier {
                column: "drop".into(),
                position: 0,
                source: ValidationError::ReservedWord {
                    name: "drop".into()
                },
            }
        );
    }

    #[test]
    fn test_column_checked_before_operator() {
        // Both the column and what follows are bad; the column wins
        assert_eq!(
            err("drop NOT = 1"),
            FilterError::InvalidIdentifier {
                column: "drop".into(),
                position: 0,
                source: ValidationError::ReservedWord {
                    name: "drop".into()
                },
            }
        );
        assert!(matches!(
            err("select IS 5"),
            FilterError::InvalidIdentifier { position: 0, .. }
        ));
        assert!(matches!(
            err("a.b.c.d BETWEEN 1"),
            FilterError::InvalidIdentifier {
                position: 0,
                source: ValidationError::TooManySegments { .. },
                ..
            }
        ));

        let config = FilterConfig::new().allow_columns(&["status"]);
        assert_eq!(
            config.parse("secret NOT = 1", &Dollar),
            Err(FilterError::ColumnNotAllowed {
                column: "secret".into(),
                position: 0,
            })
        );
    }

    #[test]
    fn test_keyword_as_column_is_error() {
        assert!(matches!(
            err("null = 1"),
            FilterError::UnexpectedToken {
                expected: "column name",
                ..
            }
        ));
    }

    #[test]
    fn test_injection_attempts_never_reach_sql() {
        let parsed = parse("name = 'x''; DROP TABLE users; --'");
        assert_eq!(parsed.sql, "name = $1");
        assert_eq!(parsed.params, vec![Value::from("x'; DROP TABLE users; --")]);

        assert!(parse_filter("name = 1; DROP TABLE users", &Dollar, 1).is_err());
        assert!(parse_filter("name = 1 UNION SELECT 1", &Dollar, 1).is_err());
        assert!(parse_filter("(SELECT 1) = 1", &Dollar, 1).is_err());
    }

    // =========================================================================
    // Configured limits
    // =========================================================================

    #[test]
    fn test_value_sanitizing() {
        let config = FilterConfig::new().max_value_len(3);
        let parsed = config.parse("a = 'a\0bc'", &Dollar).unwrap().unwrap();
        assert_eq!(parsed.params, vec![Value::from("abc")]);

        assert_eq!(
            config.parse("a = 'abcd'", &Dollar),
            Err(FilterError::InvalidValue {
                position: 4,
                source: ValidationError::ValueTooLong { len: 4, max: 3 },
            })
        );
    }

    #[test]
    fn test_pattern_length_checked_before_wildcards() {
        let config = FilterConfig::new().max_value_len(3);
        let parsed = config.parse("a CONTAINS 'abc'", &Dollar).unwrap().unwrap();
        assert_eq!(parsed.params, vec![Value::from("%abc%")]);
    }

    #[test]
    fn test_allowed_columns() {
        let config = FilterConfig::new().allow_columns(&["status", "users.age"]);
        assert!(config.parse("status = 'a' AND users.age > 1", &Dollar).is_ok());
        assert_eq!(
            config.parse("status = 'a' OR age > 1", &Dollar),
            Err(FilterError::ColumnNotAllowed {
                column: "age".into(),
                position: 16,
            })
        );
        // Allow-list matching is case-sensitive
        assert!(config.parse("Status = 'a'", &Dollar).is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let config = FilterConfig::new().max_depth(2);
        assert!(config.parse("((a = 1))", &Dollar).is_ok());
        assert_eq!(
            config.parse("(((a = 1)))", &Dollar),
            Err(FilterError::NestingTooDeep {
                max: 2,
                position: 2,
            })
        );
        assert!(config.parse("NOT (a = 1)", &Dollar).is_ok());
        assert!(matches!(
            config.parse("NOT NOT NOT a = 1", &Dollar),
            Err(FilterError::NestingTooDeep { position: 8, .. })
        ));
        // Siblings do not accumulate depth
        assert!(config.parse("((a = 1)) AND ((b = 2))", &Dollar).is_ok());
    }

    #[test]
    fn test_default_depth_rejects_hostile_nesting() {
        let hostile = format!("{}a = 1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(matches!(
            parse_filter(&hostile, &Dollar, 1),
            Err(FilterError::NestingTooDeep { max: 64, .. })
        ));
    }

    #[test]
    fn test_helpers() {
        let parsed = parse("a = 1 AND b IS NULL");
        assert_eq!(parsed.param_count(), 1);
        assert_eq!(parsed.where_clause(), " WHERE a = $1 AND b IS NULL");
    }
}
