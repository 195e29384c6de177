// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
#![warn(unreachable_pub)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION
// =============================================================================
#![allow(clippy::doc_markdown)] // SQL keywords in docs read better unquoted
#![allow(clippy::missing_errors_doc)] // Error enums document their own variants
#![allow(clippy::module_name_repetitions)] // Type names matching module - acceptable
#![allow(clippy::return_self_not_must_use)] // Builder methods return Self
#![allow(clippy::must_use_candidate)] // Builder methods - fluent API doesn't need must_use
#![allow(clippy::match_same_arms)] // Grammar arms kept apart to mirror the productions
#![allow(clippy::cast_precision_loss)] // Value::as_f64 widens i64 on purpose
#![allow(clippy::double_must_use)] // Functions returning must_use types can have their own docs

//! # tabula-sql - Filter Expression Compiler
//!
//! Compiles untrusted, query-string filter expressions into parameterized
//! SQL fragments plus an ordered list of bind values. Column names are
//! validated against an allow-list pattern and a reserved-word denylist
//! before they reach SQL text; values only ever travel as parameters.
//!
//! ## Quick Start
//!
//! ```
//! use tabula_sql::prelude::*;
//!
//! let parsed = parse_filter("age > 21 AND name CONTAINS 'ann'", &Postgres, 1)
//!     .unwrap()
//!     .expect("non-blank filter");
//!
//! assert_eq!(parsed.sql, "age > $1 AND name LIKE $2");
//! assert_eq!(parsed.params, vec![Value::Int(21), Value::from("%ann%")]);
//! ```
//!
//! ## Placeholder Styles
//!
//! | Strategy | Dialects | Output |
//! |----------|----------|--------|
//! | [`Dollar`] | [`Postgres`] | `$1, $2, ...` |
//! | [`Question`] | [`MySql`], [`Snowflake`], [`Sqlite`] | `?, ?, ...` |
//! | [`AtP`] | [`SqlServer`] | `@p1, @p2, ...` |
//!
//! Any `Fn(usize) -> String` also works as a strategy.
//!
//! ## Building a Statement
//!
//! The compiler emits fragments; the caller owns the statement around them.
//!
//! ```
//! use tabula_sql::prelude::*;
//!
//! let fields = parse_field_selection("id,name").unwrap();
//! let order = parse_order_clause("created_at DESC").unwrap();
//! let filter = parse_filter("status = 'active'", &Postgres, 1).unwrap();
//!
//! let mut sql = format!(
//!     "SELECT {} FROM {}",
//!     build_field_list(&fields, quote_postgres),
//!     Postgres.quote_ident("users"),
//! );
//! if let Some(filter) = &filter {
//!     sql.push_str(&filter.where_clause());
//! }
//! if !order.is_empty() {
//!     sql.push_str(" ORDER BY ");
//!     sql.push_str(&build_order_sql(&order, quote_postgres));
//! }
//!
//! assert_eq!(
//!     sql,
//!     r#"SELECT "id", "name" FROM "users" WHERE status = $1 ORDER BY "created_at" DESC"#
//! );
//! ```
//!
//! ## Errors
//!
//! Every error maps to HTTP 400. [`FilterError::to_json_envelope`] renders the
//! response body with a stable `code`, a `kind` (`lex`, `syntax` or
//! `semantic`), a message and, when known, the byte `position`.

mod clause;
mod config;
mod dialect;
mod error;
mod filter;
pub mod lexer;
mod validate;
mod value;

pub use clause::{
    OrderClause, SortDir, build_field_list, build_order_sql, parse_field_selection,
    parse_order_clause,
};
pub use config::{DEFAULT_MAX_DEPTH, FilterConfig};
pub use dialect::{
    AtP, Dialect, Dollar, MySql, Placeholder, Postgres, Question, Snowflake, SqlServer, Sqlite,
    quote_mysql, quote_postgres, quote_qualified, quote_sqlserver,
};
pub use error::{ClauseError, ConfigError, ERROR_STATUS, ErrorKind, FilterError, ValidationError};
pub use filter::{ParsedFilter, parse_filter};
pub use validate::{
    DEFAULT_MAX_VALUE_LEN, MAX_IDENTIFIER_LENGTH, MAX_QUALIFIED_SEGMENTS, RESERVED_WORDS,
    is_valid_identifier, sanitize_string_value, validate_identifier, validate_identifiers,
    validate_qualified_identifier,
};
pub use value::Value;

/// Prelude module for convenient imports.
///
/// ```
/// use tabula_sql::prelude::*;
///
/// let parsed = parse_filter("id IN (1, 2)", &Question, 1).unwrap().unwrap();
/// assert_eq!(parsed.sql, "id IN (?, ?)");
/// ```
pub mod prelude {
    pub use crate::{
        AtP, ClauseError, Dialect, Dollar, FilterConfig, FilterError, MySql, OrderClause,
        ParsedFilter, Placeholder, Postgres, Question, Snowflake, SortDir, SqlServer, Sqlite,
        ValidationError, Value, build_field_list, build_order_sql, parse_field_selection,
        parse_filter, parse_order_clause, quote_mysql, quote_postgres, quote_qualified,
        quote_sqlserver, sanitize_string_value, validate_identifier, validate_identifiers,
    };
}


// ============================================================================
// API Contract Tests (compile-time assertions)
// ============================================================================
