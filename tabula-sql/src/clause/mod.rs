//! ORDER BY and field-selection parsers, plus the helpers that render them.
//!
//! Both take the raw query-string value (`?order=created_at DESC,name`,
//! `?fields=id,name`) and return validated column names. Rendering quotes
//! every name with the caller's dialect quoting function.
//!
//! ```
//! use tabula_sql::{build_order_sql, parse_order_clause, quote_postgres};
//!
//! let clauses = parse_order_clause("created_at DESC, name").unwrap();
//! assert_eq!(
//!     build_order_sql(&clauses, quote_postgres),
//!     "\"created_at\" DESC, \"name\" ASC"
//! );
//! ```

mod fields;
mod order;

pub use fields::{build_field_list, parse_field_selection};
pub use order::{OrderClause, SortDir, build_order_sql, parse_order_clause};
