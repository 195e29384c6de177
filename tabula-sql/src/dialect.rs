//! Placeholder strategies, identifier quoting, and the dialects that bundle them.
//!
//! The filter compiler only needs a [`Placeholder`] to render bind
//! parameters. The quoting helpers are used by the downstream SQL builder to
//! render names that were already validated; they perform no validation.

/// Maps a 1-based parameter index to placeholder text.
///
/// Implemented by the built-in strategies, by every [`Dialect`], and by any
/// `Fn(usize) -> String` closure:
///
/// ```
/// use tabula_sql::{parse_filter, Placeholder};
///
/// let named = |idx: usize| format!(":p{idx}");
/// assert_eq!(named.placeholder(3), ":p3");
///
/// let parsed = parse_filter("age > 21", &named, 1).unwrap().unwrap();
/// assert_eq!(parsed.sql, "age > :p1");
/// ```
pub trait Placeholder {
    /// Placeholder text for the parameter at `index`.
    fn placeholder(&self, index: usize) -> String;
}

impl<F> Placeholder for F
where
    F: Fn(usize) -> String,
{
    #[inline]
    fn placeholder(&self, index: usize) -> String {
        self(index)
    }
}

/// Numbered dollar placeholders: `$1`, `$2`, ...
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dollar;

impl Placeholder for Dollar {
    #[inline]
    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }
}

/// Positional question marks: `?` for every parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Question;

impl Placeholder for Question {
    #[inline]
    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }
}

/// SQL Server named parameters: `@p1`, `@p2`, ...
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AtP;

impl Placeholder for AtP {
    #[inline]
    fn placeholder(&self, index: usize) -> String {
        format!("@p{index}")
    }
}

/// Quote an identifier for Postgres: `"name"`, doubling embedded quotes.
#[must_use]
pub fn quote_postgres(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote an identifier for MySQL: `` `name` ``, doubling embedded backticks.
#[must_use]
pub fn quote_mysql(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quote an identifier for SQL Server: `[name]`, doubling closing brackets.
#[must_use]
pub fn quote_sqlserver(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

/// Quote every segment of a dotted name with `quote` and rejoin with `.`.
///
/// ```
/// use tabula_sql::{quote_qualified, quote_sqlserver};
///
/// assert_eq!(quote_qualified("dbo.users", quote_sqlserver), "[dbo].[users]");
/// ```
pub fn quote_qualified<F>(name: &str, quote: F) -> String
where
    F: Fn(&str) -> String,
{
    name.split('.').map(quote).collect::<Vec<_>>().join(".")
}

/// SQL dialect: the placeholder style and identifier quoting of one database.
pub trait Dialect: Placeholder + Clone + Copy {
    /// Human-readable database name.
    fn name(&self) -> &'static str;

    /// Quote a single identifier segment.
    fn quote_ident(&self, ident: &str) -> String;

    /// Quote a dotted reference segment by segment.
    fn quote_qualified(&self, name: &str) -> String {
        quote_qualified(name, |segment| self.quote_ident(segment))
    }
}

/// Postgres dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Placeholder for Postgres {
    #[inline]
    fn placeholder(&self, index: usize) -> String {
        Dollar.placeholder(index)
    }
}

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    #[inline]
    fn quote_ident(&self, ident: &str) -> String {
        quote_postgres(ident)
    }
}

/// MySQL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Placeholder for MySql {
    #[inline]
    fn placeholder(&self, index: usize) -> String {
        Question.placeholder(index)
    }
}

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    #[inline]
    fn quote_ident(&self, ident: &str) -> String {
        quote_mysql(ident)
    }
}

/// SQL Server dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlServer;

impl Placeholder for SqlServer {
    #[inline]
    fn placeholder(&self, index: usize) -> String {
        AtP.placeholder(index)
    }
}

impl Dialect for SqlServer {
    fn name(&self) -> &'static str {
        "sqlserver"
    }

    #[inline]
    fn quote_ident(&self, ident: &str) -> String {
        quote_sqlserver(ident)
    }
}

/// Snowflake dialect. Uses ANSI double-quoted identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Snowflake;

impl Placeholder for Snowflake {
    #[inline]
    fn placeholder(&self, index: usize) -> String {
        Question.placeholder(index)
    }
}

impl Dialect for Snowflake {
    fn name(&self) -> &'static str {
        "snowflake"
    }

    #[inline]
    fn quote_ident(&self, ident: &str) -> String {
        quote_postgres(ident)
    }
}

/// `SQLite` dialect. Uses ANSI double-quoted identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Placeholder for Sqlite {
    #[inline]
    fn placeholder(&self, index: usize) -> String {
        Question.placeholder(index)
    }
}

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    #[inline]
    fn quote_ident(&self, ident: &str) -> String {
        quote_postgres(ident)
    }
}
