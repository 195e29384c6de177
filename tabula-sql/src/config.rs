//! Parser configuration.

use crate::dialect::Placeholder;
use crate::error::{ConfigError, FilterError};
use crate::filter::{self, ParsedFilter};
use crate::validate::{DEFAULT_MAX_VALUE_LEN, validate_qualified_identifier};
use miniserde::json::{Number, Value as JsonValue};

/// Default cap on nested parentheses and `NOT`.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Limits and policy applied while compiling a filter.
///
/// Defaults:
/// - Placeholders start at index 1
/// - String values up to [`DEFAULT_MAX_VALUE_LEN`] bytes
/// - Nesting up to [`DEFAULT_MAX_DEPTH`] levels
/// - Every column may be filtered on
///
/// # Example
///
/// ```
/// use tabula_sql::{Dollar, FilterConfig, FilterError};
///
/// let config = FilterConfig::new()
///     .start_index(3)
///     .allow_columns(&["status", "age"]);
///
/// let parsed = config.parse("status = 'active'", &Dollar).unwrap().unwrap();
/// assert_eq!(parsed.sql, "status = $3");
///
/// let err = config.parse("password = 'x'", &Dollar).unwrap_err();
/// assert!(matches!(err, FilterError::ColumnNotAllowed { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct FilterConfig {
    /// Index passed to the placeholder strategy for the first bound value.
    pub start_index: usize,
    /// Maximum byte length of a string value after NUL stripping.
    pub max_value_len: usize,
    /// Maximum nesting of parentheses and prefix `NOT`.
    pub max_depth: usize,
    /// Columns that may appear in a filter, matched exactly. Empty = all.
    pub allowed_columns: Vec<String>,
}

impl FilterConfig {
    /// Create a config with the defaults listed above.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            start_index: 1,
            max_value_len: DEFAULT_MAX_VALUE_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            allowed_columns: Vec::new(),
        }
    }

    /// Set the index of the first placeholder.
    ///
    /// Use this when the filter is appended to a statement that already
    /// binds parameters.
    /// Zero suits strategies that number from 0.
    #[must_use]
    pub const fn start_index(mut self, index: usize) -> Self {
        self.start_index = index;
        self
    }

    /// Set the string value limit in bytes.
    #[must_use]
    pub const fn max_value_len(mut self, len: usize) -> Self {
        self.max_value_len = len;
        self
    }

    /// Set the maximum nesting depth.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Restrict filtering to these columns.
    ///
    /// Columns are compared exactly as written, so `users.email` and `email`
    /// are different entries.
    #[must_use]
    pub fn allow_columns(mut self, columns: &[&str]) -> Self {
        self.allowed_columns = columns.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Compile `filter` with this config.
    ///
    /// Returns `Ok(None)` for blank input.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] if the filter does not lex or parse, or if a
    /// column or value is rejected.
    pub fn parse<P: Placeholder + ?Sized>(
        &self,
        filter: &str,
        placeholder: &P,
    ) -> Result<Option<ParsedFilter>, FilterError> {
        filter::compile(filter, placeholder, self)
    }

    /// Load a config from a JSON object.
    ///
    /// Recognized keys: `start_index`, `max_value_len`, `max_depth`,
    /// `allowed_columns`. Missing keys keep their defaults.
    ///
    /// ```
    /// use tabula_sql::FilterConfig;
    ///
    /// let config = FilterConfig::from_json(
    ///     r#"{"max_depth": 8, "allowed_columns": ["name", "users.email"]}"#,
    /// ).unwrap();
    /// assert_eq!(config.max_depth, 8);
    /// assert_eq!(config.start_index, 1);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed JSON, unknown keys, values of the
    /// wrong type, or allow-listed columns that are not valid identifiers.
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        let json: JsonValue =
            miniserde::json::from_str(json_str).map_err(|_| ConfigError::InvalidJson)?;
        let JsonValue::Object(obj) = json else {
            return Err(ConfigError::ExpectedObject);
        };

        let mut config = Self::new();
        for (key, value) in &obj {
            match key.as_str() {
                "start_index" => config.start_index = unsigned(key, value)?,
                "max_value_len" => config.max_value_len = unsigned(key, value)?,
                "max_depth" => config.max_depth = positive(key, value)?,
                "allowed_columns" => config.allowed_columns = columns(key, value)?,
                _ => return Err(ConfigError::UnknownKey(key.clone())),
            }
        }

        Ok(config)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn unsigned(key: &str, value: &JsonValue) -> Result<usize, ConfigError> {
    let invalid = || ConfigError::InvalidType {
        key: key.to_string(),
        expected: "a non-negative integer",
    };
    match value {
        JsonValue::Number(Number::U64(n)) => usize::try_from(*n).map_err(|_| invalid()),
        JsonValue::Number(Number::I64(n)) => usize::try_from(*n).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn positive(key: &str, value: &JsonValue) -> Result<usize, ConfigError> {
    match unsigned(key, value) {
        Ok(0) => Err(ConfigError::InvalidType {
            key: key.to_string(),
            expected: "a positive integer",
        }),
        other => other,
    }
}

fn columns(key: &str, value: &JsonValue) -> Result<Vec<String>, ConfigError> {
    let invalid = || ConfigError::InvalidType {
        key: key.to_string(),
        expected: "an array of strings",
    };
    let JsonValue::Array(items) = value else {
        return Err(invalid());
    };

    items
        .iter()
        .map(|item| {
            let JsonValue::String(column) = item else {
                return Err(invalid());
            };
            validate_qualified_identifier(column).map_err(|source| ConfigError::InvalidColumn {
                column: column.clone(),
                source,
            })?;
            Ok(column.clone())
        })
        .collect()
}
