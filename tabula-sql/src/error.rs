//! Error types for the filter compiler, the clause parsers and the sanitizers.
//!
//! Every error the crate returns maps to an HTTP 400. The HTTP layer renders
//! it with [`FilterError::to_json_envelope`] (or the [`ClauseError`]
//! equivalent), which produces:
//!
//! ```json
//! {"error":{"code":"unexpected_char","kind":"lex","message":"...","position":4}}
//! ```

use miniserde::json::{self, Number, Object, Value as JsonValue};
use thiserror::Error;

/// HTTP status every compiler error maps to.
pub const ERROR_STATUS: u16 = 400;

/// Broad category of a compiler error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input could not be split into tokens.
    Lex,
    /// The tokens do not form a valid expression.
    Syntax,
    /// The expression is well formed but names or values are not acceptable.
    Semantic,
}

impl ErrorKind {
    /// Lowercase name used in the JSON envelope.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lex => "lex",
            Self::Syntax => "syntax",
            Self::Semantic => "semantic",
        }
    }
}

/// Identifier or value rejected by the sanitizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// Identifier is the empty string.
    #[error("identifier cannot be empty")]
    EmptyIdentifier,
    /// Identifier exceeds the maximum length.
    #[error("identifier `{name}` is {len} characters long, maximum is {max}")]
    TooLong {
        /// The rejected identifier.
        name: String,
        /// Its length in characters.
        len: usize,
        /// The maximum accepted length.
        max: usize,
    },
    /// Identifier does not match `[A-Za-z_][A-Za-z0-9_]*`.
    #[error(
        "identifier `{name}` must start with a letter or underscore and contain only ASCII letters, digits and underscores"
    )]
    InvalidPattern {
        /// The rejected identifier.
        name: String,
    },
    /// Identifier is a reserved SQL word.
    #[error("identifier `{name}` is a reserved word")]
    ReservedWord {
        /// The rejected identifier.
        name: String,
    },
    /// Dotted reference has more segments than `schema.table.column`.
    #[error("qualified name `{name}` has {segments} segments, maximum is {max}")]
    TooManySegments {
        /// The rejected reference.
        name: String,
        /// Number of dot-separated segments found.
        segments: usize,
        /// The maximum accepted number of segments.
        max: usize,
    },
    /// String value exceeds the configured limit.
    #[error("string value is {len} bytes long, maximum is {max}")]
    ValueTooLong {
        /// Length in bytes after NUL stripping.
        len: usize,
        /// The configured limit.
        max: usize,
    },
}

impl ValidationError {
    /// Stable snake_case code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyIdentifier => "empty_identifier",
            Self::TooLong { .. } => "identifier_too_long",
            Self::InvalidPattern { .. } => "invalid_identifier",
            Self::ReservedWord { .. } => "reserved_word",
            Self::TooManySegments { .. } => "too_many_segments",
            Self::ValueTooLong { .. } => "value_too_long",
        }
    }
}

/// Error produced while compiling a filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FilterError {
    /// A string literal has no closing quote.
    #[error("unterminated string literal starting at position {position}")]
    UnterminatedString {
        /// Offset of the opening quote.
        position: usize,
    },
    /// A number ends with `.` and no fractional digits.
    #[error("number `{text}` at position {position} has a decimal point with no digits after it")]
    TrailingDecimalPoint {
        /// The number text up to and including the `.`.
        text: String,
        /// Offset of the number.
        position: usize,
    },
    /// An integer literal does not fit in 64 bits.
    #[error("number `{text}` at position {position} is out of range")]
    NumberOutOfRange {
        /// The number text.
        text: String,
        /// Offset of the number.
        position: usize,
    },
    /// A character that starts no token.
    #[error("unexpected character `{ch}` at position {position}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Its byte offset.
        position: usize,
    },
    /// A token that does not fit the grammar at this point.
    #[error("expected {expected}, found `{found}` at position {position}")]
    UnexpectedToken {
        /// What the grammar required.
        expected: &'static str,
        /// The token that was found.
        found: String,
        /// Its byte offset.
        position: usize,
    },
    /// The input ended in the middle of an expression.
    #[error("expected {expected}, found end of input")]
    UnexpectedEnd {
        /// What the grammar required.
        expected: &'static str,
    },
    /// Tokens left over after a complete expression.
    #[error("unexpected `{found}` at position {position} after end of expression")]
    TrailingInput {
        /// The first leftover token.
        found: String,
        /// Its byte offset.
        position: usize,
    },
    /// Parentheses or `NOT` nested deeper than allowed.
    #[error("expression at position {position} is nested deeper than {max} levels")]
    NestingTooDeep {
        /// The configured maximum.
        max: usize,
        /// Offset of the token that exceeded it.
        position: usize,
    },
    /// More values than placeholder indices left after the start index.
    #[error("value at position {position} has no placeholder index left")]
    PlaceholderOverflow {
        /// Offset of the value.
        position: usize,
    },
    /// A column reference failed identifier validation.
    #[error("invalid column `{column}` at position {position}: {source}")]
    InvalidIdentifier {
        /// The column reference as written.
        column: String,
        /// Its byte offset.
        position: usize,
        /// Why the identifier was rejected.
        #[source]
        source: ValidationError,
    },
    /// A pattern operator was given a non-string value.
    #[error("{operator} requires a string value, found `{found}` at position {position}")]
    ExpectedString {
        /// The operator as written (`CONTAINS`, `STARTS WITH`, `ENDS WITH`).
        operator: &'static str,
        /// The token that was found.
        found: String,
        /// Its byte offset.
        position: usize,
    },
    /// A string value was rejected by the value sanitizer.
    #[error("invalid value at position {position}: {source}")]
    InvalidValue {
        /// Offset of the string literal.
        position: usize,
        /// Why the value was rejected.
        #[source]
        source: ValidationError,
    },
    /// The column is valid but not in the configured allow-list.
    #[error("column `{column}` at position {position} cannot be filtered on")]
    ColumnNotAllowed {
        /// The column reference as written.
        column: String,
        /// Its byte offset.
        position: usize,
    },
}

impl FilterError {
    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnterminatedString { .. }
            | Self::TrailingDecimalPoint { .. }
            | Self::NumberOutOfRange { .. }
            | Self::UnexpectedChar { .. } => ErrorKind::Lex,
            Self::UnexpectedToken { .. }
            | Self::UnexpectedEnd { .. }
            | Self::TrailingInput { .. }
            | Self::NestingTooDeep { .. }
            | Self::PlaceholderOverflow { .. } => ErrorKind::Syntax,
            Self::InvalidIdentifier { .. }
            | Self::ExpectedString { .. }
            | Self::InvalidValue { .. }
            | Self::ColumnNotAllowed { .. } => ErrorKind::Semantic,
        }
    }

    /// Byte offset into the filter string, when the error has one.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::UnexpectedEnd { .. } => None,
            Self::UnterminatedString { position }
            | Self::TrailingDecimalPoint { position, .. }
            | Self::NumberOutOfRange { position, .. }
            | Self::UnexpectedChar { position, .. }
            | Self::UnexpectedToken { position, .. }
            | Self::TrailingInput { position, .. }
            | Self::NestingTooDeep { position, .. }
            | Self::PlaceholderOverflow { position }
            | Self::InvalidIdentifier { position, .. }
            | Self::ExpectedString { position, .. }
            | Self::InvalidValue { position, .. }
            | Self::ColumnNotAllowed { position, .. } => Some(*position),
        }
    }

    /// Stable snake_case code for this error.
    ///
    /// Identifier and value failures report the underlying
    /// [`ValidationError`] code so clients see `reserved_word` rather than a
    /// generic wrapper.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnterminatedString { .. } => "unterminated_string",
            Self::TrailingDecimalPoint { .. } => "trailing_decimal_point",
            Self::NumberOutOfRange { .. } => "number_out_of_range",
            Self::UnexpectedChar { .. } => "unexpected_char",
            Self::UnexpectedToken { .. } => "unexpected_token",
            Self::UnexpectedEnd { .. } => "unexpected_end",
            Self::TrailingInput { .. } => "trailing_input",
            Self::NestingTooDeep { .. } => "nesting_too_deep",
            Self::PlaceholderOverflow { .. } => "placeholder_overflow",
            Self::InvalidIdentifier { source, .. } | Self::InvalidValue { source, .. } => {
                source.code()
            },
            Self::ExpectedString { .. } => "expected_string",
            Self::ColumnNotAllowed { .. } => "column_not_allowed",
        }
    }

    /// HTTP status for this error. Always 400.
    #[must_use]
    pub const fn status(&self) -> u16 {
        ERROR_STATUS
    }

    /// Render the JSON error body returned with the 400 response.
    #[must_use]
    pub fn to_json_envelope(&self) -> String {
        envelope(self.code(), self.kind(), &self.to_string(), self.position())
    }
}

/// Error produced by the ORDER BY and field-selection parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ClauseError {
    /// Sort direction other than ASC or DESC.
    #[error("invalid sort direction `{direction}` for column `{column}`, expected ASC or DESC")]
    InvalidDirection {
        /// The column being sorted.
        column: String,
        /// The direction as written.
        direction: String,
    },
    /// A sort clause with more than `column direction`.
    #[error("sort clause `{clause}` has too many parts, expected `column [ASC|DESC]`")]
    TooManyTokens {
        /// The clause as written.
        clause: String,
    },
    /// A column failed identifier validation.
    #[error("invalid column `{column}`: {source}")]
    InvalidColumn {
        /// The column as written.
        column: String,
        /// Why it was rejected.
        #[source]
        source: ValidationError,
    },
}

impl ClauseError {
    /// Category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDirection { .. } | Self::TooManyTokens { .. } => ErrorKind::Syntax,
            Self::InvalidColumn { .. } => ErrorKind::Semantic,
        }
    }

    /// Stable snake_case code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidDirection { .. } => "invalid_direction",
            Self::TooManyTokens { .. } => "too_many_tokens",
            Self::InvalidColumn { source, .. } => source.code(),
        }
    }

    /// HTTP status for this error. Always 400.
    #[must_use]
    pub const fn status(&self) -> u16 {
        ERROR_STATUS
    }

    /// Render the JSON error body returned with the 400 response.
    #[must_use]
    pub fn to_json_envelope(&self) -> String {
        envelope(self.code(), self.kind(), &self.to_string(), None)
    }
}

/// Error produced while loading a [`FilterConfig`](crate::FilterConfig) from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Not valid JSON.
    #[error("invalid JSON syntax or encoding")]
    InvalidJson,
    /// The document is not a JSON object.
    #[error("expected JSON object")]
    ExpectedObject,
    /// A key this config does not know.
    #[error("unknown config key `{0}`")]
    UnknownKey(String),
    /// A key with a value of the wrong type.
    #[error("config key `{key}` expects {expected}")]
    InvalidType {
        /// The key.
        key: String,
        /// Description of the expected value.
        expected: &'static str,
    },
    /// An allow-listed column that is not a valid identifier.
    #[error("allowed column `{column}` is invalid: {source}")]
    InvalidColumn {
        /// The column as written.
        column: String,
        /// Why it was rejected.
        #[source]
        source: ValidationError,
    },
}

fn envelope(code: &str, kind: ErrorKind, message: &str, position: Option<usize>) -> String {
    let mut body = Object::new();
    body.insert("code".to_string(), JsonValue::String(code.to_string()));
    body.insert(
        "kind".to_string(),
        JsonValue::String(kind.as_str().to_string()),
    );
    body.insert("message".to_string(), JsonValue::String(message.to_string()));
    if let Some(position) = position {
        body.insert(
            "position".to_string(),
            JsonValue::Number(Number::U64(position as u64)),
        );
    }

    let mut root = Object::new();
    root.insert("error".to_string(), JsonValue::Object(body));
    json::to_string(&JsonValue::Object(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            FilterError::UnterminatedString { position: 0 }.kind(),
            ErrorKind::Lex
        );
        assert_eq!(
            FilterError::UnexpectedEnd { expected: "value" }.kind(),
            ErrorKind::Syntax
        );
        assert_eq!(
            FilterError::ColumnNotAllowed {
                column: "secret".into(),
                position: 0
            }
            .kind(),
            ErrorKind::Semantic
        );
    }

    #[test]
    fn test_identifier_error_reports_inner_code() {
        let err = FilterError::InvalidIdentifier {
            column: "drop".into(),
            position: 3,
            source: ValidationError::ReservedWord {
                name: "drop".into(),
            },
        };
        assert_eq!(err.code(), "reserved_word");
        assert_eq!(err.position(), Some(3));
        assert!(err.to_string().contains("reserved word"));
    }

    #[test]
    fn test_unexpected_end_has_no_position() {
        let err = FilterError::UnexpectedEnd { expected: "value" };
        assert_eq!(err.position(), None);
        assert_eq!(err.to_string(), "expected value, found end of input");
    }

    #[test]
    fn test_envelope_shape() {
        let err = FilterError::UnexpectedChar {
            ch: ';',
            position: 7,
        };
        assert_eq!(
            err.to_json_envelope(),
            r#"{"error":{"code":"unexpected_char","kind":"lex","message":"unexpected character `;` at position 7","position":7}}"#
        );
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn test_envelope_without_position() {
        let err = FilterError::UnexpectedEnd { expected: "`)`" };
        let body = err.to_json_envelope();
        assert!(body.contains(r#""code":"unexpected_end""#));
        assert!(!body.contains("position"));
    }

    #[test]
    fn test_envelope_escapes_message() {
        let err = FilterError::UnexpectedToken {
            expected: "value",
            found: "\"quoted\"".into(),
            position: 2,
        };
        let body = err.to_json_envelope();
        let parsed: JsonValue = json::from_str(&body).unwrap();
        let JsonValue::Object(root) = parsed else {
            panic!("expected object, got {parsed:?}")
        };
        assert!(root.contains_key("error"));
    }

    #[test]
    fn test_clause_error_envelope() {
        let err = ClauseError::InvalidDirection {
            column: "name".into(),
            direction: "SIDEWAYS".into(),
        };
        assert_eq!(err.code(), "invalid_direction");
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert!(err.to_json_envelope().contains(r#""kind":"syntax""#));
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error as _;

        let err = FilterError::InvalidValue {
            position: 5,
            source: ValidationError::ValueTooLong { len: 10, max: 4 },
        };
        let source = err.source().map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("string value is 10 bytes long, maximum is 4")
        );
    }
}
