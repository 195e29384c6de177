//! Identifier validation for SQL injection prevention.

use crate::error::ValidationError;

/// Maximum length for a single identifier, in characters.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Maximum segments in a dotted reference (`schema.table.column`).
pub const MAX_QUALIFIED_SEGMENTS: usize = 3;

/// Words that can never be used as identifiers, compared case-insensitively.
pub const RESERVED_WORDS: &[&str] = &[
    "SELECT",
    "INSERT",
    "UPDATE",
    "DELETE",
    "DROP",
    "CREATE",
    "ALTER",
    "TRUNCATE",
    "EXEC",
    "EXECUTE",
    "UNION",
    "INTO",
    "FROM",
    "WHERE",
    "TABLE",
    "DATABASE",
    "GRANT",
    "REVOKE",
    "INDEX",
    "VIEW",
    "PROCEDURE",
    "FUNCTION",
    "TRIGGER",
    "SCHEMA",
];

/// Validate that a string is a safe SQL identifier.
///
/// A valid identifier:
/// - Is not empty and not longer than 128 characters
/// - Starts with a letter (a-z, A-Z) or underscore
/// - Contains only ASCII letters, digits and underscores
/// - Is not one of [`RESERVED_WORDS`], in any case
///
/// Checks run in that order and the first failure is returned.
///
/// # Examples
///
/// ```
/// use tabula_sql::validate_identifier;
///
/// assert!(validate_identifier("users").is_ok());
/// assert!(validate_identifier("_private").is_ok());
/// assert!(validate_identifier("user_name_2").is_ok());
///
/// assert!(validate_identifier("").is_err());            // empty
/// assert!(validate_identifier("123abc").is_err());      // starts with digit
/// assert!(validate_identifier("user.id").is_err());     // contains dot
/// assert!(validate_identifier("user; DROP").is_err());  // special chars
/// assert!(validate_identifier("Select").is_err());      // reserved
/// ```
pub fn validate_identifier(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyIdentifier);
    }

    let len = name.chars().count();
    if len > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            name: name.to_string(),
            len,
            max: MAX_IDENTIFIER_LENGTH,
        });
    }

    if !matches_identifier_pattern(name) {
        return Err(ValidationError::InvalidPattern {
            name: name.to_string(),
        });
    }

    if RESERVED_WORDS
        .iter()
        .any(|word| word.eq_ignore_ascii_case(name))
    {
        return Err(ValidationError::ReservedWord {
            name: name.to_string(),
        });
    }

    Ok(())
}

/// Validate every name in order; the first failure wins.
pub fn validate_identifiers<S: AsRef<str>>(names: &[S]) -> Result<(), ValidationError> {
    names
        .iter()
        .try_for_each(|name| validate_identifier(name.as_ref()))
}

/// Validate a possibly dotted reference such as `orders.total` or
/// `sales.orders.total`.
///
/// The reference is split on `.`; more than [`MAX_QUALIFIED_SEGMENTS`]
/// segments is rejected, and every segment must pass
/// [`validate_identifier`]. Empty segments (`a..b`, `a.`) fail as empty
/// identifiers.
///
/// ```
/// use tabula_sql::validate_qualified_identifier;
///
/// assert!(validate_qualified_identifier("public.users.email").is_ok());
/// assert!(validate_qualified_identifier("a.b.c.d").is_err());
/// assert!(validate_qualified_identifier("users.drop").is_err());
/// ```
pub fn validate_qualified_identifier(name: &str) -> Result<(), ValidationError> {
    let segments = name.split('.').count();
    if segments > MAX_QUALIFIED_SEGMENTS {
        return Err(ValidationError::TooManySegments {
            name: name.to_string(),
            segments,
            max: MAX_QUALIFIED_SEGMENTS,
        });
    }

    name.split('.').try_for_each(validate_identifier)
}

/// Returns `true` if `name` passes [`validate_identifier`].
#[inline]
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    validate_identifier(name).is_ok()
}

#[inline]
fn matches_identifier_pattern(s: &str) -> bool {
    let mut chars = s.chars();

    // First character must be letter or underscore
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }

    // Rest must be letters, digits, or underscores
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
