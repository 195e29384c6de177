//! Identifier and value sanitizers.
//!
//! Bound parameters already neutralize value injection. Identifiers cannot be
//! parameterized in standard SQL, so every column name that reaches SQL text
//! goes through the allow-list here first:
//! - Identifiers must match `[A-Za-z_][A-Za-z0-9_]*`, be at most 128
//!   characters, and not be a reserved word
//! - Dotted references (`schema.table.column`) have at most 3 segments,
//!   each validated on its own
//! - String values have NUL bytes stripped and a length cap applied
//!
//! # Example
//!
//! ```
//! use tabula_sql::{sanitize_string_value, validate_identifier, DEFAULT_MAX_VALUE_LEN};
//!
//! assert!(validate_identifier("user_name_2").is_ok());
//! assert!(validate_identifier("DROP").is_err());
//!
//! let clean = sanitize_string_value("a\0b", DEFAULT_MAX_VALUE_LEN).unwrap();
//! assert_eq!(clean, "ab");
//! ```

mod identifier;
mod value;

pub use identifier::{
    MAX_IDENTIFIER_LENGTH, MAX_QUALIFIED_SEGMENTS, RESERVED_WORDS, is_valid_identifier,
    validate_identifier, validate_identifiers, validate_qualified_identifier,
};
pub use value::{DEFAULT_MAX_VALUE_LEN, sanitize_string_value};
