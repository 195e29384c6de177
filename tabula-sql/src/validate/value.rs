//! String value sanitizing, layered on top of parameterization.

use crate::error::ValidationError;

/// Default cap on string values, in bytes.
pub const DEFAULT_MAX_VALUE_LEN: usize = 65535;

/// Strip NUL bytes from `value` and enforce `max_len` on the result.
///
/// Values are always bound as parameters; this guards drivers and
/// databases that truncate at NUL or choke on huge literals.
///
/// ```
/// use tabula_sql::sanitize_string_value;
///
/// assert_eq!(sanitize_string_value("plain", 10).unwrap(), "plain");
/// assert_eq!(sanitize_string_value("nul\0here", 10).unwrap(), "nulhere");
/// assert!(sanitize_string_value("too long", 3).is_err());
/// ```
pub fn sanitize_string_value(value: &str, max_len: usize) -> Result<String, ValidationError> {
    let cleaned = if value.contains('\0') {
        value.replace('\0', "")
    } else {
        value.to_string()
    };

    if cleaned.len() > max_len {
        return Err(ValidationError::ValueTooLong {
            len: cleaned.len(),
            max: max_len,
        });
    }

    Ok(cleaned)
}
