//! Field selection (`?fields=id,name`).

use crate::error::ClauseError;
use crate::validate::validate_identifier;

/// Parse a comma-separated column list.
///
/// Names are trimmed and validated in order. Blank input returns an empty
/// list, meaning "no restriction": the caller selects every column.
///
/// ```
/// use tabula_sql::parse_field_selection;
///
/// assert_eq!(parse_field_selection("id, name").unwrap(), vec!["id", "name"]);
/// assert!(parse_field_selection("").unwrap().is_empty());
/// assert!(parse_field_selection("id, password; --").is_err());
/// ```
///
/// # Errors
///
/// Returns [`ClauseError::InvalidColumn`] for the first name that fails
/// validation, including empty entries such as `a,,b`.
pub fn parse_field_selection(fields: &str) -> Result<Vec<String>, ClauseError> {
    if fields.trim().is_empty() {
        return Ok(Vec::new());
    }

    fields
        .split(',')
        .map(str::trim)
        .map(|field| {
            validate_identifier(field).map_err(|source| ClauseError::InvalidColumn {
                column: field.to_string(),
                source,
            })?;
            Ok(field.to_string())
        })
        .collect()
}

/// Render a quoted, comma-separated column list; `*` when `fields` is empty.
pub fn build_field_list<S, F>(fields: &[S], quote: F) -> String
where
    S: AsRef<str>,
    F: Fn(&str) -> String,
{
    if fields.is_empty() {
        return "*".to_string();
    }

    fields
        .iter()
        .map(|f| quote(f.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
