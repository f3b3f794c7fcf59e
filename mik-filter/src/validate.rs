//! SQL identifier checks for tables, select fields and filter columns.

/// Maximum length for SQL identifiers (`PostgreSQL` limit is 63).
const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Whether a string is a safe SQL identifier.
///
/// A valid identifier starts with an ASCII letter or underscore, continues
/// with ASCII letters, digits or underscores, and is 1-63 characters long.
///
/// # Examples
///
/// ```
/// use mik_filter::is_valid_sql_identifier;
///
/// assert!(is_valid_sql_identifier("user_id"));
/// assert!(!is_valid_sql_identifier("123abc"));
/// assert!(!is_valid_sql_identifier("user; DROP"));
/// ```
#[inline]
#[must_use]
pub fn is_valid_sql_identifier(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }

    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Assert that a trusted identifier (table or select field) is valid.
///
/// # Panics
///
/// Panics if the identifier is invalid. Meant for names written in code,
/// not for user input.
#[inline]
pub(crate) fn assert_valid_sql_identifier(s: &str, context: &str) {
    assert!(
        is_valid_sql_identifier(s),
        "Invalid SQL {context} name '{s}': must start with letter/underscore, \
             contain only ASCII alphanumeric/underscore, and be 1-63 chars"
    );
}
