//! SQL identifier checks.
//!
//! Table and column names end up interpolated into `CREATE TABLE` and
//! `INSERT` statements, where parameter binding is not available. Under
//! [`IdentifierPolicy::Strict`] they must match `^[A-Za-z_][A-Za-z0-9_]*$`.
//! [`IdentifierPolicy::Raw`] passes them through untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::error::IdentifierError;

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// How table and column names are treated before interpolation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentifierPolicy {
    /// Reject anything outside the allow-list pattern.
    #[default]
    Strict,
    /// Interpolate verbatim. Header names containing SQL are executed as SQL.
    Raw,
}

/// Whether `name` is a plain SQL identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Check a table name against the policy.
pub fn check_table(name: &str, policy: IdentifierPolicy) -> Result<(), IdentifierError> {
    match policy {
        IdentifierPolicy::Raw => Ok(()),
        IdentifierPolicy::Strict if is_valid_identifier(name) => Ok(()),
        IdentifierPolicy::Strict => Err(IdentifierError::InvalidTable(name.to_string())),
    }
}

/// Check header column names against the policy.
///
/// Duplicates are rejected under both policies; SQLite refuses them anyway.
pub fn check_columns(columns: &[String], policy: IdentifierPolicy) -> Result<(), IdentifierError> {
    let mut seen = HashSet::new();
    for column in columns {
        if policy == IdentifierPolicy::Strict && !is_valid_identifier(column) {
            return Err(IdentifierError::InvalidColumn(column.clone()));
        }
        if !seen.insert(column.to_lowercase()) {
            return Err(IdentifierError::DuplicateColumn(column.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_identifiers() {
        assert!(is_valid_identifier("orders"));
        assert!(is_valid_identifier("_tmp"));
        assert!(is_valid_identifier("Order_Line2"));
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("2fast"));
        assert!(!is_valid_identifier("order id"));
        assert!(!is_valid_identifier("x; DROP TABLE y; --"));
        assert!(!is_valid_identifier("naïve"));
    }

    #[test]
    fn test_strict_rejects_injection_in_table() {
        let err = check_table("orders; DROP TABLE users", IdentifierPolicy::Strict).unwrap_err();
        assert!(matches!(err, IdentifierError::InvalidTable(_)));
    }

    #[test]
    fn test_raw_accepts_anything() {
        assert!(check_table("weird name", IdentifierPolicy::Raw).is_ok());
        assert!(check_columns(&cols(&["a b", "c-d"]), IdentifierPolicy::Raw).is_ok());
    }

    #[test]
    fn test_strict_rejects_bad_column() {
        let err = check_columns(&cols(&["id", "unit price"]), IdentifierPolicy::Strict).unwrap_err();
        assert!(matches!(err, IdentifierError::InvalidColumn(c) if c == "unit price"));
    }

    #[test]
    fn test_duplicate_columns_case_insensitive() {
        let err = check_columns(&cols(&["id", "ID"]), IdentifierPolicy::Raw).unwrap_err();
        assert!(matches!(err, IdentifierError::DuplicateColumn(_)));
    }
}
