//! Column name normalization and validation.
//!
//! Column names are lower-cased, checked against the bundled Redshift
//! reserved-word list, and quoted when they contain whitespace so that
//! downstream statement building needs no special-casing.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::core::Frame;
use crate::error::{LoadError, Result};

/// Redshift reserved words, one per line, bundled with the crate and parsed
/// once at first use.
static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    include_str!("redshift_reserved_words.txt")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
});

/// Whether a (case-insensitive) name is a Redshift reserved word.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(name.to_lowercase().as_str())
}

/// Quote an identifier so the warehouse treats it as a single name.
///
/// Embedded double quotes are doubled, as in PostgreSQL-family quoting.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Normalize and validate the column names of a frame in place.
///
/// Lower-cases every name, rejects names that collide with a reserved word,
/// and rewrites names containing whitespace to their quoted form.
///
/// # Errors
///
/// Returns [`LoadError::ReservedWord`] naming the first offending column.
/// Fails before any network call.
pub fn validate_column_names(frame: &mut Frame) -> Result<()> {
    for column in frame.columns_mut() {
        column.name = column.name.to_lowercase();
    }

    for column in frame.columns() {
        if RESERVED_WORDS.contains(column.name.as_str()) {
            return Err(LoadError::ReservedWord(column.name.clone()));
        }
    }

    for column in frame.columns_mut() {
        if column.name.chars().any(char::is_whitespace) {
            column.name = quote_ident(&column.name);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Column, DType, Value};

    fn frame_with(names: &[&str]) -> Frame {
        Frame::from_columns(
            names
                .iter()
                .map(|n| Column::new(*n, DType::Int32, vec![Value::Int(1)]))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_lowercases_names() {
        let mut frame = frame_with(&["Amount", "CustomerId"]);
        validate_column_names(&mut frame).unwrap();
        assert_eq!(frame.column_names(), vec!["amount", "customerid"]);
    }

    #[test]
    fn test_rejects_reserved_word() {
        let mut frame = frame_with(&["SELECT"]);
        let err = validate_column_names(&mut frame).unwrap_err();
        match err {
            LoadError::ReservedWord(name) => assert_eq!(name, "select"),
            other => panic!("expected ReservedWord, got {other}"),
        }
    }

    #[test]
    fn test_non_reserved_passes_unchanged_except_case() {
        let mut frame = frame_with(&["Selection"]);
        validate_column_names(&mut frame).unwrap();
        assert_eq!(frame.column_names(), vec!["selection"]);
    }

    #[test]
    fn test_quotes_whitespace_names() {
        let mut frame = frame_with(&["unit price", "qty"]);
        validate_column_names(&mut frame).unwrap();
        assert_eq!(frame.column_names(), vec!["\"unit price\"", "qty"]);
    }

    #[test]
    fn test_is_reserved_case_insensitive() {
        assert!(is_reserved("select"));
        assert!(is_reserved("Select"));
        assert!(is_reserved("TABLE"));
        assert!(!is_reserved("selection"));
    }
}
