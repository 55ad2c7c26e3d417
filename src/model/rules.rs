//! Identifier and value rules shared by every named schema entity.

use crate::error::{DbPackError, Result};

/// Longest identifier, in bytes, Oracle accepts for tables, columns, indexes and program units
pub const MAX_IDENTIFIER_LENGTH: usize = 30;

/// Synthetic key column prepended to snapshot-tracked tables
pub const SNAPSHOT_COLUMN: &str = "SNAPSHOT_ID";

pub const DEFAULT_STORY: &str = "US138139";
pub const DEFAULT_RELEASE: &str = "4.0.0.0";
pub const DEFAULT_PRODUCT_CODE: &str = "W";
pub const DEFAULT_TABLE_TYPE: &str = "REGULAR";

/// Terminates every record of a loader data file
pub const RECORD_TERMINATOR: &str = "#$EOR$#\r\n";

/// Bookkeeping tables that never receive the snapshot column
pub const DICTIONARY_OBJECTS: [&str; 7] = [
    "DB_OBJECTS",
    "DB_OBJECTS_SAVED",
    "DB_OBJECTS_UPGRADE",
    "DB_TABLE_COLUMNS",
    "DB_TABLE_COLUMNS_SAVED",
    "DB_TABLE_COLUMNS_UPGRADE",
    "APPLICATION",
];

const TRUTH_VALUES: [&str; 4] = ["1", "yes", "true", "on"];

/// Validate and case-fold an identifier.
///
/// `entity` only feeds the error message (e.g. "Column", "Index").
pub fn normalize_name(entity: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(DbPackError::validation(format!(
            "{} name cannot be empty",
            entity
        )));
    }
    if value.len() > MAX_IDENTIFIER_LENGTH {
        return Err(DbPackError::validation(format!(
            "{} name {} exceeds {} bytes",
            entity, value, MAX_IDENTIFIER_LENGTH
        )));
    }
    Ok(value.to_uppercase())
}

/// Reject an empty required value.
pub fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(DbPackError::validation(format!("{} cannot be empty", field)))
    } else {
        Ok(())
    }
}

/// True when `value` belongs to the truth vocabulary. Anything else is false.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    TRUTH_VALUES.iter().any(|t| t.eq_ignore_ascii_case(value))
}

/// Coerce a flag value to `Y` or `N`.
pub fn yes_no(value: &str) -> &'static str {
    if is_truthy(value) {
        "Y"
    } else {
        "N"
    }
}

pub fn is_dictionary_object(name: &str) -> bool {
    DICTIONARY_OBJECTS.contains(&name)
}

/// Upper-case `value`, or fall back to `default` when empty.
pub(crate) fn upper_or(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_uppercase()
    }
}

pub(crate) fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Parse a positive integer attribute, treating empty input as `default`.
pub(crate) fn parse_count(field: &str, value: &str, default: u32) -> Result<u32> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(default);
    }
    value.parse::<u32>().map_err(|_| {
        DbPackError::validation(format!("{} must be a number, got '{}'", field, value))
    })
}
