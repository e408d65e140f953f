//! Cell-to-text conversion for SQLite rows.
//!
//! SQLite values carry a runtime storage class independent of the declared
//! column type, so classification is done per value, not per column.

use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Decode, Row, Sqlite, TypeInfo, ValueRef};

/// Logical category for a database value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Null,
    Integer,
    Float,
    Text,
    Binary,
}

/// Classify a type name into a logical category.
pub fn categorize_type(type_name: &str) -> TypeCategory {
    let lower = type_name.to_lowercase();

    if lower == "null" {
        return TypeCategory::Null;
    }

    if lower.contains("int") || lower == "bool" || lower == "boolean" {
        return TypeCategory::Integer;
    }

    if lower.contains("real")
        || lower.contains("floa")
        || lower.contains("doub")
        || lower == "numeric"
        || lower.contains("decimal")
    {
        return TypeCategory::Float;
    }

    if lower.contains("blob") || lower.contains("binary") {
        return TypeCategory::Binary;
    }

    // TEXT, DATE, DATETIME and anything unrecognised
    TypeCategory::Text
}

/// Render raw bytes as text. Invalid UTF-8 sequences become U+FFFD.
pub fn decode_binary_value(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Column names of a row, in order.
pub fn column_names(row: &SqliteRow) -> Vec<String> {
    row.columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect()
}

/// Render one cell as a string. NULL renders as the empty string.
pub fn cell_to_string(row: &SqliteRow, idx: usize) -> Result<String, sqlx::Error> {
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(String::new());
    }

    let category = categorize_type(raw.type_info().name());
    let rendered = match category {
        TypeCategory::Null => Ok(String::new()),
        TypeCategory::Integer => <i64 as Decode<Sqlite>>::decode(raw).map(|v| v.to_string()),
        TypeCategory::Float => <f64 as Decode<Sqlite>>::decode(raw).map(|v| v.to_string()),
        // TEXT is not guaranteed to be valid UTF-8
        TypeCategory::Binary | TypeCategory::Text => {
            <&[u8] as Decode<Sqlite>>::decode(raw).map(decode_binary_value)
        }
    };

    rendered.map_err(|source| sqlx::Error::ColumnDecode {
        index: idx.to_string(),
        source,
    })
}

/// Render every cell of a row.
pub fn row_to_strings(row: &SqliteRow) -> Result<Vec<String>, sqlx::Error> {
    (0..row.len()).map(|idx| cell_to_string(row, idx)).collect()
}
