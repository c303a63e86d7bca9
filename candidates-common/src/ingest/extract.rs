//! Row extraction policies
//!
//! The single-candidate flow (form + attachment) demands exactly one
//! data row; bulk import takes every row. Both reject an empty sheet.

use super::value::RawRow;
use super::IngestError;

/// Strict mode: exactly one row
pub fn extract_single(rows: Vec<RawRow>) -> Result<RawRow, IngestError> {
    let count = rows.len();
    let mut rows = rows.into_iter();
    match (rows.next(), count) {
        (None, _) => Err(IngestError::EmptyInput),
        (Some(row), 1) => Ok(row),
        (Some(_), count) => Err(IngestError::MultipleRows { count }),
    }
}

/// Bulk mode: every row, no upper bound
pub fn extract_all(rows: Vec<RawRow>) -> Result<Vec<RawRow>, IngestError> {
    if rows.is_empty() {
        return Err(IngestError::EmptyInput);
    }
    Ok(rows)
}
