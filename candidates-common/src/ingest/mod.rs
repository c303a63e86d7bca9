//! Spreadsheet row ingestion
//!
//! Turns loosely-structured rows (English/Spanish headers, mixed cell
//! types) into validated-shape [`CandidateInput`] records:
//!
//! ```text
//! workbook bytes ─► decode_workbook ─► extract_single / extract_all
//!                                        │
//!                                        ▼
//!                  normalize_row: resolve aliases ─► normalize per field
//! ```
//!
//! Only row-count problems are fatal. Unknown seniority, odd booleans and
//! non-numeric years fall back to junior / false / 0.

mod extract;
mod fields;
mod normalize;
mod value;
mod workbook;

pub use extract::{extract_all, extract_single};
pub use fields::{resolve, resolve_text, Field, Overrides};
pub use normalize::{
    normalize_boolean, normalize_seniority, normalize_seniority_cell, normalize_years,
};
pub use value::{CellValue, RawRow};
pub use workbook::{decode_workbook, rows_from_csv, rows_from_range, SheetFormat};

use thiserror::Error;

use crate::candidate::CandidateInput;

/// Structural rejections of an upload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// The first sheet has no data rows
    #[error("the spreadsheet contains no data rows")]
    EmptyInput,

    /// Strict mode received more than one data row
    #[error("the spreadsheet must contain exactly one data row, found {count}")]
    MultipleRows { count: usize },

    /// Neither file name nor content type names a supported format
    #[error("unsupported spreadsheet format: {0}")]
    UnsupportedFormat(String),

    /// The decoder could not read the file
    #[error("could not read spreadsheet: {0}")]
    Workbook(String),
}

/// Normalize one row into a candidate record
///
/// Never fails; the result still needs [`CandidateInput::validate`]
/// before it is persisted.
pub fn normalize_row(row: &RawRow, overrides: &Overrides) -> CandidateInput {
    CandidateInput {
        name: resolve_text(row, Field::Name, overrides),
        surname: resolve_text(row, Field::Surname, overrides),
        seniority: normalize_seniority_cell(resolve(row, Field::Seniority)),
        years: normalize_years(resolve(row, Field::Years)),
        availability: normalize_boolean(resolve(row, Field::Availability)),
    }
}

/// Single-candidate ingestion: exactly one row, overrides applied
pub fn ingest_single(
    rows: Vec<RawRow>,
    overrides: &Overrides,
) -> Result<CandidateInput, IngestError> {
    let row = extract_single(rows)?;
    Ok(normalize_row(&row, overrides))
}

/// Bulk ingestion: one record per row, in sheet order
pub fn ingest_bulk(rows: Vec<RawRow>) -> Result<Vec<CandidateInput>, IngestError> {
    let rows = extract_all(rows)?;
    tracing::debug!(rows = rows.len(), "Normalizing spreadsheet rows");
    Ok(rows
        .iter()
        .map(|row| normalize_row(row, &Overrides::none()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Seniority;

    fn spanish_row() -> RawRow {
        RawRow::new()
            .with("nombre", "Ana")
            .with("apellido", "Ruiz")
            .with("Seniority", "SR")
            .with("años", "7")
            .with("disponibilidad", "sí")
    }

    #[test]
    fn test_spanish_row_end_to_end() {
        let candidate = ingest_single(vec![spanish_row()], &Overrides::none()).unwrap();
        assert_eq!(
            candidate,
            CandidateInput {
                name: "Ana".to_string(),
                surname: "Ruiz".to_string(),
                seniority: Seniority::Senior,
                years: 7,
                availability: true,
            }
        );
    }

    #[test]
    fn test_english_row_with_native_types() {
        let row = RawRow::new()
            .with("name", "John")
            .with("surname", "Doe")
            .with("seniority", "junior")
            .with("years", 3.0)
            .with("availability", true);
        let candidate = normalize_row(&row, &Overrides::none());
        assert_eq!(candidate.name, "John");
        assert_eq!(candidate.surname, "Doe");
        assert_eq!(candidate.seniority, Seniority::Junior);
        assert_eq!(candidate.years, 3);
        assert!(candidate.availability);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let row = RawRow::new().with("unrelated", "x");
        let candidate = normalize_row(&row, &Overrides::none());
        assert_eq!(candidate.name, "");
        assert_eq!(candidate.surname, "");
        assert_eq!(candidate.seniority, Seniority::Junior);
        assert_eq!(candidate.years, 0);
        assert!(!candidate.availability);
    }

    #[test]
    fn test_overrides_replace_sheet_names() {
        let candidate =
            ingest_single(vec![spanish_row()], &Overrides::new("María", "López")).unwrap();
        assert_eq!(candidate.name, "María");
        assert_eq!(candidate.surname, "López");
        assert_eq!(candidate.seniority, Seniority::Senior);
    }

    #[test]
    fn test_single_rejects_two_rows() {
        let result = ingest_single(vec![spanish_row(), spanish_row()], &Overrides::none());
        assert_eq!(result, Err(IngestError::MultipleRows { count: 2 }));
    }

    #[test]
    fn test_bulk_normalizes_each_row_independently() {
        let second = RawRow::new()
            .with("Name", "Luis")
            .with("Surname", "Gil")
            .with("seniority", "bogus")
            .with("Years", "abc")
            .with("Availability", 0i64);
        let candidates = ingest_bulk(vec![spanish_row(), second]).unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].seniority, Seniority::Senior);
        assert_eq!(candidates[1].name, "Luis");
        assert_eq!(candidates[1].seniority, Seniority::Junior);
        assert_eq!(candidates[1].years, 0);
        assert!(!candidates[1].availability);
    }

    #[test]
    fn test_bulk_rejects_empty() {
        assert_eq!(ingest_bulk(Vec::new()), Err(IngestError::EmptyInput));
    }
}
