//! Workbook decoding
//!
//! Reads the first sheet of an uploaded spreadsheet into [`RawRow`]s,
//! using the header row as keys. Blank rows are skipped.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use csv::{ReaderBuilder, Trim};

use super::value::{CellValue, RawRow};
use super::IngestError;

/// Container format of an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// xlsx, xlsm, xlsb, xls or ods
    Workbook,
    Csv,
}

impl SheetFormat {
    /// Detect the format from the file name, falling back to content type
    pub fn detect(file_name: Option<&str>, content_type: Option<&str>) -> Result<Self, IngestError> {
        if let Some(ext) = file_name.and_then(|name| name.rsplit_once('.')).map(|(_, ext)| ext) {
            match ext.to_ascii_lowercase().as_str() {
                "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => return Ok(SheetFormat::Workbook),
                "csv" => return Ok(SheetFormat::Csv),
                _ => {}
            }
        }

        let mime = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase())
            .unwrap_or_default();
        match mime.as_str() {
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            | "application/vnd.ms-excel"
            | "application/vnd.oasis.opendocument.spreadsheet" => Ok(SheetFormat::Workbook),
            "text/csv" => Ok(SheetFormat::Csv),
            _ => Err(IngestError::UnsupportedFormat(
                file_name.or(content_type).unwrap_or("unknown").to_string(),
            )),
        }
    }
}

/// Decode the first sheet of `bytes` into rows
pub fn decode_workbook(bytes: &[u8], format: SheetFormat) -> Result<Vec<RawRow>, IngestError> {
    match format {
        SheetFormat::Csv => rows_from_csv(bytes),
        SheetFormat::Workbook => {
            let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
                .map_err(|e| IngestError::Workbook(e.to_string()))?;

            let range = workbook
                .worksheet_range_at(0)
                .ok_or_else(|| IngestError::Workbook("workbook has no sheets".to_string()))?
                .map_err(|e| IngestError::Workbook(e.to_string()))?;

            Ok(rows_from_range(&range))
        }
    }
}

/// Convert a sheet range into keyed rows; the first row is the header
pub fn rows_from_range(range: &Range<Data>) -> Vec<RawRow> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let keys: Vec<String> = header.iter().map(|cell| cell_value(cell).to_text().trim().to_string()).collect();

    rows.map(|cells| {
        keys.iter()
            .zip(cells.iter().map(cell_value))
            .map(|(k, v)| (k.clone(), v))
            .collect::<RawRow>()
    })
    .filter(|row| !row.is_blank())
    .collect()
}

/// Separators tried on the header line, in tie-break order
const CSV_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// Parse CSV text into keyed rows; every cell stays text
///
/// The separator is sniffed from the header line, so semicolon files
/// written by locales that use a decimal comma decode the same way.
pub fn rows_from_csv(bytes: &[u8]) -> Result<Vec<RawRow>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(sniff_delimiter(bytes))
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(bytes);

    let keys: Vec<String> = reader
        .headers()
        .map_err(|e| IngestError::Workbook(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::Workbook(e.to_string()))?;
        let row: RawRow = keys
            .iter()
            .zip(record.iter())
            .map(|(k, v)| (k.clone(), CellValue::text(v)))
            .collect();
        if !row.is_blank() {
            rows.push(row);
        }
    }

    Ok(rows)
}

/// Pick the candidate separator that occurs most often (outside quotes)
/// on the first line; comma when none occurs
fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header = bytes.split(|&b| b == b'\n').next().unwrap_or_default();

    let mut counts = [0usize; CSV_DELIMITERS.len()];
    let mut quoted = false;
    for &b in header {
        if b == b'"' {
            quoted = !quoted;
        } else if !quoted {
            if let Some(i) = CSV_DELIMITERS.iter().position(|&d| d == b) {
                counts[i] += 1;
            }
        }
    }

    let mut best = 0;
    for (i, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = i;
        }
    }
    CSV_DELIMITERS[best]
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.as_str()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}
