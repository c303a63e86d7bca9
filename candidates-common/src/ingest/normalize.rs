//! Per-field normalizers
//!
//! All three are total: malformed cells resolve to a default (junior,
//! false, 0) instead of failing, so one bad cell never rejects a row.
//! Range checks belong to [`CandidateInput::validate`], not here.
//!
//! [`CandidateInput::validate`]: crate::candidate::CandidateInput::validate

use crate::candidate::Seniority;

use super::value::CellValue;

/// Abbreviations and accented spellings (English and Spanish)
const SENIORITY_SYNONYMS: &[(&str, Seniority)] = &[
    ("jr", Seniority::Junior),
    ("jun", Seniority::Junior),
    ("júnior", Seniority::Junior),
    ("sr", Seniority::Senior),
    ("sen", Seniority::Senior),
    ("sénior", Seniority::Senior),
];

/// Affirmative spellings; anything else is false
const TRUE_VALUES: &[&str] = &["true", "yes", "si", "sí", "1", "verdadero", "disponible"];

/// Map a free-form seniority spelling onto [`Seniority`]
///
/// Unknown and empty input default to junior.
pub fn normalize_seniority(raw: &str) -> Seniority {
    let normalized = raw.trim().to_lowercase();

    if let Some(canonical) = Seniority::from_canonical(&normalized) {
        return canonical;
    }

    SENIORITY_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == normalized)
        .map(|(_, seniority)| *seniority)
        .unwrap_or_default()
}

/// Map a seniority cell of any shape onto [`Seniority`]
pub fn normalize_seniority_cell(value: Option<&CellValue>) -> Seniority {
    normalize_seniority(&value.map(CellValue::to_text).unwrap_or_default())
}

/// Coerce a cell to a strict boolean
///
/// Booleans pass through, numbers are true when `> 0`, strings are true
/// only when they appear in the affirmative set. Missing cells are false.
pub fn normalize_boolean(value: Option<&CellValue>) -> bool {
    match value {
        Some(CellValue::Bool(b)) => *b,
        Some(CellValue::Text(s)) => {
            let lower = s.trim().to_lowercase();
            TRUE_VALUES.contains(&lower.as_str())
        }
        Some(CellValue::Number(n)) => *n > 0.0,
        Some(CellValue::Empty) | None => false,
    }
}

/// Coerce a cell to a whole number of years
///
/// Numbers truncate toward zero (3.9 → 3). Strings take their leading
/// integer (`"7 años"` → 7). Anything unparseable, and any negative
/// result, becomes 0. No upper bound is applied.
pub fn normalize_years(value: Option<&CellValue>) -> u32 {
    let years = match value {
        Some(CellValue::Number(n)) if n.is_finite() => n.trunc() as i64,
        Some(CellValue::Text(s)) => parse_leading_int(s).unwrap_or(0),
        _ => 0,
    };

    u32::try_from(years.max(0)).unwrap_or(u32::MAX)
}

/// Parse an optional sign followed by leading decimal digits, ignoring
/// leading whitespace and any trailing text. `None` when no digits lead.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    // Saturate rather than fail on absurdly long digit runs
    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
