//! Field resolution across alternate column spellings
//!
//! Spreadsheets arrive with English or Spanish headers in whatever case
//! the author typed. Each target field owns an ordered alias list; the
//! first alias whose cell is non-empty wins.

use super::value::{CellValue, RawRow};

/// Target fields of a candidate record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Surname,
    Seniority,
    Years,
    Availability,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Surname,
        Field::Seniority,
        Field::Years,
        Field::Availability,
    ];

    /// Accepted source keys, highest priority first
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Name => &["name", "nombre", "Name"],
            Field::Surname => &["surname", "apellido", "Surname"],
            Field::Seniority => &["seniority", "Seniority"],
            Field::Years => &["years", "años", "Years", "years_experience"],
            Field::Availability => &["availability", "disponibilidad", "Availability"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Surname => "surname",
            Field::Seniority => "seniority",
            Field::Years => "years",
            Field::Availability => "availability",
        }
    }
}

/// Values supplied alongside an upload that take precedence over the sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub name: Option<String>,
    pub surname: Option<String>,
}

impl Overrides {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            surname: Some(surname.into()),
        }
    }

    /// Non-blank override for `field`, if any
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Name => self.name.as_deref(),
            Field::Surname => self.surname.as_deref(),
            _ => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

/// First non-empty cell among `field`'s aliases
pub fn resolve(row: &RawRow, field: Field) -> Option<&CellValue> {
    field
        .aliases()
        .iter()
        .filter_map(|alias| row.get(alias))
        .find(|value| !value.is_empty())
}

/// Resolve a text field, honoring overrides; empty string when unresolved
pub fn resolve_text(row: &RawRow, field: Field, overrides: &Overrides) -> String {
    if let Some(value) = overrides.get(field) {
        return value.trim().to_string();
    }

    resolve(row, field)
        .map(|value| value.to_text().trim().to_string())
        .unwrap_or_default()
}
