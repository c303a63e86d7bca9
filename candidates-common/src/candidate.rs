//! Candidate model and validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Maximum stored length of name and surname
pub const MAX_NAME_LEN: usize = 100;

/// Accepted range of years of experience
pub const MAX_YEARS: u32 = 50;

/// Seniority level, stored and serialized as `junior` / `senior`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seniority {
    #[default]
    Junior,
    Senior,
}

impl Seniority {
    pub fn as_str(self) -> &'static str {
        match self {
            Seniority::Junior => "junior",
            Seniority::Senior => "senior",
        }
    }

    /// Exact match on the canonical lowercase spelling
    pub fn from_canonical(s: &str) -> Option<Self> {
        match s {
            "junior" => Some(Seniority::Junior),
            "senior" => Some(Seniority::Senior),
            _ => None,
        }
    }
}

impl std::fmt::Display for Seniority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields needed to create a candidate
///
/// Produced by JSON requests and by spreadsheet ingestion. Callers must
/// run [`CandidateInput::validate`] before persisting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInput {
    pub name: String,
    pub surname: String,
    pub seniority: Seniority,
    pub years: u32,
    pub availability: bool,
}

impl CandidateInput {
    /// Enforce the persisted-record constraints
    ///
    /// - name and surname non-blank, at most 100 characters
    /// - years within `0..=50`
    pub fn validate(&self) -> Result<()> {
        validate_name("name", &self.name)?;
        validate_name("surname", &self.surname)?;
        validate_years(self.years)
    }
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CandidatePatch {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub seniority: Option<Seniority>,
    pub years: Option<u32>,
    pub availability: Option<bool>,
}

impl CandidatePatch {
    pub fn is_empty(&self) -> bool {
        self == &CandidatePatch::default()
    }
}

/// A stored candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub surname: String,
    pub seniority: Seniority,
    pub years: u32,
    pub availability: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    /// Build a new record with a fresh id and timestamps
    pub fn new(input: CandidateInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            surname: input.surname,
            seniority: input.seniority,
            years: input.years,
            availability: input.availability,
            created_at: now,
            updated_at: now,
        }
    }

    /// Current field values as an input record
    pub fn to_input(&self) -> CandidateInput {
        CandidateInput {
            name: self.name.clone(),
            surname: self.surname.clone(),
            seniority: self.seniority,
            years: self.years,
            availability: self.availability,
        }
    }

    /// Merge `patch` over this record and validate the result
    ///
    /// Leaves `self` untouched when validation fails.
    pub fn apply(&mut self, patch: CandidatePatch) -> Result<()> {
        let mut merged = self.to_input();
        if let Some(name) = patch.name {
            merged.name = name;
        }
        if let Some(surname) = patch.surname {
            merged.surname = surname;
        }
        if let Some(seniority) = patch.seniority {
            merged.seniority = seniority;
        }
        if let Some(years) = patch.years {
            merged.years = years;
        }
        if let Some(availability) = patch.availability {
            merged.availability = availability;
        }
        merged.validate()?;

        self.name = merged.name;
        self.surname = merged.surname;
        self.seniority = merged.seniority;
        self.years = merged.years;
        self.availability = merged.availability;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", field)));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(Error::InvalidInput(format!(
            "{} must be at most {} characters",
            field, MAX_NAME_LEN
        )));
    }
    Ok(())
}

fn validate_years(years: u32) -> Result<()> {
    if years > MAX_YEARS {
        return Err(Error::InvalidInput(format!(
            "years must be between 0 and {}, got {}",
            MAX_YEARS, years
        )));
    }
    Ok(())
}
