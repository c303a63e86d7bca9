//! Candidate persistence

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::candidate::{Candidate, CandidateInput, CandidatePatch, Seniority};
use crate::{Error, Result};

const SELECT_COLUMNS: &str =
    "SELECT id, name, surname, seniority, years, availability, created_at, updated_at FROM candidates";

/// Validate and insert a new candidate
pub async fn create(pool: &SqlitePool, input: CandidateInput) -> Result<Candidate> {
    input.validate()?;
    let candidate = Candidate::new(input);

    sqlx::query(
        r#"
        INSERT INTO candidates (id, name, surname, seniority, years, availability, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(candidate.id.to_string())
    .bind(&candidate.name)
    .bind(&candidate.surname)
    .bind(candidate.seniority.as_str())
    .bind(i64::from(candidate.years))
    .bind(candidate.availability)
    .bind(timestamp(&candidate.created_at))
    .bind(timestamp(&candidate.updated_at))
    .execute(pool)
    .await?;

    Ok(candidate)
}

/// All candidates, newest first
pub async fn list(pool: &SqlitePool) -> Result<Vec<Candidate>> {
    let rows = sqlx::query(&format!(
        "{} ORDER BY created_at DESC, rowid DESC",
        SELECT_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(from_row).collect()
}

/// Load one candidate, `NotFound` when missing
pub async fn get(pool: &SqlitePool, id: Uuid) -> Result<Candidate> {
    let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => from_row(&row),
        None => Err(not_found(id)),
    }
}

/// Merge a partial update into a stored candidate
pub async fn update(pool: &SqlitePool, id: Uuid, patch: CandidatePatch) -> Result<Candidate> {
    let mut candidate = get(pool, id).await?;
    candidate.apply(patch)?;

    sqlx::query(
        r#"
        UPDATE candidates
        SET name = ?, surname = ?, seniority = ?, years = ?, availability = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&candidate.name)
    .bind(&candidate.surname)
    .bind(candidate.seniority.as_str())
    .bind(i64::from(candidate.years))
    .bind(candidate.availability)
    .bind(timestamp(&candidate.updated_at))
    .bind(candidate.id.to_string())
    .execute(pool)
    .await?;

    Ok(candidate)
}

/// Delete a candidate, `NotFound` when missing
pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM candidates WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

/// Count stored candidates
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidates")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("Candidate with ID {} not found", id))
}

/// Fixed-width RFC 3339 so text ordering matches time ordering
fn timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Invalid stored timestamp '{}': {}", s, e)))
}

fn from_row(row: &SqliteRow) -> Result<Candidate> {
    let id_str: String = row.try_get("id")?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| Error::Internal(format!("Invalid stored id '{}': {}", id_str, e)))?;

    let seniority_str: String = row.try_get("seniority")?;
    let seniority = Seniority::from_canonical(&seniority_str).ok_or_else(|| {
        Error::Internal(format!("Invalid stored seniority '{}'", seniority_str))
    })?;

    let years: i64 = row.try_get("years")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Candidate {
        id,
        name: row.try_get("name")?,
        surname: row.try_get("surname")?,
        seniority,
        years: u32::try_from(years)
            .map_err(|_| Error::Internal(format!("Invalid stored years {}", years)))?,
        availability: row.try_get("availability")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
