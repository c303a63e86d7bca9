//! # Candidates Common Library
//!
//! Shared code for the candidates service including:
//! - Candidate model and validation
//! - Spreadsheet ingestion (row extraction, field resolution, normalization)
//! - Database initialization and candidate persistence
//! - Configuration loading

pub mod candidate;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;

pub use candidate::{Candidate, CandidateInput, CandidatePatch, Seniority};
pub use error::{Error, Result};
