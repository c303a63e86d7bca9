//! Spreadsheet ingestion endpoints
//!
//! Both endpoints read a multipart `excelFile` field and decode the first
//! sheet. They differ in row-count policy:
//!
//! - POST /candidates/create-excel: strict. Exactly one data row, with
//!   `name` and `surname` form fields overriding the sheet. Any failure
//!   rejects the request.
//! - POST /candidates/upload: bulk. Every row is normalized and stored
//!   independently; a row that fails validation is reported and skipped
//!   without aborting the rest.

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};
use candidates_common::db::candidates;
use candidates_common::ingest::{self, decode_workbook, Overrides, RawRow, SheetFormat};
use candidates_common::Candidate;
use serde::Serialize;
use tracing::{info, warn};

use crate::{ApiError, ApiResult, AppState};

/// Multipart field carrying the spreadsheet
pub const FILE_FIELD: &str = "excelFile";

/// A file part read from the request
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// All recognized multipart fields
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub name: Option<String>,
    pub surname: Option<String>,
}

/// Outcome of a bulk import
#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub created: Vec<Candidate>,
    pub failed: Vec<RowFailure>,
}

/// A data row that could not be stored
#[derive(Debug, Serialize)]
pub struct RowFailure {
    /// 1-based position among the sheet's data rows
    pub row: usize,
    pub error: String,
}

/// POST /candidates/create-excel
///
/// **Form fields:** `excelFile` (required), `name` and `surname` (required, non-blank)
///
/// **Errors:**
/// - 400 Bad Request: missing fields, unsupported format, empty sheet, more than one row,
///   or a normalized record that fails validation
/// - 413 Payload Too Large: file exceeds the upload limit
pub async fn create_with_excel(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<Candidate>)> {
    let form = read_form(multipart, state.max_upload_bytes).await?;

    let name = required_text(form.name, "name")?;
    let surname = required_text(form.surname, "surname")?;
    let file = form
        .file
        .ok_or_else(|| ApiError::BadRequest(format!("{} is required", FILE_FIELD)))?;

    let rows = decode_upload(file).await?;
    let input = ingest::ingest_single(rows, &Overrides::new(name, surname))?;

    let candidate = candidates::create(&state.db, input).await?;
    info!(id = %candidate.id, "Created candidate from spreadsheet");

    Ok((StatusCode::CREATED, Json(candidate)))
}

/// POST /candidates/upload
///
/// **Form fields:** `excelFile` (required)
///
/// **Response:** `{"created": [...], "failed": [{"row", "error"}]}`
pub async fn import_excel(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ImportReport>> {
    let form = read_form(multipart, state.max_upload_bytes).await?;
    let file = form
        .file
        .ok_or_else(|| ApiError::BadRequest(format!("{} is required", FILE_FIELD)))?;

    let rows = decode_upload(file).await?;
    let inputs = ingest::ingest_bulk(rows)?;
    info!("Importing {} spreadsheet rows", inputs.len());

    let mut report = ImportReport {
        created: Vec::with_capacity(inputs.len()),
        failed: Vec::new(),
    };

    for (index, input) in inputs.into_iter().enumerate() {
        let row = index + 1;
        match candidates::create(&state.db, input).await {
            Ok(candidate) => report.created.push(candidate),
            Err(e) => {
                warn!("Skipping spreadsheet row {}: {}", row, e);
                report.failed.push(RowFailure {
                    row,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        "Import finished: {} created, {} failed",
        report.created.len(),
        report.failed.len()
    );

    Ok(Json(report))
}

/// Collect the recognized fields of a multipart request
///
/// Unknown fields are drained and ignored.
pub async fn read_form(
    multipart: Result<Multipart, MultipartRejection>,
    max_upload_bytes: usize,
) -> ApiResult<UploadForm> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            FILE_FIELD => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;

                if bytes.len() > max_upload_bytes {
                    return Err(ApiError::PayloadTooLarge(format!(
                        "file is {} bytes, limit is {} bytes",
                        bytes.len(),
                        max_upload_bytes
                    )));
                }

                form.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            "name" | "surname" => {
                let value = field.text().await.map_err(multipart_error)?;
                if field_name == "name" {
                    form.name = Some(value);
                } else {
                    form.surname = Some(value);
                }
            }
            _ => {
                field.bytes().await.map_err(multipart_error)?;
            }
        }
    }

    Ok(form)
}

/// Detect the format and decode off the async runtime
async fn decode_upload(file: UploadedFile) -> ApiResult<Vec<RawRow>> {
    let format = SheetFormat::detect(file.file_name.as_deref(), file.content_type.as_deref())?;

    let rows = tokio::task::spawn_blocking(move || decode_workbook(&file.bytes, format))
        .await
        .map_err(|e| ApiError::Internal(format!("Spreadsheet decoding task failed: {}", e)))??;

    Ok(rows)
}

/// Body-limit overruns surface as 413, everything else as 400
fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::BadRequest(e.body_text())
    }
}

fn required_text(value: Option<String>, field: &str) -> ApiResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("{} must not be empty", field)))
}

/// Build spreadsheet upload routes
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/candidates/create-excel", post(create_with_excel))
        .route("/candidates/upload", post(import_excel))
}
