//! Candidate CRUD endpoints
//!
//! - GET    /candidates      list, newest first
//! - GET    /candidates/:id  one candidate
//! - POST   /candidates      create from JSON
//! - PATCH  /candidates/:id  partial update
//! - DELETE /candidates/:id  remove (204)

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use candidates_common::db::candidates;
use candidates_common::{Candidate, CandidateInput, CandidatePatch};
use tracing::info;
use uuid::Uuid;

use crate::{ApiError, ApiResult, AppState};

/// GET /candidates
pub async fn list_candidates(State(state): State<AppState>) -> ApiResult<Json<Vec<Candidate>>> {
    let all = candidates::list(&state.db).await?;
    Ok(Json(all))
}

/// GET /candidates/:id
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Candidate>> {
    let id = parse_id(&id)?;
    let candidate = candidates::get(&state.db, id).await?;
    Ok(Json(candidate))
}

/// POST /candidates
///
/// **Request:** `{"name", "surname", "seniority": "junior"|"senior", "years": 0..=50, "availability"}`
///
/// **Errors:**
/// - 400 Bad Request: malformed JSON, unknown seniority, years out of range, blank names
pub async fn create_candidate(
    State(state): State<AppState>,
    payload: Result<Json<CandidateInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Candidate>)> {
    let Json(input) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let candidate = candidates::create(&state.db, input).await?;
    info!(id = %candidate.id, "Created candidate");

    Ok((StatusCode::CREATED, Json(candidate)))
}

/// PATCH /candidates/:id
pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CandidatePatch>, JsonRejection>,
) -> ApiResult<Json<Candidate>> {
    let id = parse_id(&id)?;
    let Json(patch) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let candidate = candidates::update(&state.db, id, patch).await?;
    info!(id = %candidate.id, "Updated candidate");

    Ok(Json(candidate))
}

/// DELETE /candidates/:id
pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id)?;
    candidates::delete(&state.db, id).await?;
    info!(%id, "Deleted candidate");

    Ok(StatusCode::NO_CONTENT)
}

/// Malformed ids cannot match any stored row, so they are a 404
fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::NotFound(format!("Candidate with ID {} not found", raw)))
}

/// Build candidate CRUD routes
pub fn candidate_routes() -> Router<AppState> {
    Router::new()
        .route("/candidates", get(list_candidates).post(create_candidate))
        .route(
            "/candidates/:id",
            get(get_candidate)
                .patch(update_candidate)
                .delete(delete_candidate),
        )
}
