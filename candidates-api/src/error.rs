//! Error types for candidates-api

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use candidates_common::ingest::IngestError;
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upload rejected by the ingestion core (400)
    #[error("Invalid spreadsheet: {0}")]
    Ingest(#[from] IngestError),

    /// Upload larger than the configured limit (413)
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<candidates_common::Error> for ApiError {
    fn from(err: candidates_common::Error) -> Self {
        use candidates_common::Error;

        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Ingest(e) => ApiError::Ingest(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Ingest(ref err) => {
                let code = match err {
                    IngestError::EmptyInput => "EMPTY_INPUT",
                    IngestError::MultipleRows { .. } => "MULTIPLE_ROWS",
                    IngestError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
                    IngestError::Workbook(_) => "INVALID_WORKBOOK",
                };
                (StatusCode::BAD_REQUEST, code, err.to_string())
            }
            ApiError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_errors_map_to_status() {
        let not_found: ApiError = candidates_common::Error::NotFound("x".into()).into();
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);

        let invalid: ApiError = candidates_common::Error::InvalidInput("x".into()).into();
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);

        let config: ApiError = candidates_common::Error::Config("x".into()).into();
        assert_eq!(config.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_ingest_errors_are_bad_request() {
        let err: ApiError = IngestError::MultipleRows { count: 3 }.into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err: ApiError = candidates_common::Error::Ingest(IngestError::EmptyInput).into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_payload_too_large_status() {
        let err = ApiError::PayloadTooLarge("big".into());
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
