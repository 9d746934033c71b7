//! Unified error handling.
//!
//! Provides a unified `AppError` type that maps store and validation
//! failures to JSON responses. All route handlers return `Result<T, AppError>`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tally_core::StoreError;
use thiserror::Error;

use crate::validation::FieldErrors;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Customer or purchase does not exist.
    #[error("Not found: {0}")]
    NotFound(#[from] StoreError),

    /// One or more request fields failed validation.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Request could not be parsed.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(err) => {
                tracing::debug!(error = %err, "Resource not found");
                (StatusCode::NOT_FOUND, Json(json!({ "error": err.to_string() }))).into_response()
            }
            // The body is the bare field -> message map
            Self::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            Self::BadRequest(message) => {
                tracing::debug!(%message, "Rejected malformed request");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use tally_core::{CustomerId, ResourceKind};

    use super::*;

    fn not_found() -> StoreError {
        StoreError::NotFound {
            kind: ResourceKind::Customer,
            id: CustomerId::generate().to_string(),
        }
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");

        let err = AppError::from(not_found());
        assert!(err.to_string().starts_with("Not found: customer "));
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            let response = err.into_response();
            response.status()
        }

        assert_eq!(get_status(AppError::from(not_found())), StatusCode::NOT_FOUND);
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );

        let mut errors = FieldErrors::default();
        errors.add("firstName", "must not be blank");
        assert_eq!(get_status(AppError::from(errors)), StatusCode::BAD_REQUEST);
    }
}
