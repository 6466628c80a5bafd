//! API error types with structured JSON responses.
//!
//! Every failure surfaces as `{"success": false, "message": …}` with a
//! matching HTTP status — never a silent no-op. Transient storage failures
//! map to 503 so the client's next natural trigger retries.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::db::DatabaseError;
use crate::doses::ToggleError;
use crate::notify::DispatchError;

/// Structured failure body shared by all endpoints.
#[derive(Debug, Serialize)]
pub struct FailureBody {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Storage unavailable: {0}")]
    Storage(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidDate(detail) => {
                (StatusCode::BAD_REQUEST, format!("Invalid date: {detail}"))
            }
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail.clone()),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, detail.clone()),
            ApiError::Storage(detail) => {
                tracing::warn!(detail, "Storage unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Storage unavailable, retry shortly".to_string(),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = FailureBody {
            success: false,
            message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{entity_type} {id} not found"))
            }
            DatabaseError::Sqlite(e) => ApiError::Storage(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LockPoisoned => ApiError::Internal("state lock poisoned".into()),
            CoreError::Database(e) => e.into(),
        }
    }
}

impl From<ToggleError> for ApiError {
    fn from(err: ToggleError) -> Self {
        match err {
            ToggleError::MedicineNotFound(id) => {
                ApiError::NotFound(format!("medicine {id} not found"))
            }
            ToggleError::Core(e) => e.into(),
            ToggleError::Database(e) => e.into(),
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Core(e) => e.into(),
            DispatchError::Database(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn invalid_date_returns_400() {
        let response = ApiError::InvalidDate("2026-13-40".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("Invalid date"));
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("medicine 9 not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn storage_returns_503() {
        let response = ApiError::Storage("disk io".into()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let response = ApiError::Internal("lock poisoned".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn toggle_not_found_maps_to_404() {
        let api_err: ApiError = ToggleError::MedicineNotFound(7).into();
        let response = api_err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn sqlite_error_maps_to_storage() {
        let db_err = DatabaseError::Sqlite(rusqlite::Error::ExecuteReturnedResults);
        assert!(matches!(ApiError::from(db_err), ApiError::Storage(_)));
    }
}
