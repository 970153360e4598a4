// API error taxonomy
//
// Three failure shapes reach clients:
// - Database: store unreachable or a query failed. 500 with the raw error
//   message embedded (the blanket-handler contract)
// - NotFound: single-record lookup miss. 404 with a fixed message
// - Validation: query/path parameter constraints violated. 422
//
// Aggregate queries that legitimately return no rows are NOT errors; those
// endpoints answer 200 with a placeholder message body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Database(#[from] anyhow::Error),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Database(err) => {
                tracing::error!("request failed: {:#}", err);
                let mut response = (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": format!("{:#}", err) })),
                )
                    .into_response();
                // Marker for the path-embedding middleware in main
                response.extensions_mut().insert(InternalError(format!("{:#}", err)));
                response
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": msg }))).into_response()
            }
        }
    }
}

/// Response extension carrying the failure detail so the outer middleware
/// can rebuild the 500 body with the request path included.
#[derive(Debug, Clone)]
pub struct InternalError(pub String);

/// Validate an integer query parameter against an inclusive range.
pub fn check_range<T: PartialOrd + std::fmt::Display + Copy>(
    name: &str,
    value: T,
    min: T,
    max: T,
) -> ApiResult<T> {
    if value < min || value > max {
        return Err(ApiError::validation(format!(
            "{} must be between {} and {}",
            name, min, max
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range_accepts_bounds() {
        assert!(check_range("limit", 1, 1, 1000).is_ok());
        assert!(check_range("limit", 1000, 1, 1000).is_ok());
    }

    #[test]
    fn test_check_range_rejects_out_of_bounds() {
        assert!(check_range("limit", 0, 1, 1000).is_err());
        assert!(check_range("hours", 169, 1, 168).is_err());
    }

    #[tokio::test]
    async fn test_not_found_status() {
        let response = ApiError::NotFound("Visitor record not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_validation_status() {
        let response = ApiError::validation("limit must be between 1 and 1000").into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_database_error_is_500_and_carries_marker() {
        let response = ApiError::Database(anyhow::anyhow!("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<InternalError>().is_some());
    }
}
