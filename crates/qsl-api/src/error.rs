//! API error types

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum ApiError {
    /// Body carries the comma-joined names of the offending fields
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] qsl_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] qsl_auth::AuthError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest("body".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match self {
            ApiError::Auth(e) => return e.into_response(),
            ApiError::BadRequest(fields) => (StatusCode::BAD_REQUEST, fields),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UNKNOWN_ERROR".to_string(),
                )
            }
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UNKNOWN_ERROR".to_string(),
                )
            }
        };

        (status, axum::Json(json!({ "err": code }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsl_auth::AuthError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::BadRequest("rst".to_string()), StatusCode::BAD_REQUEST),
            (
                ApiError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::Database(qsl_db::DbError::Migration("x".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ApiError::Auth(AuthError::NotOwned), StatusCode::UNAUTHORIZED),
            (
                ApiError::Auth(AuthError::InvalidIdentifier),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::Auth(AuthError::NotFound), StatusCode::NOT_FOUND),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
