//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use qsl_db::DbError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Callsign or email already registered")]
    AlreadyRegistered,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing session credential")]
    Unauthenticated,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid resource identifier")]
    InvalidIdentifier,

    #[error("Resource not found")]
    NotFound,

    #[error("Resource not owned by the current user")]
    NotOwned,

    #[error("Stored credential is corrupt: {0}")]
    CorruptCredential(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Wire code carried in the `err` field of error responses
    ///
    /// Everything that is not a domain error collapses to `UNKNOWN_ERROR`.
    pub fn code(&self) -> &str {
        match self {
            AuthError::AlreadyRegistered => "ALREADY_REGISTERED",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::InvalidCredentials => "INVALID_PW",
            AuthError::InvalidInput(fields) => fields,
            AuthError::Unauthenticated => "UNAUTHENTICATED",
            AuthError::TokenInvalid => "TOKEN_INVALID",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidIdentifier => "INVALID_OBJECT_ID",
            AuthError::NotFound => "QSL_NOT_FOUND",
            AuthError::NotOwned => "QSL_NOT_OWNED",
            AuthError::CorruptCredential(_)
            | AuthError::PasswordHash(_)
            | AuthError::Jwt(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => "UNKNOWN_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::AlreadyRegistered => StatusCode::CONFLICT,
            AuthError::UserNotFound
            | AuthError::InvalidCredentials
            | AuthError::Unauthenticated
            | AuthError::TokenInvalid
            | AuthError::TokenExpired
            | AuthError::NotOwned => StatusCode::UNAUTHORIZED,
            AuthError::InvalidInput(_) | AuthError::InvalidIdentifier => StatusCode::BAD_REQUEST,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::CorruptCredential(_)
            | AuthError::PasswordHash(_)
            | AuthError::Jwt(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this is a user-facing domain error rather than an internal failure
    pub fn is_domain(&self) -> bool {
        self.status() != StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if !self.is_domain() {
            error!("Request failed: {:?}", self);
        }

        let body = axum::Json(json!({
            "err": self.code()
        }));

        (self.status(), body).into_response()
    }
}
