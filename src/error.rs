//! Unified API error type.
//!
//! Every handler returns `Result<T, ApiError>`, which implements
//! [`axum::response::IntoResponse`] so failures become a JSON body with the
//! matching status code. Internal errors (database, provider plumbing) are
//! logged in full but only a generic message reaches the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or invalid input from the caller.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Password too short")]
    WeakPassword,

    /// Missing, invalid, or expired credential.
    #[error("{0}")]
    Unauthorized(String),

    /// Uniform login failure: never reveals unknown-email vs wrong-password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Admin access required")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("Email already registered")]
    DuplicateEmail,

    /// Admin tried to change or delete their own account.
    #[error("{0}")]
    SelfModification(String),

    /// Upstream LLM failure, surfaced without retry.
    #[error("Failed to get response from LLM: {0}")]
    Provider(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ApiError::WeakPassword => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ApiError::DuplicateEmail => (StatusCode::CONFLICT, self.to_string()),
            ApiError::SelfModification(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ApiError::Provider(m) => {
                error!(error = %m, "llm provider error");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            ApiError::Database(e) => {
                error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
            ApiError::Internal(e) => {
                error!(error = ?e, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Maps a unique-constraint violation on insert to [`ApiError::DuplicateEmail`],
/// covering the race between the pre-check and the write.
pub fn duplicate_email(e: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db) = &e {
        if db.kind() == sqlx::error::ErrorKind::UniqueViolation {
            return ApiError::DuplicateEmail;
        }
    }
    ApiError::Database(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        let cases = [
            (
                ApiError::InvalidRequest("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::WeakPassword, StatusCode::BAD_REQUEST),
            (
                ApiError::Unauthorized("no token".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden, StatusCode::FORBIDDEN),
            (
                ApiError::NotFound("User not found".into()),
                StatusCode::NOT_FOUND,
            ),
            (ApiError::DuplicateEmail, StatusCode::CONFLICT),
            (
                ApiError::SelfModification("Cannot delete your own account".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn provider_errors_map_to_bad_gateway() {
        let err = ApiError::Provider("upstream timeout".into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn internal_errors_hide_detail() {
        let err = ApiError::Internal(anyhow::anyhow!("secret path /etc/passwd"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
