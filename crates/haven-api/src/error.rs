//! API error handling
//!
//! Maps service failures to client-facing `{code, message}` JSON bodies.
//! Internal failure detail is logged server-side and never serialized into
//! a response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The single message for both unknown-email and wrong-password rejections.
///
/// Keeping these byte-identical prevents probing which emails are
/// registered.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed input, user-correctable
    Validation(String),
    /// CAPTCHA verification returned false
    CaptchaFailed,
    /// Email already registered
    DuplicateEmail,
    /// Unknown email or wrong password; never distinguished
    InvalidCredentials,
    /// Missing, malformed, or expired bearer token
    Unauthorized,
    /// Authenticated but lacking the required role
    Forbidden,
    /// Resource does not exist
    NotFound(String),
    /// Unexpected internal failure; detail is logged, never returned
    ServiceUnavailable,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ApiError::new("VALIDATION", msg)),
            AppError::CaptchaFailed => (
                StatusCode::BAD_REQUEST,
                ApiError::new("CAPTCHA_FAILED", "CAPTCHA verification failed"),
            ),
            AppError::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                ApiError::new("DUPLICATE_EMAIL", "Email already registered"),
            ),
            AppError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_CREDENTIALS", INVALID_CREDENTIALS_MESSAGE),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("UNAUTHORIZED", "Authentication required"),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                ApiError::new("FORBIDDEN", "Access denied"),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ApiError::new("NOT_FOUND", format!("{resource} not found")),
            ),
            AppError::ServiceUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("SERVICE_UNAVAILABLE", "Service temporarily unavailable"),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<crate::auth::RepositoryError> for AppError {
    fn from(err: crate::auth::RepositoryError) -> Self {
        use crate::auth::RepositoryError;

        match err {
            RepositoryError::EmailAlreadyExists => AppError::DuplicateEmail,
            RepositoryError::UserNotFound => AppError::NotFound("User".to_string()),
            RepositoryError::Database(msg) => {
                tracing::error!(error = %msg, "credential store failure");
                AppError::ServiceUnavailable
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record".to_string()),
            other => {
                tracing::error!(error = %other, "database failure");
                AppError::ServiceUnavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_body_is_fixed() {
        let response = AppError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_service_unavailable_carries_no_detail() {
        let error = ApiError::new("SERVICE_UNAVAILABLE", "Service temporarily unavailable");
        let json = serde_json::to_string(&error).unwrap();
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::DuplicateEmail.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("User".to_string()).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
