//! Authentication API handlers
//!
//! HTTP endpoints for registration, login, and token-protected identity
//! checks.

use crate::auth::{AuthenticatedUser, LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use haven_core::SafeIdentity;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Response echoed by the protected test endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProtectedResponse {
    pub message: String,
    pub user: SafeIdentity,
}

/// Register a new user account
///
/// Creates a user with the provided name, email, password, and optional
/// role, then returns the identity together with a session token. New
/// users without a recognized role are assigned `victim`.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = haven_core::AuthPayload),
        (status = 400, description = "Missing fields, duplicate email, or CAPTCHA failure", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = state.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

/// Login with email and password
///
/// Authenticates a user and returns the identity together with a session
/// token. Unknown email and wrong password are indistinguishable in the
/// response.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = haven_core::AuthPayload),
        (status = 400, description = "Invalid credentials, missing fields, or CAPTCHA failure", body = crate::error::ApiError),
        (status = 500, description = "Internal server error", body = crate::error::ApiError),
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = state.auth.login(request).await?;
    Ok(Json(payload))
}

/// Protected echo endpoint
///
/// Returns the identity embedded in the presented bearer token. Useful
/// for clients to confirm a stored token is still accepted.
#[utoipa::path(
    get,
    path = "/auth/test-protected",
    tag = "auth",
    responses(
        (status = 200, description = "Protected route accessed", body = ProtectedResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn test_protected_handler(
    Extension(user): Extension<AuthenticatedUser>,
) -> impl IntoResponse {
    Json(ProtectedResponse {
        message: "Protected route accessed".to_string(),
        user: user.identity,
    })
}

/// Get current user profile
///
/// Looks the authenticated user up in the credential store, so a token
/// whose user has since been deleted yields 404 rather than the stale
/// token contents.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user profile", body = SafeIdentity),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
        (status = 404, description = "User no longer exists", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    let identity = state.auth.get_user(user.identity.id).await?;
    Ok(Json(identity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_core::Role;
    use uuid::Uuid;

    #[test]
    fn test_protected_response_serialization() {
        let response = ProtectedResponse {
            message: "Protected route accessed".to_string(),
            user: SafeIdentity {
                id: Uuid::new_v4(),
                name: "Ava".to_string(),
                email: "ava@x.com".to_string(),
                role: Role::Victim,
            },
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("ava@x.com"));
        assert!(json.contains("\"role\":\"victim\""));
    }
}
