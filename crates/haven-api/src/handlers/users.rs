//! Admin user management handlers
//!
//! List, update, and delete user accounts. All routes require the admin
//! role. Password hashes never appear in responses, and this surface does
//! not replace them.

use crate::auth::{UpdateUserRequest, User};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use haven_core::Role;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// User summary for the admin listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        let identity = user.to_identity();
        Self {
            id: identity.id,
            name: identity.name,
            email: identity.email,
            role: identity.role,
            created_at: user.created_at,
        }
    }
}

/// List all user accounts
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All user accounts", body = [UserSummary]),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
        (status = 403, description = "Admin role required", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let users = state.users().list().await?;
    let summaries: Vec<UserSummary> = users.into_iter().map(UserSummary::from).collect();
    Ok(Json(summaries))
}

/// Update a user's name or role
///
/// The role must belong to the closed enumeration; anything else is a
/// validation failure rather than a silent default.
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = UserSummary),
        (status = 400, description = "Unknown role", body = crate::error::ApiError),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
        (status = 403, description = "Admin role required", body = crate::error::ApiError),
        (status = 404, description = "No such user", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role = match request.role.as_deref() {
        Some(value) => Some(
            Role::from_str(value)
                .ok_or_else(|| AppError::Validation(format!("Unknown role: {value}")))?,
        ),
        None => None,
    };

    let user = state
        .users()
        .update(id, request.name.as_deref(), role)
        .await?;

    Ok(Json(UserSummary::from(user)))
}

/// Delete a user account
///
/// Any session tokens the user still holds remain valid until expiry;
/// protected endpoints that consult the store will reject them.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
        (status = 403, description = "Admin role required", body = crate::error::ApiError),
        (status = 404, description = "No such user", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.users().delete(id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_summary_hides_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: "admin".to_string(),
            created_at: now,
            updated_at: now,
        };

        let summary = UserSummary::from(user);
        let json = serde_json::to_string(&summary).unwrap();

        assert!(json.contains("admin@example.com"));
        assert!(!json.contains("argon2id"));
    }
}
