//! Generic record store endpoints
//!
//! The portal's curated content (resources, support services, legal
//! resources) and victim help requests are all stored as opaque JSON
//! payloads keyed by opaque identifiers. The record store knows nothing
//! about payload shape; the UI layer owns that.
//!
//! Collection names are a closed set. Curated collections are writable by
//! admins only; help requests can be filed by any authenticated user and
//! are handled (updated/closed) by counsellors, legal advisors, and
//! admins.

use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use haven_core::Role;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Collections curated by admins
const CURATED_COLLECTIONS: [&str; 3] = ["resources", "support_services", "legal_resources"];

/// Collection of victim-filed help requests
const HELP_REQUESTS: &str = "help_requests";

fn is_known_collection(collection: &str) -> bool {
    collection == HELP_REQUESTS || CURATED_COLLECTIONS.contains(&collection)
}

/// Whether `user` may create records in `collection`
fn may_create(user: &AuthenticatedUser, collection: &str) -> bool {
    if collection == HELP_REQUESTS {
        return true;
    }
    user.is_admin()
}

/// Whether `user` may update or delete records in `collection`
fn may_modify(user: &AuthenticatedUser, collection: &str) -> bool {
    if collection == HELP_REQUESTS {
        return matches!(
            user.identity.role,
            Role::Counsellor | Role::Legal | Role::Admin
        );
    }
    user.is_admin()
}

/// A stored record with its opaque payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct StoredRecord {
    pub id: Uuid,
    pub collection: String,
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List all records in a collection, newest first
#[utoipa::path(
    get,
    path = "/records/{collection}",
    tag = "records",
    responses(
        (status = 200, description = "Records in the collection", body = [StoredRecord]),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
        (status = 404, description = "Unknown collection", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_records(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !is_known_collection(&collection) {
        return Err(AppError::NotFound("Collection".to_string()));
    }

    let records = sqlx::query_as::<_, StoredRecord>(
        "SELECT id, collection, payload, created_by, created_at, updated_at \
         FROM records WHERE collection = $1 ORDER BY created_at DESC",
    )
    .bind(&collection)
    .fetch_all(&state.db_pool)
    .await?;

    Ok(Json(records))
}

/// Create a record in a collection
#[utoipa::path(
    post,
    path = "/records/{collection}",
    tag = "records",
    responses(
        (status = 201, description = "Record created", body = StoredRecord),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
        (status = 403, description = "Role may not write this collection", body = crate::error::ApiError),
        (status = 404, description = "Unknown collection", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_record(
    State(state): State<Arc<AppState>>,
    Path(collection): Path<String>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<serde_json::Value>,
) -> Result<impl IntoResponse, AppError> {
    if !is_known_collection(&collection) {
        return Err(AppError::NotFound("Collection".to_string()));
    }
    if !may_create(&user, &collection) {
        return Err(AppError::Forbidden);
    }

    let now = Utc::now();
    let record = sqlx::query_as::<_, StoredRecord>(
        "INSERT INTO records (id, collection, payload, created_by, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $5) \
         RETURNING id, collection, payload, created_by, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(&collection)
    .bind(&payload)
    .bind(user.identity.id)
    .bind(now)
    .fetch_one(&state.db_pool)
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Replace a record's payload
#[utoipa::path(
    put,
    path = "/records/{collection}/{id}",
    tag = "records",
    responses(
        (status = 200, description = "Record updated", body = StoredRecord),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
        (status = 403, description = "Role may not write this collection", body = crate::error::ApiError),
        (status = 404, description = "Unknown collection or record", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_record(
    State(state): State<Arc<AppState>>,
    Path((collection, id)): Path<(String, Uuid)>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<serde_json::Value>,
) -> Result<impl IntoResponse, AppError> {
    if !is_known_collection(&collection) {
        return Err(AppError::NotFound("Collection".to_string()));
    }
    if !may_modify(&user, &collection) {
        return Err(AppError::Forbidden);
    }

    let record = sqlx::query_as::<_, StoredRecord>(
        "UPDATE records SET payload = $3, updated_at = $4 \
         WHERE collection = $1 AND id = $2 \
         RETURNING id, collection, payload, created_by, created_at, updated_at",
    )
    .bind(&collection)
    .bind(id)
    .bind(&payload)
    .bind(Utc::now())
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Record".to_string()))?;

    Ok(Json(record))
}

/// Delete a record
#[utoipa::path(
    delete,
    path = "/records/{collection}/{id}",
    tag = "records",
    responses(
        (status = 200, description = "Record deleted"),
        (status = 401, description = "Missing or invalid token", body = crate::error::ApiError),
        (status = 403, description = "Role may not write this collection", body = crate::error::ApiError),
        (status = 404, description = "Unknown collection or record", body = crate::error::ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    Path((collection, id)): Path<(String, Uuid)>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, AppError> {
    if !is_known_collection(&collection) {
        return Err(AppError::NotFound("Collection".to_string()));
    }
    if !may_modify(&user, &collection) {
        return Err(AppError::Forbidden);
    }

    let result = sqlx::query("DELETE FROM records WHERE collection = $1 AND id = $2")
        .bind(&collection)
        .bind(id)
        .execute(&state.db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Record".to_string()));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_core::SafeIdentity;

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            identity: SafeIdentity {
                id: Uuid::new_v4(),
                name: "Test".to_string(),
                email: "test@example.com".to_string(),
                role,
            },
        }
    }

    #[test]
    fn test_known_collections() {
        assert!(is_known_collection("resources"));
        assert!(is_known_collection("support_services"));
        assert!(is_known_collection("legal_resources"));
        assert!(is_known_collection("help_requests"));
        assert!(!is_known_collection("secrets"));
    }

    #[test]
    fn test_anyone_may_file_help_requests() {
        for role in Role::all() {
            assert!(may_create(&user(role), HELP_REQUESTS));
        }
    }

    #[test]
    fn test_only_admin_creates_curated_records() {
        assert!(may_create(&user(Role::Admin), "resources"));
        assert!(!may_create(&user(Role::Victim), "resources"));
        assert!(!may_create(&user(Role::Counsellor), "support_services"));
    }

    #[test]
    fn test_help_requests_handled_by_staff_roles() {
        assert!(may_modify(&user(Role::Counsellor), HELP_REQUESTS));
        assert!(may_modify(&user(Role::Legal), HELP_REQUESTS));
        assert!(may_modify(&user(Role::Admin), HELP_REQUESTS));
        assert!(!may_modify(&user(Role::Victim), HELP_REQUESTS));
    }
}
