//! Database models for authentication and user management

use chrono::{DateTime, Utc};
use haven_core::{Role, SafeIdentity};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// User account record
///
/// The server-side shape backing the `users` table. The password hash is
/// never serialized in API responses; `email` is stored lowercase.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user identifier, assigned at creation
    pub id: Uuid,

    /// User's display name
    pub name: String,

    /// User's email address (unique, lowercase-normalized)
    pub email: String,

    /// Hashed password (Argon2id PHC string)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// User's portal role, stored as text
    pub role: String,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public projection of this record, safe to embed in tokens and
    /// return to clients
    pub fn to_identity(&self) -> SafeIdentity {
        SafeIdentity {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: Role::from_str(&self.role).unwrap_or_default(),
        }
    }
}

/// Admin user update request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: "counsellor".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_to_identity_projects_public_fields() {
        let user = sample_user();
        let identity = user.to_identity();

        assert_eq!(identity.id, user.id);
        assert_eq!(identity.email, "test@example.com");
        assert_eq!(identity.role, Role::Counsellor);
    }

    #[test]
    fn test_unknown_stored_role_falls_back_to_victim() {
        let mut user = sample_user();
        user.role = "mystery".to_string();
        assert_eq!(user.to_identity().role, Role::Victim);
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }
}
