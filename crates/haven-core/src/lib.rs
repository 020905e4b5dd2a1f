//! Haven Core - Domain models and shared types
//!
//! This crate defines the abstractions shared between the Haven API server
//! and the portal client:
//! - Role enumeration and role-gated identity types
//! - The session payload exchanged between server and client
//! - Configuration management

pub mod config;

pub use config::{AppConfig, AuthConfig, CaptchaConfig, ConfigError, DatabaseConfig, ServerConfig};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ============================================================================
// Roles
// ============================================================================

/// Portal role enum
///
/// Defines the access level for a user in the portal:
/// - Victim: seeks support, files help requests
/// - Counsellor: handles counselling help requests
/// - Legal: legal advisor, handles legal help requests
/// - Admin: full access including user and resource management
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Victim,
    Counsellor,
    Legal,
    Admin,
}

impl Role {
    /// Convert role to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Victim => "victim",
            Role::Counsellor => "counsellor",
            Role::Legal => "legal",
            Role::Admin => "admin",
        }
    }

    /// Parse role from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "victim" => Some(Role::Victim),
            "counsellor" => Some(Role::Counsellor),
            "legal" => Some(Role::Legal),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// All roles accepted at registration time
    pub fn all() -> [Role; 4] {
        [Role::Victim, Role::Counsellor, Role::Legal, Role::Admin]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Identity
// ============================================================================

/// Public projection of a user record
///
/// This is the only user shape that leaves the server: it is embedded in
/// session tokens and returned from the auth endpoints. It never carries
/// the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct SafeIdentity {
    /// Unique user identifier, assigned at creation
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address, lowercase-normalized
    pub email: String,
    /// Portal role
    pub role: Role,
}

/// Session payload returned by register/login and persisted by the client
///
/// The token is a signed bearer token embedding the same identity; it is
/// valid for a fixed window from issuance and carries no revocation
/// mechanism.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct AuthPayload {
    pub user: SafeIdentity,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_conversion() {
        assert_eq!(Role::Victim.as_str(), "victim");
        assert_eq!(Role::Counsellor.as_str(), "counsellor");
        assert_eq!(Role::Legal.as_str(), "legal");
        assert_eq!(Role::Admin.as_str(), "admin");

        assert_eq!(Role::from_str("admin"), Some(Role::Admin));
        assert_eq!(Role::from_str("VICTIM"), Some(Role::Victim));
        assert_eq!(Role::from_str("invalid"), None);
    }

    #[test]
    fn test_role_default_is_victim() {
        assert_eq!(Role::default(), Role::Victim);
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&Role::Legal).unwrap();
        assert_eq!(json, "\"legal\"");

        let role: Role = serde_json::from_str("\"counsellor\"").unwrap();
        assert_eq!(role, Role::Counsellor);
    }

    #[test]
    fn test_auth_payload_roundtrip() {
        let payload = AuthPayload {
            user: SafeIdentity {
                id: Uuid::new_v4(),
                name: "Ava".to_string(),
                email: "ava@x.com".to_string(),
                role: Role::Victim,
            },
            token: "header.claims.sig".to_string(),
        };

        let json = serde_json::to_string(&payload).unwrap();
        let back: AuthPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);

        // The serialized payload must never contain a password hash field
        assert!(!json.contains("password"));
    }
}
