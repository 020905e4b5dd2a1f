//! Session token generation and validation
//!
//! Implements JWT-based sessions with HMAC-SHA256 signing. Tokens embed the
//! user's public identity and are valid for a fixed window (7 days by
//! default) from issuance. There is no revocation mechanism: a token stays
//! valid until it expires or the client discards it.

use haven_core::{config::AuthConfig, Role, SafeIdentity};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// JWT claims embedded in a session token
///
/// Carries the `SafeIdentity` fields plus standard issuer/time claims.
/// The password hash is never part of a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer
    pub iss: String,
    /// Subject - user ID
    pub sub: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
    /// User's display name
    pub name: String,
    /// User's email address
    pub email: String,
    /// User's portal role
    pub role: String,
}

impl Claims {
    /// Recover the identity embedded in validated claims.
    ///
    /// A token whose subject is not a UUID or whose role is outside the
    /// closed enumeration is malformed, even if its signature checks out.
    pub fn identity(&self) -> Result<SafeIdentity, JwtError> {
        let id = Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidToken)?;
        let role = Role::from_str(&self.role).ok_or(JwtError::InvalidToken)?;

        Ok(SafeIdentity {
            id,
            name: self.name.clone(),
            email: self.email.clone(),
            role,
        })
    }
}

/// Token generation and validation errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
}

/// Token issuance configuration
///
/// There is intentionally no `Default` impl and no fallback secret: the
/// signing key always comes from validated deployment configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing
    pub secret: String,
    /// Token validity window in seconds
    pub token_ttl_secs: u64,
    /// Token issuer identifier
    pub issuer: String,
}

impl From<&AuthConfig> for JwtConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            token_ttl_secs: config.token_ttl_secs,
            issuer: config.issuer.clone(),
        }
    }
}

/// Issue a signed session token for an authenticated identity
///
/// The token expires `config.token_ttl_secs` after issuance.
pub fn issue_token(config: &JwtConfig, identity: &SafeIdentity) -> Result<String, JwtError> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let claims = Claims {
        iss: config.issuer.clone(),
        sub: identity.id.to_string(),
        iat: now,
        exp: now + config.token_ttl_secs,
        name: identity.name.clone(),
        email: identity.email.clone(),
        role: identity.role.to_string(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate a session token and extract its claims
///
/// Succeeds only when both the signature and the expiry check out; it does
/// not consult the credential store, so a token can outlive its user
/// record.
pub fn verify_token(config: &JwtConfig, token: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::InvalidToken,
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".to_string(),
            token_ttl_secs: 7 * 24 * 60 * 60,
            issuer: "haven-api".to_string(),
        }
    }

    fn test_identity() -> SafeIdentity {
        SafeIdentity {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            role: Role::Counsellor,
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let config = test_config();
        let identity = test_identity();

        let token = issue_token(&config, &identity).expect("Failed to issue token");
        let claims = verify_token(&config, &token).expect("Failed to verify token");

        assert_eq!(claims.iss, "haven-api");
        assert_eq!(claims.exp, claims.iat + config.token_ttl_secs);
        assert_eq!(claims.identity().unwrap(), identity);
    }

    #[test]
    fn test_invalid_token() {
        let config = test_config();
        let result = verify_token(&config, "invalid.token.here");
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret() {
        let config1 = test_config();
        let config2 = JwtConfig {
            secret: "another-secret".to_string(),
            ..test_config()
        };

        let token = issue_token(&config1, &test_identity()).unwrap();
        let result = verify_token(&config2, &token);
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_expired_token() {
        let config = test_config();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        // Issued eight days ago with a seven-day window
        let claims = Claims {
            iss: config.issuer.clone(),
            sub: Uuid::new_v4().to_string(),
            iat: now - 8 * 24 * 60 * 60,
            exp: now - 24 * 60 * 60,
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            role: "victim".to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = verify_token(&config, &token);
        assert!(matches!(result, Err(JwtError::ExpiredToken)));
    }

    #[test]
    fn test_malformed_subject_rejected() {
        let claims = Claims {
            iss: "haven-api".to_string(),
            sub: "not-a-uuid".to_string(),
            iat: 1000,
            exp: 2000,
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            role: "victim".to_string(),
        };

        assert!(matches!(claims.identity(), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let claims = Claims {
            iss: "haven-api".to_string(),
            sub: Uuid::new_v4().to_string(),
            iat: 1000,
            exp: 2000,
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            role: "superuser".to_string(),
        };

        assert!(matches!(claims.identity(), Err(JwtError::InvalidToken)));
    }
}
