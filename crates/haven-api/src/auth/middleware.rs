/// Authentication middleware for protecting routes
///
/// Extracts and validates bearer tokens from the Authorization header.
/// On success, adds the authenticated identity to request extensions; on
/// any failure the protected handler is never invoked. Verification is a
/// pure function of the token - no session store lookup, no shared
/// mutable state.
use super::jwt::{verify_token, JwtError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use haven_core::{Role, SafeIdentity};
use std::sync::Arc;
use thiserror::Error;

/// Authenticated identity extracted from a verified token
///
/// Added to request extensions by `auth_middleware`; handlers extract it
/// with `Extension<AuthenticatedUser>`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub identity: SafeIdentity,
}

impl AuthenticatedUser {
    /// Check if the user has the admin role
    pub fn is_admin(&self) -> bool {
        self.identity.role == Role::Admin
    }

    /// Check if the user has a specific role
    pub fn has_role(&self, role: Role) -> bool {
        self.identity.role == role
    }
}

/// Authentication middleware errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingAuthHeader => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Missing Authorization header",
            ),
            AuthError::InvalidAuthHeader => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid Authorization header format",
            ),
            AuthError::InvalidToken(_) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid or expired token",
            ),
            AuthError::InsufficientPermissions => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", "Access denied")
            }
        };

        let body = serde_json::json!({
            "code": code,
            "message": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Authentication middleware that requires a valid bearer token
///
/// 1. Extracts the Authorization header
/// 2. Validates the Bearer token format
/// 3. Verifies the token signature and expiration
/// 4. Adds `AuthenticatedUser` to request extensions
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?;

    let claims = match verify_token(&state.jwt, token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "rejected bearer token");
            return Err(AuthError::InvalidToken(e));
        }
    };

    let identity = claims.identity()?;
    request
        .extensions_mut()
        .insert(AuthenticatedUser { identity });

    Ok(next.run(request).await)
}

/// Type alias for role middleware future
type RoleMiddlewareFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>>;

/// Middleware factory for role-based access control
///
/// Returns a middleware that checks the authenticated user's role; admins
/// always pass. Must be layered inside `auth_middleware`.
pub fn require_role(
    required_role: Role,
) -> impl Fn(Request<Body>, Next) -> RoleMiddlewareFuture + Clone {
    move |request: Request<Body>, next: Next| {
        Box::pin(async move {
            let user = request
                .extensions()
                .get::<AuthenticatedUser>()
                .ok_or(AuthError::MissingAuthHeader)?
                .clone();

            if !user.has_role(required_role) && !user.is_admin() {
                tracing::debug!(
                    user_id = %user.identity.id,
                    role = %user.identity.role,
                    required = %required_role,
                    "role gate rejected request"
                );
                return Err(AuthError::InsufficientPermissions);
            }

            Ok(next.run(request).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user_with_role(role: Role) -> AuthenticatedUser {
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
    fn test_is_admin() {
        assert!(user_with_role(Role::Admin).is_admin());
        assert!(!user_with_role(Role::Counsellor).is_admin());
        assert!(!user_with_role(Role::Victim).is_admin());
    }

    #[test]
    fn test_has_role() {
        let counsellor = user_with_role(Role::Counsellor);
        assert!(counsellor.has_role(Role::Counsellor));
        assert!(!counsellor.has_role(Role::Legal));
    }

    #[test]
    fn test_auth_error_statuses() {
        assert_eq!(
            AuthError::MissingAuthHeader.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InvalidToken(JwtError::ExpiredToken)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::InsufficientPermissions.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
