//! Authentication and authorization module
//!
//! Provides token-based authentication with the following components:
//! - Session token generation and validation
//! - Password hashing with Argon2
//! - CAPTCHA verification against an external service
//! - Middleware for request authentication and role gating
//! - Authentication service orchestrating registration and login
//! - Credential store backed by PostgreSQL

pub mod captcha;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;

pub use captcha::{CaptchaError, CaptchaVerifier};
pub use jwt::{issue_token, verify_token, Claims, JwtConfig, JwtError};
pub use middleware::{auth_middleware, require_role, AuthError, AuthenticatedUser};
pub use models::{UpdateUserRequest, User};
pub use password::{hash_password, verify_password, PasswordError};
pub use repository::{normalize_email, RepositoryError, UserRepository};
pub use service::{AuthService, LoginRequest, RegisterRequest};
