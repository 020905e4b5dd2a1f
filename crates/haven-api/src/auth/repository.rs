//! Credential store backed by PostgreSQL
//!
//! Owns all persistence of user records. Email uniqueness is enforced by a
//! unique index at the storage layer, so two concurrent registrations with
//! the same address cannot both succeed regardless of application-level
//! check ordering; the losing insert surfaces as `EmailAlreadyExists`.

use super::models::User;
use chrono::Utc;
use haven_core::Role;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Postgres unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// Repository errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Email already exists")]
    EmailAlreadyExists,
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                RepositoryError::EmailAlreadyExists
            }
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

/// Normalize an email for storage and lookup.
///
/// All comparisons are case-insensitive; records only ever hold the
/// lowercase form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User repository over the shared connection pool
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by email, case-insensitively
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, created_at, updated_at \
             FROM users WHERE email = $1",
        )
        .bind(normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Create a new user record
    ///
    /// Assigns a fresh UUID and creation timestamp. Fails with
    /// `EmailAlreadyExists` when the unique index rejects the insert.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) \
             RETURNING id, name, email, password_hash, role, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(normalize_email(email))
        .bind(password_hash)
        .bind(role.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// List all users, newest first
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, created_at, updated_at \
             FROM users ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Update a user's name and/or role
    pub async fn update(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        role: Option<Role>,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET \
                 name = COALESCE($2, name), \
                 role = COALESCE($3, role), \
                 updated_at = $4 \
             WHERE id = $1 \
             RETURNING id, name, email, password_hash, role, created_at, updated_at",
        )
        .bind(user_id)
        .bind(name)
        .bind(role.map(|r| r.as_str()))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or(RepositoryError::UserNotFound)
    }

    /// Delete a user record
    pub async fn delete(&self, user_id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::UserNotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("Ava@X.com"), "ava@x.com");
        assert_eq!(normalize_email("  USER@EXAMPLE.COM  "), "user@example.com");
        assert_eq!(normalize_email("already@lower.case"), "already@lower.case");
    }
}
