/// Password hashing and verification using Argon2id
///
/// Implements secure password hashing following OWASP recommendations:
/// - Algorithm: Argon2id (memory-hard, resistant to GPU attacks)
/// - Memory: 64 MB
/// - Iterations: 3
/// - Parallelism: 4 threads
/// - Salt: 16 bytes random
/// - Output: 32 bytes hash
///
/// Verification goes through the `argon2` crate's constant-time comparison;
/// plaintext is never compared directly and never stored.
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use thiserror::Error;

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    #[error("Failed to verify password: {0}")]
    VerificationFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Password hashing configuration
///
/// The cost factor is tunable; the defaults clear the minimum work factor
/// bar by a wide margin.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Memory cost in KB (default: 65536 = 64 MB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 3)
    pub time_cost: u32,
    /// Parallelism (threads, default: 4)
    pub parallelism: u32,
    /// Output length in bytes (default: 32)
    pub output_len: Option<usize>,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64 MB
            time_cost: 3,
            parallelism: 4,
            output_len: Some(32),
        }
    }
}

impl PasswordConfig {
    fn to_params(&self) -> Result<Params, PasswordError> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            self.output_len,
        )
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }
}

/// Hash a plaintext password using Argon2id
///
/// Returns a PHC string (algorithm, parameters, salt, and hash) that is
/// safe to store; the salt is embedded, so no separate storage is needed.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let config = PasswordConfig::default();
    hash_password_with_config(password, &config)
}

/// Hash a password with custom parameters
pub fn hash_password_with_config(
    password: &str,
    config: &PasswordConfig,
) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = config.to_params()?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash
///
/// * `Ok(true)` - Password matches
/// * `Ok(false)` - Password does not match
/// * `Err(PasswordError)` - Stored hash is malformed or verification failed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
    }
}
