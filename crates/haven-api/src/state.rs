//! Application state management

use crate::auth::{AuthService, CaptchaVerifier, JwtConfig, UserRepository};
use haven_core::AppConfig;
use sqlx::PgPool;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Database connection pool
    pub db_pool: PgPool,
    /// Token configuration used by the auth gate
    pub jwt: JwtConfig,
    /// Authentication service
    pub auth: AuthService,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// Ready status
    pub is_ready: AtomicBool,
}

impl AppState {
    /// Create new application state from validated configuration
    pub fn new(config: AppConfig, db_pool: PgPool) -> Self {
        let jwt = JwtConfig::from(&config.auth);
        let captcha = CaptchaVerifier::new(&config.captcha);
        let auth = AuthService::new(UserRepository::new(db_pool.clone()), jwt.clone(), captcha);

        Self {
            config,
            db_pool,
            jwt,
            auth,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            is_ready: AtomicBool::new(true),
        }
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Check if service is ready
    pub fn is_ready(&self) -> bool {
        self.is_ready.load(Ordering::SeqCst)
    }

    /// Set ready status
    pub fn set_ready(&self, ready: bool) {
        self.is_ready.store(ready, Ordering::SeqCst);
    }

    /// User repository over the shared pool
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db_pool.clone())
    }
}
