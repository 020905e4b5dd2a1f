//! API route definitions

use crate::auth::middleware::{auth_middleware, require_role};
use crate::handlers::{auth, records, users};
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use haven_core::Role;
use std::sync::Arc;

/// Create the portal API routes
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler));

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/auth/test-protected", get(auth::test_protected_handler))
        .route("/auth/me", get(auth::me_handler))
        // Record store endpoints; per-collection write policy lives in the
        // handlers
        .route(
            "/records/:collection",
            get(records::list_records).post(records::create_record),
        )
        .route(
            "/records/:collection/:id",
            put(records::update_record).delete(records::delete_record),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Admin routes (authentication + admin role)
    let admin_routes = Router::new()
        .route("/users", get(users::list_users))
        .route(
            "/users/:id",
            put(users::update_user).delete(users::delete_user),
        )
        .route_layer(middleware::from_fn(require_role(Role::Admin)))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(admin_routes)
}
