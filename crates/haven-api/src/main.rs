//! Haven API Server
//!
//! REST API server for the Haven role-based support portal.

use haven_api::{create_router, state::AppState};
use haven_core::AppConfig;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "haven_api=debug,tower_http=debug".into()),
        )
        .init();

    // Load configuration; missing deployment secrets abort startup here,
    // before any socket is bound.
    let config = AppConfig::from_env()?;

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.pool_size)
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!().run(&db_pool).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state
    let state = Arc::new(AppState::new(config, db_pool));

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Haven API server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
