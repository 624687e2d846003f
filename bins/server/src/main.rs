//! Tamira API Server
//!
//! Main entry point for the Tamira backend service.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tamira_api::{AppState, create_router};
use tamira_core::auth::{hash_password, validate_password};
use tamira_db::migration::{Migrator, MigratorTrait};
use tamira_db::{UserRepository, connect_with_pool};
use tamira_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tamira=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    // Apply pending migrations
    Migrator::up(&db, None).await?;
    info!("Migrations applied");

    // Create the admin account on first run
    bootstrap_admin(&db, &config).await?;

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        config: Arc::new(config.clone()),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Creates the configured admin account when the users table is empty.
async fn bootstrap_admin(db: &DatabaseConnection, config: &AppConfig) -> anyhow::Result<()> {
    let user_repo = UserRepository::new(db.clone());

    if user_repo.count().await? > 0 {
        return Ok(());
    }

    validate_password(&config.admin.password)?;
    let password_hash = hash_password(&config.admin.password)?;

    let admin = user_repo
        .create(
            &config.admin.username,
            &config.admin.email,
            &password_hash,
            Some(&config.admin.name),
        )
        .await?;

    info!(
        user_id = admin.id,
        username = %admin.username,
        "Bootstrap admin account created"
    );

    Ok(())
}
