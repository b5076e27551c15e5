use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod jwt;
mod middleware;
mod models;
mod password;
mod policy;
mod repositories;
mod routes;
mod state;
mod validation;

use common::{
    database::{DatabaseConfig, health_check, init_pool},
    error::DatabaseError,
    store::PgStore,
};
use tokio::net::TcpListener;

use crate::{
    config::AppConfig,
    jwt::JwtService,
    password::PasswordService,
    repositories::{AdminRepository, EventRequestRepository, UserRepository},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting GigMatch API service");

    let app_config = AppConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;
    info!("Database migrations applied");

    let tokens = JwtService::new(app_config.jwt_config());
    let passwords = PasswordService::new(&app_config.password_config())?;
    let store = PgStore::new(pool.clone());

    // Initialize repositories
    let user_repository = UserRepository::new(store.clone(), passwords, tokens.clone());
    let event_request_repository = EventRequestRepository::new(store);
    let admin_repository =
        AdminRepository::new(user_repository.clone(), event_request_repository.clone());

    let app_state = AppState {
        db_pool: pool,
        tokens,
        user_repository,
        event_request_repository,
        admin_repository,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let addr = format!("0.0.0.0:{}", app_config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("GigMatch API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
