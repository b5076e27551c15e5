//! Common library for the GigMatch backend
//!
//! This crate provides shared functionality used by the GigMatch services:
//! database connectivity, error handling, parameterized statement building
//! (including the partial update compiler) and the store abstraction that
//! executes those statements.

pub mod database;
pub mod error;
pub mod sql;
pub mod store;

/// Example usage of the database and store modules
///
/// ```rust,no_run
/// use common::database::{DatabaseConfig, init_pool, health_check};
/// use common::store::PgStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig::from_env()?;
///     let pool = init_pool(&config).await?;
///     let is_healthy = health_check(&pool).await?;
///     println!("Database health check: {}", is_healthy);
///     let _store = PgStore::new(pool);
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
