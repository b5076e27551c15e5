//! Integration tests for the infrastructure components
//!
//! These tests verify that the PostgreSQL database is reachable and that
//! statements produced by the partial update compiler execute through
//! `PgStore`. They need a running PostgreSQL instance (`DATABASE_URL`).

use common::{
    database::{DatabaseConfig, health_check, init_pool},
    sql::{Statement, UpdateFields, sql_for_partial_update},
    store::{PgStore, Store},
};
use serde::Deserialize;
use sqlx::FromRow;

#[derive(Debug, Deserialize, FromRow)]
struct Venue {
    id: String,
    name: String,
    capacity: i64,
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_partial_update_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    // temporary tables live on one connection
    let db_config = DatabaseConfig {
        max_connections: 1,
        ..DatabaseConfig::from_env()?
    };
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    sqlx::query(
        "CREATE TEMPORARY TABLE venues (id TEXT PRIMARY KEY, name TEXT NOT NULL, capacity BIGINT NOT NULL)",
    )
    .execute(&pool)
    .await?;

    let store = PgStore::new(pool);

    let created: Vec<Venue> = store
        .fetch_all(
            Statement::new("INSERT INTO venues (id, name, capacity) VALUES ($1, $2, $3) RETURNING *")
                .bind("v1")
                .bind("Old Hall")
                .bind(100_i64),
        )
        .await?;
    assert_eq!(created.len(), 1);

    let fields = UpdateFields::new()
        .with("name", "New Hall")
        .with("capacity", 250_i64);
    let updated: Option<Venue> = store
        .fetch_optional(sql_for_partial_update("venues", fields, "id", "v1"))
        .await?;

    let venue = updated.expect("updated row should be returned");
    assert_eq!(venue.id, "v1");
    assert_eq!(venue.name, "New Hall");
    assert_eq!(venue.capacity, 250);

    let missing: Option<Venue> = store
        .fetch_optional(sql_for_partial_update(
            "venues",
            UpdateFields::new().with("name", "Nowhere"),
            "id",
            "missing-id",
        ))
        .await?;
    assert!(missing.is_none());

    Ok(())
}
