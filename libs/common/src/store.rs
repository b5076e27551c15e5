//! Statement execution against a relational store
//!
//! Repositories talk to the database only through [`Store`], handing it a
//! fully parameterized [`Statement`]. [`PgStore`] is the PostgreSQL
//! implementation used by the services.

#![allow(async_fn_in_trait)]

use serde::de::DeserializeOwned;
use sqlx::{
    FromRow, PgPool, Postgres,
    postgres::{PgArguments, PgRow},
    query::QueryAs,
};
use std::sync::Arc;
use tracing::debug;

use crate::{
    error::{DatabaseError, DatabaseResult},
    sql::{SqlValue, Statement},
};

/// A row type a [`Store`] can produce.
///
/// Rows decode from PostgreSQL through `FromRow` and from plain JSON through
/// `serde`, which lets in-memory stores replay fixture rows.
pub trait Record: for<'r> FromRow<'r, PgRow> + DeserializeOwned + Send + Unpin {}

impl<T> Record for T where T: for<'r> FromRow<'r, PgRow> + DeserializeOwned + Send + Unpin {}

/// Executes parameterized statements and returns the resulting rows
pub trait Store: Send + Sync {
    /// Run `statement` and decode every returned row
    async fn fetch_all<T: Record>(&self, statement: Statement) -> DatabaseResult<Vec<T>>;

    /// Run `statement` and decode the first returned row, if any
    async fn fetch_optional<T: Record>(&self, statement: Statement) -> DatabaseResult<Option<T>> {
        Ok(self.fetch_all(statement).await?.into_iter().next())
    }
}

impl<S: Store> Store for Arc<S> {
    async fn fetch_all<T: Record>(&self, statement: Statement) -> DatabaseResult<Vec<T>> {
        (**self).fetch_all(statement).await
    }
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Store for PgStore {
    async fn fetch_all<T: Record>(&self, statement: Statement) -> DatabaseResult<Vec<T>> {
        let Statement { sql, args } = statement;
        debug!(sql = %sql, args = args.len(), "Executing statement");

        let query = args
            .into_iter()
            .fold(sqlx::query_as::<Postgres, T>(&sql), bind_value);

        query.fetch_all(&self.pool).await.map_err(DatabaseError::Query)
    }
}

fn bind_value<'q, T>(
    query: QueryAs<'q, Postgres, T, PgArguments>,
    value: SqlValue,
) -> QueryAs<'q, Postgres, T, PgArguments> {
    match value {
        SqlValue::Null => query.bind(None::<String>),
        SqlValue::Bool(v) => query.bind(v),
        SqlValue::Int(v) => query.bind(v),
        SqlValue::Float(v) => query.bind(v),
        SqlValue::Text(v) => query.bind(v),
        SqlValue::Date(v) => query.bind(v),
        SqlValue::Time(v) => query.bind(v),
    }
}
