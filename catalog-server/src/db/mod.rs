//! Database access layer (PostgreSQL)

pub mod brand;
pub mod category;
pub mod product;
pub mod query_builder;

#[cfg(test)]
pub mod memory;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::future::Future;
use std::time::Duration;

use crate::BoxError;
use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};

/// Connect the shared pool and bring the schema up to date
pub async fn connect(config: &Config) -> Result<PgPool, BoxError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_open_conns)
        .min_connections(config.db_max_idle_conns.min(config.db_max_open_conns))
        .idle_timeout(config.db_max_idle_time)
        .acquire_timeout(config.db_query_timeout)
        .connect(&config.database_url)
        .await?;

    tracing::info!(
        max_connections = config.db_max_open_conns,
        "Connected to PostgreSQL"
    );

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Run one store operation under `budget`.
///
/// On expiry the future is dropped, which cancels the statement and hands the
/// connection back to the pool.
pub async fn with_timeout<T, F>(budget: Duration, operation: &'static str, fut: F) -> ServiceResult<T>
where
    F: Future<Output = ServiceResult<T>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::Timeout(operation)),
    }
}

/// Catalog store backed by the shared connection pool
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn timed<T, F>(&self, operation: &'static str, fut: F) -> ServiceResult<T>
    where
        F: Future<Output = ServiceResult<T>>,
    {
        with_timeout(self.query_timeout, operation, fut).await
    }
}
