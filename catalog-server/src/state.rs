//! Application state for the catalog server

use std::sync::Arc;

use crate::BoxError;
use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::db::{self, PgCatalogStore};
use crate::services::CatalogService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: CatalogService,
}

impl AppState {
    /// Connect to PostgreSQL, run migrations and wire the catalog service
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = db::connect(config).await?;
        let store = PgCatalogStore::new(pool, config.db_query_timeout);
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Build state over an arbitrary store
    pub fn with_store(config: &Config, store: Arc<dyn CatalogStore>) -> Self {
        Self {
            config: Arc::new(config.clone()),
            catalog: CatalogService::new(store),
        }
    }
}
