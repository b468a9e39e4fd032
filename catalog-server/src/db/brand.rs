//! Brand database operations

use async_trait::async_trait;
use shared::models::Brand;
use sqlx::PgPool;

use super::PgCatalogStore;
use crate::catalog::BrandStore;
use crate::error::ServiceResult;

pub async fn find_brand(pool: &PgPool, id: i64) -> ServiceResult<Option<Brand>> {
    let brand: Option<Brand> = sqlx::query_as(
        "SELECT id, name, slug, description, logo_url FROM brands WHERE id = $1 AND is_active",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(brand)
}

#[async_trait]
impl BrandStore for PgCatalogStore {
    async fn find_brand(&self, id: i64) -> ServiceResult<Option<Brand>> {
        self.timed("find_brand", find_brand(&self.pool, id)).await
    }
}
