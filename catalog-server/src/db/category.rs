//! Category database operations

use async_trait::async_trait;
use shared::models::Category;
use sqlx::PgPool;
use std::collections::BTreeSet;

use super::PgCatalogStore;
use super::query_builder::subtree_cte;
use crate::catalog::{CategoryStore, MAX_CATEGORY_DEPTH};
use crate::error::ServiceResult;

/// Upward walk over active categories. The depth counter caps a cyclic chain
/// at `$2 + 1` rows; the assembler reports it.
const ANCESTRY_SQL: &str = r#"
    WITH RECURSIVE ancestry AS (
        SELECT c.id, c.name, c.slug, c.description, c.parent_id, c.image_url, 1 AS depth
        FROM categories c
        WHERE c.id = $1 AND c.is_active
        UNION ALL
        SELECT p.id, p.name, p.slug, p.description, p.parent_id, p.image_url, a.depth + 1
        FROM categories p
        JOIN ancestry a ON p.id = a.parent_id
        WHERE p.is_active AND a.depth <= $2
    )
    SELECT id, name, slug, description, parent_id, image_url
    FROM ancestry
    ORDER BY depth
"#;

pub async fn find_ancestry(pool: &PgPool, id: i64) -> ServiceResult<Vec<Category>> {
    let rows: Vec<Category> = sqlx::query_as(ANCESTRY_SQL)
        .bind(id)
        .bind(MAX_CATEGORY_DEPTH as i32)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_subtree_ids(pool: &PgPool, slugs: &[String]) -> ServiceResult<BTreeSet<i64>> {
    let sql = format!(
        "WITH RECURSIVE {} SELECT id FROM category_tree",
        subtree_cte("$1")
    );
    let ids: Vec<i64> = sqlx::query_scalar(&sql).bind(slugs).fetch_all(pool).await?;
    Ok(ids.into_iter().collect())
}

#[async_trait]
impl CategoryStore for PgCatalogStore {
    async fn ancestry_rows(&self, id: i64) -> ServiceResult<Vec<Category>> {
        self.timed("ancestry_rows", find_ancestry(&self.pool, id))
            .await
    }

    async fn subtree_ids(&self, slugs: &[String]) -> ServiceResult<BTreeSet<i64>> {
        self.timed("subtree_ids", find_subtree_ids(&self.pool, slugs))
            .await
    }
}
