//! Store traits
//!
//! Every method is one bounded store operation. Implementations must honour the
//! active flag: soft-deleted rows are invisible to all of them.

use async_trait::async_trait;
use shared::models::{Brand, Category, InsertedRow, ListingQuery, Product, ProductDraft, ProductSummary};
use std::collections::BTreeSet;

use crate::error::ServiceResult;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Active chain rows starting at `id` and walking towards the root.
    ///
    /// Returns no rows when `id` is unknown or inactive. Traversal stops at the
    /// first inactive parent and never yields more than `MAX_CATEGORY_DEPTH + 1` rows.
    async fn ancestry_rows(&self, id: i64) -> ServiceResult<Vec<Category>>;

    /// Ids of the active categories named by `slugs` plus all their active descendants
    async fn subtree_ids(&self, slugs: &[String]) -> ServiceResult<BTreeSet<i64>>;
}

#[async_trait]
pub trait BrandStore: Send + Sync {
    /// Active brand by id
    async fn find_brand(&self, id: i64) -> ServiceResult<Option<Brand>>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Active product by id, with its active brand attached
    async fn find_product(&self, id: i64) -> ServiceResult<Option<Product>>;

    /// Whether an active product other than `exclude_id` already uses `slug`
    async fn slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> ServiceResult<bool>;

    async fn insert_product(&self, draft: &ProductDraft, slug: &str) -> ServiceResult<InsertedRow>;

    /// Write all mutable columns of an active product; returns rows affected
    async fn update_product(&self, product: &Product) -> ServiceResult<u64>;

    /// Flip the active flag off; returns rows affected
    async fn soft_delete_product(&self, id: i64) -> ServiceResult<u64>;

    /// One page of summaries plus the unpaged match count
    async fn list_products(&self, query: &ListingQuery)
    -> ServiceResult<(Vec<ProductSummary>, i64)>;
}

/// Everything the catalog service needs from storage
pub trait CatalogStore: CategoryStore + BrandStore + ProductStore {}

impl<T: CategoryStore + BrandStore + ProductStore> CatalogStore for T {}
