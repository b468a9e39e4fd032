//! Catalog Service
//!
//! Orchestrates product reads and writes over the catalog store: ancestry is
//! attached on reads, slugs are assigned on create and rename, and listings are
//! forwarded to the store's single-pass query.

use chrono::Utc;
use shared::models::{Brand, Category, ListingQuery, PageMeta, Product, ProductDraft, ProductPage};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::catalog::{CatalogStore, assign_unique_slug, expand_category_slugs, resolve_ancestry};
use crate::error::{Entity, ServiceError, ServiceResult};

/// Assign-and-persist rounds allowed when storage reports a slug race
pub const PERSIST_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Active product with its brand and full category ancestry.
    ///
    /// A product whose category cannot be resolved is reported as missing itself.
    pub async fn get_product(&self, id: i64) -> ServiceResult<Product> {
        let mut product = self
            .store
            .find_product(id)
            .await?
            .ok_or(ServiceError::NotFound(Entity::Product(id)))?;

        match resolve_ancestry(self.store.as_ref(), product.category_id).await {
            Ok(category) => product.category = Some(category),
            Err(ServiceError::NotFound(_)) => {
                tracing::warn!(
                    product_id = id,
                    category_id = product.category_id,
                    "Product references an inactive category"
                );
                return Err(ServiceError::NotFound(Entity::Product(id)));
            }
            Err(e) => return Err(e),
        }
        Ok(product)
    }

    /// Insert a product under an active category and brand; the response
    /// carries both, as a detail read would.
    pub async fn create_product(&self, draft: ProductDraft) -> ServiceResult<Product> {
        let category = self.require_category(draft.category_id).await?;
        let brand = self.require_brand(draft.brand_id).await?;

        let mut attempt = 1;
        let (slug, row) = loop {
            let slug = self.assign_slug(&draft.name, None).await?;
            match self.store.insert_product(&draft, &slug).await {
                Ok(row) => break (slug, row),
                Err(e) if e.is_slug_conflict() && attempt < PERSIST_ATTEMPTS => {
                    tracing::warn!(slug = %slug, attempt, "Slug taken concurrently, reassigning");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        let mut product = Product::from_insert(draft, slug, row);
        product.category = Some(category);
        product.brand = Some(brand);
        tracing::info!(product_id = product.id, slug = %product.slug, "Product created");
        Ok(product)
    }

    /// Replace the writable fields of an active product.
    ///
    /// The slug is re-derived only when the name changes.
    pub async fn update_product(&self, id: i64, draft: ProductDraft) -> ServiceResult<Product> {
        let mut product = self
            .store
            .find_product(id)
            .await?
            .ok_or(ServiceError::NotFound(Entity::Product(id)))?;
        let category = self.require_category(draft.category_id).await?;
        let brand = self.require_brand(draft.brand_id).await?;

        let renamed = product.name != draft.name;
        product.apply_draft(draft);
        product.category = Some(category);
        product.brand = Some(brand);

        let mut attempt = 1;
        loop {
            if renamed {
                product.slug = self.assign_slug(&product.name, Some(id)).await?;
            }
            product.updated_at = Utc::now();

            match self.store.update_product(&product).await {
                Ok(0) => return Err(ServiceError::NotFound(Entity::Product(id))),
                Ok(_) => break,
                Err(e) if renamed && e.is_slug_conflict() && attempt < PERSIST_ATTEMPTS => {
                    tracing::warn!(slug = %product.slug, attempt, "Slug taken concurrently, reassigning");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(product_id = id, slug = %product.slug, "Product updated");
        Ok(product)
    }

    /// Soft-delete an active product
    pub async fn delete_product(&self, id: i64) -> ServiceResult<()> {
        if self.store.soft_delete_product(id).await? == 0 {
            return Err(ServiceError::NotFound(Entity::Product(id)));
        }
        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }

    pub async fn list_products(&self, query: &ListingQuery) -> ServiceResult<ProductPage> {
        if query.limit <= 0 {
            return Err(ServiceError::validation("limit must be greater than zero"));
        }
        if query.offset < 0 {
            return Err(ServiceError::validation("offset must not be negative"));
        }

        let (products, total) = self.store.list_products(query).await?;
        Ok(ProductPage {
            meta: PageMeta::new(query.offset, query.limit, total),
            products,
        })
    }

    /// Category with its active ancestor chain
    pub async fn resolve_category(&self, id: i64) -> ServiceResult<Category> {
        resolve_ancestry(self.store.as_ref(), id).await
    }

    /// Ids covered by a category-group filter
    pub async fn expand_categories(&self, slugs: &[String]) -> ServiceResult<BTreeSet<i64>> {
        expand_category_slugs(self.store.as_ref(), slugs).await
    }

    async fn require_category(&self, id: i64) -> ServiceResult<Category> {
        match resolve_ancestry(self.store.as_ref(), id).await {
            Err(ServiceError::NotFound(_)) => Err(ServiceError::validation(format!(
                "category {id} does not exist"
            ))),
            other => other,
        }
    }

    async fn require_brand(&self, id: i64) -> ServiceResult<Brand> {
        self.store
            .find_brand(id)
            .await?
            .ok_or_else(|| ServiceError::validation(format!("brand {id} does not exist")))
    }

    async fn assign_slug(&self, name: &str, exclude_id: Option<i64>) -> ServiceResult<String> {
        let store = self.store.as_ref();
        assign_unique_slug(name, |candidate| async move {
            store.slug_exists(&candidate, exclude_id).await
        })
        .await
    }
}
