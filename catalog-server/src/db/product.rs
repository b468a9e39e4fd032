//! Product database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::models::{
    Brand, BrandRef, CategoryRef, InsertedRow, ListingQuery, Product, ProductDraft,
    ProductSummary,
};
use sqlx::PgPool;

use super::PgCatalogStore;
use super::query_builder::build_listing;
use crate::catalog::ProductStore;
use crate::error::{ServiceError, ServiceResult};

/// Product row joined with its active brand
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    slug: String,
    description: Option<String>,
    price: Decimal,
    sale_price: Option<Decimal>,
    stock: i64,
    category_id: i64,
    brand_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    brand_ref_id: Option<i64>,
    brand_name: Option<String>,
    brand_slug: Option<String>,
    brand_description: Option<String>,
    brand_logo_url: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let brand = match (row.brand_ref_id, row.brand_name, row.brand_slug) {
            (Some(id), Some(name), Some(slug)) => Some(Brand {
                id,
                name,
                slug,
                description: row.brand_description,
                logo_url: row.brand_logo_url,
            }),
            _ => None,
        };
        Product {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            price: row.price,
            sale_price: row.sale_price,
            stock: row.stock,
            category_id: row.category_id,
            category: None,
            brand_id: row.brand_id,
            brand,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// One listing row; `total_count` repeats the windowed match count
#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    total_count: i64,
    id: i64,
    name: String,
    slug: String,
    price: Decimal,
    sale_price: Option<Decimal>,
    stock: i64,
    category_id: i64,
    brand_id: i64,
    category_ref_id: Option<i64>,
    category_name: Option<String>,
    category_slug: Option<String>,
    brand_ref_id: Option<i64>,
    brand_name: Option<String>,
    brand_slug: Option<String>,
}

impl From<SummaryRow> for ProductSummary {
    fn from(row: SummaryRow) -> Self {
        let category = match (row.category_ref_id, row.category_name, row.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(CategoryRef { id, name, slug }),
            _ => None,
        };
        let brand = match (row.brand_ref_id, row.brand_name, row.brand_slug) {
            (Some(id), Some(name), Some(slug)) => Some(BrandRef { id, name, slug }),
            _ => None,
        };
        ProductSummary {
            id: row.id,
            name: row.name,
            slug: row.slug,
            price: row.price,
            sale_price: row.sale_price,
            stock: row.stock,
            category_id: row.category_id,
            brand_id: row.brand_id,
            category,
            brand,
        }
    }
}

pub async fn find_product(pool: &PgPool, id: i64) -> ServiceResult<Option<Product>> {
    let row: Option<ProductRow> = sqlx::query_as(
        r#"
        SELECT p.id, p.name, p.slug, p.description, p.price, p.sale_price, p.stock,
               p.category_id, p.brand_id, p.created_at, p.updated_at,
               b.id AS brand_ref_id, b.name AS brand_name, b.slug AS brand_slug,
               b.description AS brand_description, b.logo_url AS brand_logo_url
        FROM products p
        LEFT JOIN brands b ON b.id = p.brand_id AND b.is_active
        WHERE p.id = $1 AND p.is_active
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Product::from))
}

pub async fn slug_exists(pool: &PgPool, slug: &str, exclude_id: Option<i64>) -> ServiceResult<bool> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM products
            WHERE slug = $1 AND is_active AND ($2::BIGINT IS NULL OR id <> $2)
        )
        "#,
    )
    .bind(slug)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn insert_product(
    pool: &PgPool,
    draft: &ProductDraft,
    slug: &str,
) -> ServiceResult<InsertedRow> {
    let row: InsertedRow = sqlx::query_as(
        r#"
        INSERT INTO products (name, slug, description, price, sale_price, stock, category_id, brand_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, created_at, updated_at
        "#,
    )
    .bind(&draft.name)
    .bind(slug)
    .bind(&draft.description)
    .bind(draft.price)
    .bind(draft.sale_price)
    .bind(draft.stock)
    .bind(draft.category_id)
    .bind(draft.brand_id)
    .fetch_one(pool)
    .await
    .map_err(|e| ServiceError::from(e).with_slug(slug))?;
    Ok(row)
}

pub async fn update_product(pool: &PgPool, product: &Product) -> ServiceResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE products
        SET name = $1, slug = $2, description = $3, price = $4, sale_price = $5,
            stock = $6, category_id = $7, brand_id = $8, updated_at = $9
        WHERE id = $10 AND is_active
        "#,
    )
    .bind(&product.name)
    .bind(&product.slug)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.sale_price)
    .bind(product.stock)
    .bind(product.category_id)
    .bind(product.brand_id)
    .bind(product.updated_at)
    .bind(product.id)
    .execute(pool)
    .await
    .map_err(|e| ServiceError::from(e).with_slug(&product.slug))?;
    Ok(result.rows_affected())
}

pub async fn soft_delete_product(pool: &PgPool, id: i64) -> ServiceResult<u64> {
    let result = sqlx::query(
        "UPDATE products SET is_active = FALSE, updated_at = now() WHERE id = $1 AND is_active",
    )
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn list_products(
    pool: &PgPool,
    query: &ListingQuery,
) -> ServiceResult<(Vec<ProductSummary>, i64)> {
    let listing = build_listing(query);
    let rows: Vec<SummaryRow> = listing
        .builder
        .apply_bindings(sqlx::query_as(&listing.sql))
        .fetch_all(pool)
        .await?;

    // Past the last page no row carries the window count, so the total reads as zero
    let total = rows.first().map(|r| r.total_count).unwrap_or(0);
    Ok((rows.into_iter().map(ProductSummary::from).collect(), total))
}

#[async_trait]
impl ProductStore for PgCatalogStore {
    async fn find_product(&self, id: i64) -> ServiceResult<Option<Product>> {
        self.timed("find_product", find_product(&self.pool, id)).await
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> ServiceResult<bool> {
        self.timed("slug_exists", slug_exists(&self.pool, slug, exclude_id))
            .await
    }

    async fn insert_product(&self, draft: &ProductDraft, slug: &str) -> ServiceResult<InsertedRow> {
        self.timed("insert_product", insert_product(&self.pool, draft, slug))
            .await
    }

    async fn update_product(&self, product: &Product) -> ServiceResult<u64> {
        self.timed("update_product", update_product(&self.pool, product))
            .await
    }

    async fn soft_delete_product(&self, id: i64) -> ServiceResult<u64> {
        self.timed("soft_delete_product", soft_delete_product(&self.pool, id))
            .await
    }

    async fn list_products(
        &self,
        query: &ListingQuery,
    ) -> ServiceResult<(Vec<ProductSummary>, i64)> {
        self.timed("list_products", list_products(&self.pool, query))
            .await
    }
}
