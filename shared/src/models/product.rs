//! Product Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Brand, BrandRef, Category, CategoryRef};

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Globally unique among active products
    pub slug: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub stock: i64,
    pub category_id: i64,
    /// Full ancestry, attached on detail reads
    #[serde(default)]
    pub category: Option<Category>,
    pub brand_id: i64,
    #[serde(default)]
    pub brand: Option<Brand>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable product fields (create and full update payload)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub stock: i64,
    pub category_id: i64,
    pub brand_id: i64,
}

/// Values generated by the store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InsertedRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build the in-memory product once the store has assigned id and timestamps
    pub fn from_insert(draft: ProductDraft, slug: String, row: InsertedRow) -> Self {
        Self {
            id: row.id,
            name: draft.name,
            slug,
            description: draft.description,
            price: draft.price,
            sale_price: draft.sale_price,
            stock: draft.stock,
            category_id: draft.category_id,
            category: None,
            brand_id: draft.brand_id,
            brand: None,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    /// Overwrite the writable fields, leaving identity, slug and timestamps alone
    pub fn apply_draft(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.price = draft.price;
        self.sale_price = draft.sale_price;
        self.stock = draft.stock;
        if self.category_id != draft.category_id {
            self.category = None;
        }
        self.category_id = draft.category_id;
        if self.brand_id != draft.brand_id {
            self.brand = None;
        }
        self.brand_id = draft.brand_id;
    }
}

/// Listing projection: scalar fields plus shallow category/brand references
///
/// A reference is `None` when the linked row is missing or soft-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub sale_price: Option<Decimal>,
    pub stock: i64,
    pub category_id: i64,
    pub brand_id: i64,
    pub category: Option<CategoryRef>,
    pub brand: Option<BrandRef>,
}
