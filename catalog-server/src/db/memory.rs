//! In-memory catalog store for unit tests
//!
//! Mirrors the PostgreSQL store's semantics: soft deletes, active-only joins,
//! windowed totals and the unique index on active product slugs.

use async_trait::async_trait;
use chrono::Utc;
use shared::models::{
    Brand, BrandRef, Category, CategoryRef, InsertedRow, ListingQuery, Product, ProductDraft,
    ProductSummary, SortDirection, SortField,
};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use crate::catalog::{
    BrandStore, CategoryStore, MAX_CATEGORY_DEPTH, ProductStore, expand_subtrees,
};
use crate::error::{ServiceError, ServiceResult};

struct Row<T> {
    value: T,
    active: bool,
}

#[derive(Default)]
struct Tables {
    categories: Vec<Row<Category>>,
    brands: Vec<Row<Brand>>,
    products: Vec<Row<Product>>,
    next_product_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// Inserts/updates that fail with a storage slug conflict before the real write
    injected_conflicts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_category(&self, id: i64, slug: &str, parent_id: Option<i64>) {
        self.tables.lock().unwrap().categories.push(Row {
            value: Category {
                id,
                name: slug.replace('-', " "),
                slug: slug.to_string(),
                description: None,
                parent_id,
                image_url: None,
                parent: None,
            },
            active: true,
        });
    }

    pub fn deactivate_category(&self, id: i64) {
        let mut tables = self.tables.lock().unwrap();
        for row in tables.categories.iter_mut().filter(|r| r.value.id == id) {
            row.active = false;
        }
    }

    pub fn add_brand(&self, id: i64, slug: &str) {
        self.tables.lock().unwrap().brands.push(Row {
            value: Brand {
                id,
                name: slug.to_uppercase(),
                slug: slug.to_string(),
                description: None,
                logo_url: None,
            },
            active: true,
        });
    }

    pub fn deactivate_brand(&self, id: i64) {
        let mut tables = self.tables.lock().unwrap();
        for row in tables.brands.iter_mut().filter(|r| r.value.id == id) {
            row.active = false;
        }
    }

    /// Make the next `count` writes fail as if a concurrent writer took the slug
    pub fn inject_slug_conflicts(&self, count: usize) {
        self.injected_conflicts.store(count, AtomicOrdering::SeqCst);
    }

    /// Stored product regardless of its active flag
    pub fn raw_product(&self, id: i64) -> Option<(Product, bool)> {
        let tables = self.tables.lock().unwrap();
        tables
            .products
            .iter()
            .find(|r| r.value.id == id)
            .map(|r| (r.value.clone(), r.active))
    }

    fn take_injected_conflict(&self, slug: &str) -> ServiceResult<()> {
        let taken = self
            .injected_conflicts
            .fetch_update(AtomicOrdering::SeqCst, AtomicOrdering::SeqCst, |n| n.checked_sub(1));
        match taken {
            Ok(_) => Err(ServiceError::SlugConflict(slug.to_string())),
            Err(_) => Ok(()),
        }
    }
}

impl Tables {
    fn active_category(&self, id: i64) -> Option<&Category> {
        self.categories
            .iter()
            .find(|r| r.active && r.value.id == id)
            .map(|r| &r.value)
    }

    fn active_brand(&self, id: i64) -> Option<&Brand> {
        self.brands
            .iter()
            .find(|r| r.active && r.value.id == id)
            .map(|r| &r.value)
    }

    fn slug_taken(&self, slug: &str, exclude_id: Option<i64>) -> bool {
        self.products
            .iter()
            .any(|r| r.active && r.value.slug == slug && Some(r.value.id) != exclude_id)
    }

    fn subtree(&self, slugs: &[String]) -> BTreeSet<i64> {
        let edges: Vec<(i64, Option<i64>)> = self
            .categories
            .iter()
            .filter(|r| r.active)
            .map(|r| (r.value.id, r.value.parent_id))
            .collect();
        let roots = self
            .categories
            .iter()
            .filter(|r| r.active && slugs.contains(&r.value.slug))
            .map(|r| r.value.id);
        expand_subtrees(&edges, roots)
    }
}

fn compare(a: &Product, b: &Product, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Price => a.price.cmp(&b.price),
        SortField::Stock => a.stock.cmp(&b.stock),
    }
    .then(a.id.cmp(&b.id))
}

fn matches_search(product: &Product, term: &str) -> bool {
    let term = term.to_lowercase();
    product.name.to_lowercase().contains(&term)
        || product
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&term))
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn ancestry_rows(&self, id: i64) -> ServiceResult<Vec<Category>> {
        let tables = self.tables.lock().unwrap();
        let mut rows = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if rows.len() > MAX_CATEGORY_DEPTH {
                break;
            }
            let Some(category) = tables.active_category(current) else {
                break;
            };
            cursor = category.parent_id;
            rows.push(category.clone());
        }
        Ok(rows)
    }

    async fn subtree_ids(&self, slugs: &[String]) -> ServiceResult<BTreeSet<i64>> {
        Ok(self.tables.lock().unwrap().subtree(slugs))
    }
}

#[async_trait]
impl BrandStore for MemoryStore {
    async fn find_brand(&self, id: i64) -> ServiceResult<Option<Brand>> {
        Ok(self.tables.lock().unwrap().active_brand(id).cloned())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn find_product(&self, id: i64) -> ServiceResult<Option<Product>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .products
            .iter()
            .find(|r| r.active && r.value.id == id)
            .map(|r| {
                let mut product = r.value.clone();
                product.category = None;
                product.brand = tables.active_brand(product.brand_id).cloned();
                product
            }))
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> ServiceResult<bool> {
        Ok(self.tables.lock().unwrap().slug_taken(slug, exclude_id))
    }

    async fn insert_product(&self, draft: &ProductDraft, slug: &str) -> ServiceResult<InsertedRow> {
        self.take_injected_conflict(slug)?;
        let mut tables = self.tables.lock().unwrap();
        if tables.slug_taken(slug, None) {
            return Err(ServiceError::SlugConflict(slug.to_string()));
        }
        if tables.categories.iter().all(|r| r.value.id != draft.category_id)
            || tables.brands.iter().all(|r| r.value.id != draft.brand_id)
        {
            return Err(ServiceError::validation("referenced row does not exist"));
        }

        tables.next_product_id += 1;
        let now = Utc::now();
        let row = InsertedRow {
            id: tables.next_product_id,
            created_at: now,
            updated_at: now,
        };
        let product = Product::from_insert(draft.clone(), slug.to_string(), row);
        tables.products.push(Row {
            value: product,
            active: true,
        });
        Ok(row)
    }

    async fn update_product(&self, product: &Product) -> ServiceResult<u64> {
        self.take_injected_conflict(&product.slug)?;
        let mut tables = self.tables.lock().unwrap();
        if tables.slug_taken(&product.slug, Some(product.id)) {
            return Err(ServiceError::SlugConflict(product.slug.clone()));
        }
        let Some(row) = tables
            .products
            .iter_mut()
            .find(|r| r.active && r.value.id == product.id)
        else {
            return Ok(0);
        };
        let created_at = row.value.created_at;
        row.value = product.clone();
        row.value.created_at = created_at;
        row.value.category = None;
        row.value.brand = None;
        Ok(1)
    }

    async fn soft_delete_product(&self, id: i64) -> ServiceResult<u64> {
        let mut tables = self.tables.lock().unwrap();
        let mut affected = 0;
        for row in tables
            .products
            .iter_mut()
            .filter(|r| r.active && r.value.id == id)
        {
            row.active = false;
            affected += 1;
        }
        Ok(affected)
    }

    async fn list_products(
        &self,
        query: &ListingQuery,
    ) -> ServiceResult<(Vec<ProductSummary>, i64)> {
        let tables = self.tables.lock().unwrap();
        let subtree = query
            .has_category_filter()
            .then(|| tables.subtree(&query.categories));

        let mut matched: Vec<&Product> = tables
            .products
            .iter()
            .filter(|r| r.active)
            .map(|r| &r.value)
            .filter(|p| subtree.as_ref().is_none_or(|ids| ids.contains(&p.category_id)))
            .filter(|p| query.search_term().is_none_or(|term| matches_search(p, term)))
            .collect();

        matched.sort_by(|a, b| {
            let ord = compare(a, b, query.sort_field);
            match query.sort_direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let total = matched.len() as i64;
        let page = matched
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .map(|p| ProductSummary {
                id: p.id,
                name: p.name.clone(),
                slug: p.slug.clone(),
                price: p.price,
                sale_price: p.sale_price,
                stock: p.stock,
                category_id: p.category_id,
                brand_id: p.brand_id,
                category: tables.active_category(p.category_id).map(CategoryRef::from),
                brand: tables.active_brand(p.brand_id).map(BrandRef::from),
            })
            .collect::<Vec<_>>();

        // Same as the window count: an empty page reports no total
        let total = if page.is_empty() { 0 } else { total };
        Ok((page, total))
    }
}
