//! Product listing parameters and page metadata

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ProductSummary;

/// Default page size when the caller gives none
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Upper bound on page size accepted at the HTTP boundary
pub const MAX_PAGE_SIZE: i64 = 100;

/// Sortable listing column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Name,
    Price,
    Stock,
}

impl SortField {
    /// Parse a request value; anything unrecognized sorts by name
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "price" => Self::Price,
            "stock" => Self::Stock,
            _ => Self::Name,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Stock => "stock",
        }
    }
}

/// Listing sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// SQL keyword for ORDER BY
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("invalid sort direction '{}', expected asc or desc", other)),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// Validated listing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingQuery {
    pub offset: i64,
    pub limit: i64,
    /// Case-insensitive substring over name and description; empty means no filter
    pub search: String,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    /// Category slugs; each one matches itself and all active descendants
    pub categories: Vec<String>,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
            search: String::new(),
            sort_field: SortField::Name,
            sort_direction: SortDirection::Desc,
            categories: Vec::new(),
        }
    }
}

impl ListingQuery {
    pub fn search_term(&self) -> Option<&str> {
        (!self.search.is_empty()).then_some(self.search.as_str())
    }

    pub fn has_category_filter(&self) -> bool {
        !self.categories.is_empty()
    }
}

/// Pagination metadata derived from offset/limit and the unpaged total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub total_items: i64,
    pub current_page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl PageMeta {
    /// `limit` must be positive; callers validate before querying.
    pub fn new(offset: i64, limit: i64, total_items: i64) -> Self {
        debug_assert!(limit > 0, "page size must be positive");
        let limit = limit.max(1);
        let total_pages = if total_items > 0 {
            (total_items + limit - 1) / limit
        } else {
            0
        };
        Self {
            total_items,
            current_page: offset / limit + 1,
            page_size: limit,
            total_pages,
        }
    }
}

/// One page of product summaries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub meta: PageMeta,
    pub products: Vec<ProductSummary>,
}
