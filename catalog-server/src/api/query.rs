//! Listing query-string decoding

use serde::Deserialize;
use shared::error::AppError;
use shared::models::{DEFAULT_PAGE_SIZE, ListingQuery, MAX_PAGE_SIZE, SortDirection, SortField};

/// Raw `GET /v1/products` parameters, kept as text so bad values produce a
/// structured 400 instead of an extractor rejection
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub categories: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_int(name: &str, value: &str) -> Result<i64, AppError> {
    value.trim().parse::<i64>().map_err(|_| {
        AppError::invalid_request(format!("{name} must be an integer")).with_detail("field", name)
    })
}

impl ListParams {
    /// Validate into a listing query: limit in `1..=MAX_PAGE_SIZE`, offset >= 0,
    /// direction `asc` or `desc`. Unknown sort fields fall back to name.
    pub fn into_query(self) -> Result<ListingQuery, AppError> {
        let offset = match non_blank(self.offset) {
            Some(v) => parse_int("offset", &v)?,
            None => 0,
        };
        if offset < 0 {
            return Err(AppError::validation("offset must not be negative").with_detail("field", "offset"));
        }

        let limit = match non_blank(self.limit) {
            Some(v) => parse_int("limit", &v)?,
            None => DEFAULT_PAGE_SIZE,
        };
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(AppError::validation(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            ))
            .with_detail("field", "limit"));
        }

        let sort_direction = match non_blank(self.order) {
            Some(v) => v
                .parse::<SortDirection>()
                .map_err(|msg| AppError::validation(msg).with_detail("field", "order"))?,
            None => SortDirection::default(),
        };

        let sort_field = non_blank(self.sort)
            .map(|v| SortField::from_param(&v))
            .unwrap_or_default();

        let categories = self
            .categories
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|slug| !slug.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<String>>()
            })
            .unwrap_or_default();

        Ok(ListingQuery {
            offset,
            limit,
            search: self.search.map(|s| s.trim().to_string()).unwrap_or_default(),
            sort_field,
            sort_direction,
            categories,
        })
    }
}
