//! Brand Model

use serde::{Deserialize, Serialize};

/// Brand entity (flat, no hierarchy)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
}

/// Shallow brand projection carried by product summaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<&Brand> for BrandRef {
    fn from(brand: &Brand) -> Self {
        Self {
            id: brand.id,
            name: brand.name.clone(),
            slug: brand.slug.clone(),
        }
    }
}
