//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
///
/// Categories form a forest through `parent_id`. The `parent` field is the
/// materialized ancestor chain and is only filled in by ancestry resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub image_url: Option<String>,

    // -- Relations (populated by application code, skipped by FromRow) --

    /// Resolved parent category, never persisted
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub parent: Option<Box<Category>>,
}

impl Category {
    /// Iterate over this category followed by each resolved ancestor, up to the root
    pub fn chain(&self) -> impl Iterator<Item = &Category> {
        std::iter::successors(Some(self), |c| c.parent.as_deref())
    }

    /// Number of categories in the resolved chain (a root alone has depth 1)
    pub fn depth(&self) -> usize {
        self.chain().count()
    }

    /// Topmost resolved category
    pub fn root(&self) -> &Category {
        self.chain().last().unwrap_or(self)
    }

    /// Slugs from this category up to the root
    pub fn path_slugs(&self) -> Vec<&str> {
        self.chain().map(|c| c.slug.as_str()).collect()
    }
}

/// Shallow category projection carried by product summaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategoryRef {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
        }
    }
}
