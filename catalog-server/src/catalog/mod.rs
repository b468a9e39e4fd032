//! Catalog engine: hierarchy resolution, subtree expansion, slug assignment
//! and the store seam they run against.

pub mod hierarchy;
pub mod slug;
pub mod store;
pub mod subtree;

pub use hierarchy::{MAX_CATEGORY_DEPTH, assemble_ancestry, resolve_ancestry};
pub use slug::{MAX_SLUG_ATTEMPTS, assign_unique_slug, slugify};
pub use store::{BrandStore, CatalogStore, CategoryStore, ProductStore};
pub use subtree::{expand_category_slugs, expand_subtrees};
