//! Data models
//!
//! Shared between the catalog server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGINT identity columns).

pub mod brand;
pub mod category;
pub mod listing;
pub mod product;

// Re-exports
pub use brand::*;
pub use category::*;
pub use listing::*;
pub use product::*;
