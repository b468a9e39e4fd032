//! Shared types for the catalog backend
//!
//! Domain models (categories, brands, products, listing queries) and the
//! unified error system used by the server and its clients.

pub mod error;
pub mod models;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, ErrorCategory, ErrorCode};
