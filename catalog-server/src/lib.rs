//! catalog-server: product catalog backend
//!
//! - Resolves category ancestry and category-subtree filters
//! - Lists products with search, sort and pagination in one query pass
//! - Assigns unique product slugs under concurrent writers
//! - Serves the catalog over a JSON HTTP API

pub mod api;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod state;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
