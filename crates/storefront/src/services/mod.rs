//! Business logic services for the catalog API.
//!
//! # Services
//!
//! - `catalog` - Product types, products, variants, add-ons, pricing and the
//!   browse view

pub mod catalog;

pub use catalog::{CatalogService, CatalogServiceError, PriceQuote};
