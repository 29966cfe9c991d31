//! Catalog persistence.
//!
//! # Stores
//!
//! - [`PgCatalogStore`] - `PostgreSQL`, schema `catalog`
//! - [`InMemoryCatalogStore`] - process-local tables, used when no database
//!   URL is configured and in tests
//!
//! Both enforce the same referential rules at the store boundary: a variant
//! or add-on is only written while its product exists, deleting a product
//! removes its variants and add-ons, and type names and SKUs are unique.
//!
//! ## Tables
//!
//! - `catalog.product_type`
//! - `catalog.product`
//! - `catalog.variant`
//! - `catalog.addon`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p printfuse-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use printfuse_core::{
    Addon, NewAddon, NewProduct, NewProductType, NewVariant, Product, ProductDetail, ProductId,
    ProductType, ProductTypeId, Variant,
};

pub use memory::InMemoryCatalogStore;
pub use postgres::PgCatalogStore;

/// Errors that can occur in catalog stores.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate SKU).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The parent record of an insert does not exist.
    #[error("missing parent: {0}")]
    MissingParent(String),
}

/// Selection applied to product listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact (case-sensitive) product type name.
    pub type_name: Option<String>,
}

impl ProductFilter {
    #[must_use]
    pub fn by_type(name: impl Into<String>) -> Self {
        Self {
            type_name: Some(name.into()),
        }
    }
}

/// Persistence for catalog records.
///
/// Listings are ordered by id, so two reads with no write in between return
/// equal results.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert a product type.
    ///
    /// Fails with `RepositoryError::Conflict` if the name is taken.
    async fn create_product_type(
        &self,
        input: NewProductType,
    ) -> Result<ProductType, RepositoryError>;

    /// All product types in id order.
    async fn list_product_types(&self) -> Result<Vec<ProductType>, RepositoryError>;

    async fn find_product_type(
        &self,
        id: ProductTypeId,
    ) -> Result<Option<ProductType>, RepositoryError>;

    /// Insert a product.
    ///
    /// Fails with `RepositoryError::MissingParent` if the type does not exist.
    async fn create_product(&self, input: NewProduct) -> Result<Product, RepositoryError>;

    /// Products with their type, variants and add-ons, in id order.
    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductDetail>, RepositoryError>;

    async fn find_product(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError>;

    /// Delete a product together with its variants and add-ons.
    ///
    /// Returns the deleted product, or `None` if it did not exist.
    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert a variant while its product exists.
    ///
    /// Fails with `RepositoryError::MissingParent` if the product is gone and
    /// `RepositoryError::Conflict` if the SKU is taken.
    async fn create_variant(&self, input: NewVariant) -> Result<Variant, RepositoryError>;

    /// Insert an add-on while its product exists.
    ///
    /// Fails with `RepositoryError::MissingParent` if the product is gone.
    async fn create_addon(&self, input: NewAddon) -> Result<Addon, RepositoryError>;

    /// Check the store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
