//! Catalog service error types.

use thiserror::Error;

use printfuse_core::CatalogError;

use crate::db::RepositoryError;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogServiceError {
    /// A domain rule rejected the request.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A uniqueness constraint was violated (type name, SKU).
    #[error("{0}")]
    Conflict(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
