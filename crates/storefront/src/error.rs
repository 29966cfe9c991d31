//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; every error response is a JSON body
//! `{"error": message, "kind": kind, "field": field?}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use printfuse_core::CatalogError;

use crate::db::RepositoryError;
use crate::services::CatalogServiceError;

/// Application-level error type for the catalog API.
#[derive(Debug, Error)]
pub enum AppError {
    /// A catalog rule rejected the request.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A uniqueness constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Bad request from client (malformed body, path or query).
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<CatalogServiceError> for AppError {
    fn from(err: CatalogServiceError) -> Self {
        match err {
            CatalogServiceError::Catalog(e) => Self::Catalog(e),
            CatalogServiceError::Conflict(msg) => Self::Conflict(msg),
            CatalogServiceError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(err) => match err {
                CatalogError::Validation { .. }
                | CatalogError::NoVariantSelected
                | CatalogError::InvalidVariant { .. }
                | CatalogError::InvalidAddon { .. } => StatusCode::BAD_REQUEST,
                CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
                CatalogError::IneligibleCategory { .. } | CatalogError::PriceOverflow => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            },
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Catalog(err) => err.kind(),
            Self::Conflict(_) => "conflict",
            Self::BadRequest(_) => "bad_request",
            Self::Database(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let error = match &self {
            Self::Database(_) => "Internal server error".to_string(),
            Self::Catalog(err) => err.to_string(),
            Self::Conflict(msg) | Self::BadRequest(msg) => msg.clone(),
        };

        let field = match &self {
            Self::Catalog(err) => err.field(),
            _ => None,
        };

        let body = ErrorBody {
            error,
            kind: self.kind(),
            field,
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
