//! Catalog domain errors.

use thiserror::Error;

use crate::types::{AddonId, ProductId, VariantId};

/// Result type used across the catalog domain.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// The kind of record a [`CatalogError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    ProductType,
    Product,
    Variant,
    Addon,
}

impl core::fmt::Display for Entity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::ProductType => "product type",
            Self::Product => "product",
            Self::Variant => "variant",
            Self::Addon => "add-on",
        })
    }
}

/// Deterministic, caller-correctable catalog failures.
///
/// Each variant is a distinct outcome the API layer renders differently;
/// none of them is worth retrying.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// An input field is missing, empty, malformed or out of range.
    #[error("{field}: {message}")]
    Validation {
        /// Wire name of the offending field (e.g. `productTypeId`).
        field: &'static str,
        message: String,
    },

    /// A referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: String },

    /// Add-ons were requested for a product whose type does not take them.
    #[error("add-ons are not available for {product_type} products")]
    IneligibleCategory {
        product_id: ProductId,
        product_type: String,
    },

    /// A configuration was priced without a chosen variant.
    #[error("a variant must be selected before pricing")]
    NoVariantSelected,

    /// The chosen variant belongs to a different product.
    #[error("variant {variant_id} does not belong to product {product_id}")]
    InvalidVariant {
        variant_id: VariantId,
        product_id: ProductId,
    },

    /// A chosen add-on belongs to a different product.
    #[error("add-on {addon_id} does not belong to product {product_id}")]
    InvalidAddon {
        addon_id: AddonId,
        product_id: ProductId,
    },

    /// The total exceeds the representable decimal range.
    #[error("configuration total is out of range")]
    PriceOverflow,
}

impl CatalogError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity: Entity, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable name of the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::NotFound { .. } => "not_found",
            Self::IneligibleCategory { .. } => "ineligible_category",
            Self::NoVariantSelected => "no_variant_selected",
            Self::InvalidVariant { .. } => "invalid_variant",
            Self::InvalidAddon { .. } => "invalid_addon",
            Self::PriceOverflow => "price_overflow",
        }
    }

    /// The failing field, for validation errors.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}
