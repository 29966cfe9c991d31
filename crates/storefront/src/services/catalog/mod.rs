//! Catalog service.
//!
//! Runs the domain rules from `printfuse_core` against a [`CatalogStore`].
//! Every mutation validates first and then performs a single store write.

mod error;

pub use error::CatalogServiceError;

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use printfuse_core::{
    Addon, AddonDraft, AddonId, CatalogError, CatalogView, Configuration, Entity, Price,
    Product, ProductDetail, ProductDraft, ProductId, ProductType, ProductTypeDraft, Rounding,
    TypeFilter, Variant, VariantDraft, VariantId, compute_total_with, validate_addon_creation,
    validate_product_creation, validate_product_type_creation, validate_variant_creation,
};

use crate::db::{CatalogStore, ProductFilter, RepositoryError};

/// The priced result of a shopper's selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    /// The variant as the shopper sees it, e.g. `"Regular · Red"`.
    pub variant_label: String,
    /// Whether the selected variant has stock left.
    pub in_stock: bool,
    /// The product's display image, if it has any.
    pub image: Option<String>,
    /// Selected add-ons, each once, in selection order.
    pub addon_ids: Vec<AddonId>,
    pub total: Price,
    /// `total` with two decimals, for display.
    pub display: String,
}

/// Catalog operations over a shared store.
///
/// Cheap to clone; clones share the store.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    rounding: Rounding,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("rounding", &self.rounding)
            .finish_non_exhaustive()
    }
}

impl CatalogService {
    /// Create a catalog service.
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>, rounding: Rounding) -> Self {
        Self { store, rounding }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    // =========================================================================
    // Product types
    // =========================================================================

    /// Create a product type.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::Catalog` if the name is missing or blank.
    /// Returns `CatalogServiceError::Conflict` if the name is taken.
    #[instrument(skip(self, draft))]
    pub async fn create_product_type(
        &self,
        draft: ProductTypeDraft,
    ) -> Result<ProductType, CatalogServiceError> {
        let input = validate_product_type_creation(draft)?;
        let name = input.name.clone();

        let product_type = self
            .store
            .create_product_type(input)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    CatalogServiceError::Conflict(format!("product type {name:?} already exists"))
                }
                other => CatalogServiceError::Repository(other),
            })?;

        info!(
            product_type_id = %product_type.id,
            name = %product_type.name,
            supports_addons = product_type.supports_addons,
            "Created product type"
        );
        Ok(product_type)
    }

    /// All product types in creation order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::Repository` if the store fails.
    pub async fn list_product_types(&self) -> Result<Vec<ProductType>, CatalogServiceError> {
        Ok(self.store.list_product_types().await?)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Create a product under an existing type.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::Catalog` with `CatalogError::Validation`
    /// for a malformed payload, or `CatalogError::NotFound` if the type does
    /// not exist.
    #[instrument(skip(self, draft))]
    pub async fn create_product(
        &self,
        draft: ProductDraft,
    ) -> Result<Product, CatalogServiceError> {
        let input = validate_product_creation(draft)?;
        let type_id = input.product_type_id;

        if self.store.find_product_type(type_id).await?.is_none() {
            return Err(CatalogError::not_found(Entity::ProductType, type_id).into());
        }

        let product = self
            .store
            .create_product(input)
            .await
            .map_err(|e| missing_parent(e, Entity::ProductType, type_id))?;

        info!(product_id = %product.id, product_type_id = %type_id, "Created product");
        Ok(product)
    }

    /// Every product with its type, variants and add-ons.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::Repository` if the store fails.
    pub async fn list_products(&self) -> Result<Vec<ProductDetail>, CatalogServiceError> {
        Ok(self.store.list_products(&ProductFilter::default()).await?)
    }

    /// Products whose type name is exactly `type_name`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::Repository` if the store fails.
    pub async fn list_products_by_type(
        &self,
        type_name: &str,
    ) -> Result<Vec<ProductDetail>, CatalogServiceError> {
        Ok(self
            .store
            .list_products(&ProductFilter::by_type(type_name))
            .await?)
    }

    /// One product with its type, variants and add-ons.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist.
    pub async fn get_product(&self, id: ProductId) -> Result<ProductDetail, CatalogServiceError> {
        self.store
            .find_product(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(Entity::Product, id).into())
    }

    /// Delete a product along with its variants and add-ons.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<Product, CatalogServiceError> {
        let product = self
            .store
            .delete_product(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(Entity::Product, id))?;

        info!(product_id = %id, "Deleted product");
        Ok(product)
    }

    // =========================================================================
    // Variants and add-ons
    // =========================================================================

    /// Add a variant to a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` for a malformed payload,
    /// `CatalogError::NotFound` if the product does not exist, and
    /// `CatalogServiceError::Conflict` if the SKU is taken.
    #[instrument(skip(self, draft))]
    pub async fn add_variant(&self, draft: VariantDraft) -> Result<Variant, CatalogServiceError> {
        let product_id = draft.product_id()?;
        let detail = self.get_product(product_id).await?;
        let input = validate_variant_creation(&detail.product, draft)?;
        let sku = input.sku.clone();

        let variant = self
            .store
            .create_variant(input)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    CatalogServiceError::Conflict(format!("sku {sku:?} already exists"))
                }
                other => missing_parent(other, Entity::Product, product_id),
            })?;

        info!(
            variant_id = %variant.id,
            product_id = %product_id,
            sku = %variant.sku,
            "Added variant"
        );
        Ok(variant)
    }

    /// Add an add-on to a product whose type takes add-ons.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist,
    /// `CatalogError::IneligibleCategory` if its type does not take add-ons,
    /// and `CatalogError::Validation` for a malformed payload.
    #[instrument(skip(self, draft))]
    pub async fn add_addon(&self, draft: AddonDraft) -> Result<Addon, CatalogServiceError> {
        let product_id = draft.product_id()?;
        let detail = self.get_product(product_id).await?;
        let product_type = detail.product_type.as_ref().ok_or_else(|| {
            CatalogError::not_found(Entity::ProductType, detail.product.product_type_id)
        })?;

        let input = validate_addon_creation(&detail.product, product_type, draft)?;

        let addon = self
            .store
            .create_addon(input)
            .await
            .map_err(|e| missing_parent(e, Entity::Product, product_id))?;

        info!(addon_id = %addon.id, product_id = %product_id, "Added add-on");
        Ok(addon)
    }

    // =========================================================================
    // Shopper views
    // =========================================================================

    /// Price one variant plus a set of add-ons of a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist,
    /// `CatalogError::NoVariantSelected` without a variant, and
    /// `CatalogError::InvalidVariant`/`CatalogError::InvalidAddon` for ids
    /// that are not the product's.
    #[instrument(skip(self, addon_ids))]
    pub async fn price_configuration(
        &self,
        product_id: ProductId,
        variant_id: Option<VariantId>,
        addon_ids: &[AddonId],
    ) -> Result<PriceQuote, CatalogServiceError> {
        let detail = self.get_product(product_id).await?;
        let config = Configuration::select(&detail, variant_id, addon_ids)?;
        let total = compute_total_with(&config, self.rounding)?;

        let variant = config
            .selected_variant()
            .ok_or(CatalogError::NoVariantSelected)?;

        Ok(PriceQuote {
            product_id,
            variant_id: variant.id,
            variant_label: variant.label(),
            in_stock: variant.stock.in_stock(),
            image: detail.product.display_image().map(str::to_owned),
            addon_ids: config.selected_addons().iter().map(|a| a.id).collect(),
            display: total.display(),
            total,
        })
    }

    /// The browse page: products grouped by type, narrowed to `active`.
    ///
    /// If the type list cannot be loaded the filter bar falls back to `All`
    /// only; the products are still shown.
    ///
    /// # Errors
    ///
    /// Returns `CatalogServiceError::Repository` if the products cannot be
    /// loaded.
    pub async fn browse_catalog(
        &self,
        active: &TypeFilter,
    ) -> Result<CatalogView<ProductDetail>, CatalogServiceError> {
        let products = self.list_products().await?;
        let types = match self.store.list_product_types().await {
            Ok(types) => Some(types),
            Err(e) => {
                warn!(error = %e, "Failed to load product types for filters");
                None
            }
        };

        Ok(CatalogView::build(products, types.as_deref(), active))
    }
}

/// A child write whose parent vanished is reported as the parent not found.
fn missing_parent(e: RepositoryError, entity: Entity, id: impl ToString) -> CatalogServiceError {
    match e {
        RepositoryError::MissingParent(_) => CatalogError::not_found(entity, id).into(),
        other => CatalogServiceError::Repository(other),
    }
}
