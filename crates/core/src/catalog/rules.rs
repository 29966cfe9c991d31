//! Eligibility and validation rules gating catalog mutations.
//!
//! Every check here runs before the store is touched, so a rejected request
//! never leaves a partial record behind.

use super::error::{CatalogError, CatalogResult};
use super::model::{
    AddonDraft, NewAddon, NewProduct, NewProductType, NewVariant, Product, ProductDraft,
    ProductType, ProductTypeDraft, VariantDraft,
};
use crate::types::ProductId;

/// Whether `product` may carry add-ons.
///
/// True only when `product_type` is the product's own type and that type was
/// created with the add-on capability.
#[must_use]
pub fn can_have_addons(product: &Product, product_type: &ProductType) -> bool {
    product.product_type_id == product_type.id && product_type.supports_addons
}

/// Validate input for a new product type.
///
/// # Errors
///
/// Returns `CatalogError::Validation` if the name is missing or blank.
pub fn validate_product_type_creation(draft: ProductTypeDraft) -> CatalogResult<NewProductType> {
    NewProductType::parse(draft)
}

/// Validate input for a new product.
///
/// Existence of the referenced type is checked by the caller against the
/// store.
///
/// # Errors
///
/// Returns `CatalogError::Validation` for missing or malformed fields.
pub fn validate_product_creation(draft: ProductDraft) -> CatalogResult<NewProduct> {
    NewProduct::parse(draft)
}

/// Validate input for a new variant of `product`.
///
/// # Errors
///
/// Returns `CatalogError::Validation` if the draft names a different product,
/// the sku is blank, or price/stock are missing or negative.
pub fn validate_variant_creation(
    product: &Product,
    draft: VariantDraft,
) -> CatalogResult<NewVariant> {
    ensure_same_product(product, draft.product_id)?;
    NewVariant::parse(product.id, draft)
}

/// Validate input for a new add-on of `product`.
///
/// The category rule is checked first: an ineligible product is rejected
/// whatever the payload contains.
///
/// # Errors
///
/// Returns `CatalogError::IneligibleCategory` if the product's type does not
/// take add-ons, otherwise `CatalogError::Validation` for a blank name or a
/// missing/negative price.
pub fn validate_addon_creation(
    product: &Product,
    product_type: &ProductType,
    draft: AddonDraft,
) -> CatalogResult<NewAddon> {
    if !can_have_addons(product, product_type) {
        return Err(CatalogError::IneligibleCategory {
            product_id: product.id,
            product_type: product_type.name.clone(),
        });
    }
    ensure_same_product(product, draft.product_id)?;
    NewAddon::parse(product.id, draft)
}

fn ensure_same_product(product: &Product, draft_product: Option<ProductId>) -> CatalogResult<()> {
    match draft_product {
        Some(id) if id != product.id => Err(CatalogError::validation(
            "productId",
            format!("does not match product {}", product.id),
        )),
        _ => Ok(()),
    }
}
