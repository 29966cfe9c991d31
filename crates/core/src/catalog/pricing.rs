//! Configuration pricing.
//!
//! A [`Configuration`] is the shopper's current selection on a product page:
//! one variant plus any number of the product's add-ons. It is built per
//! request and handed to [`compute_total`]; nothing here keeps state between
//! calls.

use super::error::{CatalogError, CatalogResult};
use super::model::{Addon, ProductDetail, Variant};
use crate::types::{AddonId, Price, Rounding, VariantId};

/// A transient selection of one variant and zero or more add-ons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration<'a> {
    product: &'a ProductDetail,
    selected_variant: Option<&'a Variant>,
    selected_addons: Vec<&'a Addon>,
}

impl<'a> Configuration<'a> {
    /// An empty selection on `product`.
    #[must_use]
    pub const fn new(product: &'a ProductDetail) -> Self {
        Self {
            product,
            selected_variant: None,
            selected_addons: Vec::new(),
        }
    }

    /// Build a selection from ids.
    ///
    /// Repeated add-on ids collapse to one selection.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidVariant` or `CatalogError::InvalidAddon`
    /// when an id is not one of the product's own.
    pub fn select(
        product: &'a ProductDetail,
        variant_id: Option<VariantId>,
        addon_ids: &[AddonId],
    ) -> CatalogResult<Self> {
        let mut config = Self::new(product);
        if let Some(id) = variant_id {
            config.select_variant(id)?;
        }
        for &id in addon_ids {
            config.add_addon(id)?;
        }
        Ok(config)
    }

    /// The first variant with nothing else selected, as a product page opens.
    #[must_use]
    pub fn preselected(product: &'a ProductDetail) -> Self {
        Self {
            selected_variant: product.variants.first(),
            ..Self::new(product)
        }
    }

    /// Replace the selected variant.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidVariant` if the variant is not the
    /// product's.
    pub fn select_variant(&mut self, id: VariantId) -> CatalogResult<()> {
        let variant = self
            .product
            .variant(id)
            .ok_or(CatalogError::InvalidVariant {
                variant_id: id,
                product_id: self.product.id(),
            })?;
        self.selected_variant = Some(variant);
        Ok(())
    }

    /// Add an add-on to the selection (no-op if already selected).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidAddon` if the product's type does not
    /// take add-ons or the add-on is not the product's.
    pub fn add_addon(&mut self, id: AddonId) -> CatalogResult<()> {
        let addon = self.eligible_addon(id)?;
        if !self.is_addon_selected(id) {
            self.selected_addons.push(addon);
        }
        Ok(())
    }

    /// Select the add-on if unselected, otherwise deselect it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidAddon` under the same conditions as
    /// [`Configuration::add_addon`].
    pub fn toggle_addon(&mut self, id: AddonId) -> CatalogResult<()> {
        let addon = self.eligible_addon(id)?;
        if self.is_addon_selected(id) {
            self.selected_addons.retain(|a| a.id != id);
        } else {
            self.selected_addons.push(addon);
        }
        Ok(())
    }

    #[must_use]
    pub const fn product(&self) -> &'a ProductDetail {
        self.product
    }

    #[must_use]
    pub const fn selected_variant(&self) -> Option<&'a Variant> {
        self.selected_variant
    }

    #[must_use]
    pub fn selected_addons(&self) -> &[&'a Addon] {
        &self.selected_addons
    }

    #[must_use]
    pub fn is_addon_selected(&self, id: AddonId) -> bool {
        self.selected_addons.iter().any(|a| a.id == id)
    }

    fn eligible_addon(&self, id: AddonId) -> CatalogResult<&'a Addon> {
        let invalid = CatalogError::InvalidAddon {
            addon_id: id,
            product_id: self.product.id(),
        };
        if !self.product.supports_addons() {
            return Err(invalid);
        }
        self.product.addon(id).ok_or(invalid)
    }
}

/// Total price of a configuration, at full precision.
///
/// `variant.price + Σ addon.price`, summed exactly.
///
/// # Errors
///
/// Returns `CatalogError::NoVariantSelected` without a variant,
/// `CatalogError::InvalidVariant`/`CatalogError::InvalidAddon` when a
/// selection belongs to another product, and `CatalogError::PriceOverflow`
/// if the sum leaves the decimal range.
pub fn compute_total(config: &Configuration<'_>) -> CatalogResult<Price> {
    compute_total_with(config, Rounding::Exact)
}

/// Total price of a configuration with an explicit rounding rule.
///
/// # Errors
///
/// Same as [`compute_total`].
pub fn compute_total_with(config: &Configuration<'_>, rounding: Rounding) -> CatalogResult<Price> {
    let product_id = config.product.id();
    let variant = config
        .selected_variant
        .ok_or(CatalogError::NoVariantSelected)?;
    if variant.product_id != product_id {
        return Err(CatalogError::InvalidVariant {
            variant_id: variant.id,
            product_id,
        });
    }

    let mut total = variant.price;
    for addon in &config.selected_addons {
        if addon.product_id != product_id {
            return Err(CatalogError::InvalidAddon {
                addon_id: addon.id,
                product_id,
            });
        }
        total = total
            .checked_add(addon.price)
            .ok_or(CatalogError::PriceOverflow)?;
    }

    Ok(total.rounded(rounding))
}
