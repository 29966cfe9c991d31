//! Catalog records and the validated payloads that create them.
//!
//! Stored records (`ProductType`, `Product`, `Variant`, `Addon`) are plain
//! data. Inbound payloads arrive as loosely-typed *drafts* where every field
//! is optional; `New*::parse` turns a draft into a value the store can write
//! or fails with [`CatalogError::Validation`] naming the field.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{CatalogError, CatalogResult};
use crate::types::{AddonId, Price, ProductId, ProductTypeId, Stock, VariantId};

/// Name of the category that takes add-ons when a type is created without an
/// explicit capability. Compared case-insensitively.
pub const DEFAULT_ADDON_CATEGORY: &str = "food";

// =============================================================================
// Stored records
// =============================================================================

/// A top-level category such as Food or Apparel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductType {
    pub id: ProductTypeId,
    pub name: String,
    /// Whether products of this type may carry add-ons.
    pub supports_addons: bool,
    pub created_at: DateTime<Utc>,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub images: Vec<String>,
    pub product_type_id: ProductTypeId,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// The canonical display image (first image, if any).
    #[must_use]
    pub fn display_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// A purchasable configuration of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub size: Option<String>,
    pub color: Option<String>,
    pub price: Price,
    pub stock: Stock,
    pub sku: String,
    pub created_at: DateTime<Utc>,
}

impl Variant {
    /// Short human label, e.g. `"Regular · Red"`.
    #[must_use]
    pub fn label(&self) -> String {
        match (self.size.as_deref(), self.color.as_deref()) {
            (Some(size), Some(color)) => format!("{size} · {color}"),
            (Some(size), None) => size.to_owned(),
            (None, Some(color)) => color.to_owned(),
            (None, None) => self.sku.clone(),
        }
    }
}

/// An optional priced extra for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Addon {
    pub id: AddonId,
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub created_at: DateTime<Utc>,
}

/// A product together with its type, variants and add-ons.
///
/// `product_type` is `None` when the type reference could not be resolved.
/// Response-only: flattened fields do not read back through
/// arbitrary-precision JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub product_type: Option<ProductType>,
    pub variants: Vec<Variant>,
    pub addons: Vec<Addon>,
}

impl ProductDetail {
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Name of the product's type, if resolved.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.product_type.as_ref().map(|t| t.name.as_str())
    }

    /// Whether the resolved type takes add-ons.
    #[must_use]
    pub fn supports_addons(&self) -> bool {
        self.product_type
            .as_ref()
            .is_some_and(|t| t.supports_addons)
    }

    #[must_use]
    pub fn variant(&self, id: VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == id)
    }

    #[must_use]
    pub fn addon(&self, id: AddonId) -> Option<&Addon> {
        self.addons.iter().find(|a| a.id == id)
    }
}

// =============================================================================
// Drafts (unvalidated input)
// =============================================================================

/// Unvalidated input for creating a product type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTypeDraft {
    pub name: Option<String>,
    /// Explicit add-on capability; defaults from the name when absent.
    pub supports_addons: Option<bool>,
}

/// Unvalidated input for creating a product.
///
/// `images` is kept as raw JSON so a non-list value is reported as a
/// validation failure on that field rather than a parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub product_type_id: Option<ProductTypeId>,
    pub images: Option<Value>,
}

/// Unvalidated input for adding a variant to a product.
///
/// `price` may be a JSON string or number; either keeps its written scale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDraft {
    pub product_id: Option<ProductId>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub sku: Option<String>,
}

/// Unvalidated input for adding an add-on to a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddonDraft {
    pub product_id: Option<ProductId>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
}

impl VariantDraft {
    /// The product the variant is for.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if `productId` is missing.
    pub fn product_id(&self) -> CatalogResult<ProductId> {
        self.product_id
            .ok_or_else(|| CatalogError::validation("productId", "is required"))
    }
}

impl AddonDraft {
    /// The product the add-on is for.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if `productId` is missing.
    pub fn product_id(&self) -> CatalogResult<ProductId> {
        self.product_id
            .ok_or_else(|| CatalogError::validation("productId", "is required"))
    }
}

// =============================================================================
// Validated payloads
// =============================================================================

/// A product type ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProductType {
    pub name: String,
    pub supports_addons: bool,
}

impl NewProductType {
    /// Validate a product type draft.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if `name` is missing or blank.
    pub fn parse(draft: ProductTypeDraft) -> CatalogResult<Self> {
        let name = required_text("name", draft.name)?;
        let supports_addons = draft
            .supports_addons
            .unwrap_or_else(|| name.eq_ignore_ascii_case(DEFAULT_ADDON_CATEGORY));
        Ok(Self {
            name,
            supports_addons,
        })
    }
}

/// A product ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub product_type_id: ProductTypeId,
    pub images: Vec<String>,
}

impl NewProduct {
    /// Validate a product draft.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if `name`, `description` or
    /// `productTypeId` is missing, or `images` is missing or not a list of
    /// strings.
    pub fn parse(draft: ProductDraft) -> CatalogResult<Self> {
        let name = required_text("name", draft.name)?;
        let description = required_text("description", draft.description)?;
        let product_type_id = draft
            .product_type_id
            .ok_or_else(|| CatalogError::validation("productTypeId", "is required"))?;
        let images = image_list(draft.images)?;

        Ok(Self {
            name,
            description,
            product_type_id,
            images,
        })
    }
}

/// A variant ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVariant {
    pub product_id: ProductId,
    pub size: Option<String>,
    pub color: Option<String>,
    pub price: Price,
    pub stock: Stock,
    pub sku: String,
}

impl NewVariant {
    /// Validate a variant draft for `product_id`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if `sku` is blank or `price`/`stock`
    /// is missing or negative.
    pub fn parse(product_id: ProductId, draft: VariantDraft) -> CatalogResult<Self> {
        let sku = required_text("sku", draft.sku)?;
        let price = required_price("price", draft.price)?;
        let stock = draft
            .stock
            .ok_or_else(|| CatalogError::validation("stock", "is required"))
            .and_then(|s| {
                Stock::new(s).map_err(|e| CatalogError::validation("stock", e.to_string()))
            })?;

        Ok(Self {
            product_id,
            size: optional_text(draft.size),
            color: optional_text(draft.color),
            price,
            stock,
            sku,
        })
    }
}

/// An add-on ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddon {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
}

impl NewAddon {
    /// Validate an add-on draft for `product_id`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if `name` is blank or `price` is
    /// missing or negative.
    pub fn parse(product_id: ProductId, draft: AddonDraft) -> CatalogResult<Self> {
        let name = required_text("name", draft.name)?;
        let price = required_price("price", draft.price)?;
        Ok(Self {
            product_id,
            name,
            price,
        })
    }
}

// =============================================================================
// Field helpers
// =============================================================================

fn required_text(field: &'static str, value: Option<String>) -> CatalogResult<String> {
    let value = value.ok_or_else(|| CatalogError::validation(field, "is required"))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::validation(field, "cannot be empty"));
    }
    Ok(trimmed.to_owned())
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn required_price(field: &'static str, value: Option<Decimal>) -> CatalogResult<Price> {
    let amount = value.ok_or_else(|| CatalogError::validation(field, "is required"))?;
    Price::new(amount).map_err(|e| CatalogError::validation(field, e.to_string()))
}

fn image_list(value: Option<Value>) -> CatalogResult<Vec<String>> {
    match value {
        None | Some(Value::Null) => Err(CatalogError::validation("images", "is required")),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(url) => Ok(url),
                _ => Err(CatalogError::validation(
                    "images",
                    "must contain only strings",
                )),
            })
            .collect(),
        Some(_) => Err(CatalogError::validation("images", "must be a list")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn product_draft() -> ProductDraft {
        ProductDraft {
            name: Some("Burger".to_string()),
            description: Some("Flame grilled".to_string()),
            product_type_id: Some(ProductTypeId::new(1)),
            images: Some(json!([])),
        }
    }

    fn field_of(err: &CatalogError) -> &'static str {
        err.field().unwrap()
    }

    #[test]
    fn test_product_type_defaults_capability_from_name() {
        let food = NewProductType::parse(ProductTypeDraft {
            name: Some("FOOD".to_string()),
            supports_addons: None,
        })
        .unwrap();
        assert!(food.supports_addons);

        let apparel = NewProductType::parse(ProductTypeDraft {
            name: Some("Apparel".to_string()),
            supports_addons: None,
        })
        .unwrap();
        assert!(!apparel.supports_addons);
    }

    #[test]
    fn test_product_type_explicit_capability_wins() {
        let drinks = NewProductType::parse(ProductTypeDraft {
            name: Some("Drinks".to_string()),
            supports_addons: Some(true),
        })
        .unwrap();
        assert!(drinks.supports_addons);
    }

    #[test]
    fn test_product_type_requires_name() {
        let err = NewProductType::parse(ProductTypeDraft::default()).unwrap_err();
        assert_eq!(field_of(&err), "name");

        let err = NewProductType::parse(ProductTypeDraft {
            name: Some("   ".to_string()),
            supports_addons: None,
        })
        .unwrap_err();
        assert_eq!(err, CatalogError::validation("name", "cannot be empty"));
    }

    #[test]
    fn test_product_parse_valid() {
        let product = NewProduct::parse(ProductDraft {
            images: Some(json!(["a.jpg", "b.jpg"])),
            ..product_draft()
        })
        .unwrap();
        assert_eq!(product.name, "Burger");
        assert_eq!(product.images, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_product_parse_empty_images_ok() {
        let product = NewProduct::parse(product_draft()).unwrap();
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_product_parse_missing_fields() {
        let err = NewProduct::parse(ProductDraft {
            name: None,
            ..product_draft()
        })
        .unwrap_err();
        assert_eq!(field_of(&err), "name");

        let err = NewProduct::parse(ProductDraft {
            description: Some(String::new()),
            ..product_draft()
        })
        .unwrap_err();
        assert_eq!(field_of(&err), "description");

        let err = NewProduct::parse(ProductDraft {
            product_type_id: None,
            ..product_draft()
        })
        .unwrap_err();
        assert_eq!(field_of(&err), "productTypeId");
    }

    #[test]
    fn test_product_parse_images_shape() {
        for images in [None, Some(json!(null)), Some(json!("a.jpg")), Some(json!({}))] {
            let err = NewProduct::parse(ProductDraft {
                images,
                ..product_draft()
            })
            .unwrap_err();
            assert_eq!(field_of(&err), "images");
        }

        let err = NewProduct::parse(ProductDraft {
            images: Some(json!(["a.jpg", 3])),
            ..product_draft()
        })
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::validation("images", "must contain only strings")
        );
    }

    #[test]
    fn test_variant_parse() {
        let variant = NewVariant::parse(
            ProductId::new(4),
            VariantDraft {
                product_id: Some(ProductId::new(4)),
                size: Some("Regular".to_string()),
                color: Some("  ".to_string()),
                price: Some(Decimal::new(500, 2)),
                stock: Some(10),
                sku: Some("BRG-1".to_string()),
            },
        )
        .unwrap();
        assert_eq!(variant.size.as_deref(), Some("Regular"));
        assert_eq!(variant.color, None);
        assert_eq!(variant.price.to_string(), "5.00");
        assert_eq!(variant.stock.count(), 10);
    }

    #[test]
    fn test_variant_parse_rejects_bad_numbers() {
        let base = VariantDraft {
            product_id: Some(ProductId::new(1)),
            price: Some(Decimal::ONE),
            stock: Some(1),
            sku: Some("SKU".to_string()),
            ..VariantDraft::default()
        };

        let err = NewVariant::parse(
            ProductId::new(1),
            VariantDraft {
                price: Some(Decimal::NEGATIVE_ONE),
                ..base.clone()
            },
        )
        .unwrap_err();
        assert_eq!(field_of(&err), "price");

        let err = NewVariant::parse(
            ProductId::new(1),
            VariantDraft {
                stock: None,
                ..base.clone()
            },
        )
        .unwrap_err();
        assert_eq!(field_of(&err), "stock");

        let err = NewVariant::parse(
            ProductId::new(1),
            VariantDraft {
                stock: Some(-3),
                ..base.clone()
            },
        )
        .unwrap_err();
        assert_eq!(field_of(&err), "stock");

        let err = NewVariant::parse(
            ProductId::new(1),
            VariantDraft {
                sku: Some(String::new()),
                ..base
            },
        )
        .unwrap_err();
        assert_eq!(field_of(&err), "sku");
    }

    #[test]
    fn test_addon_parse() {
        let addon = NewAddon::parse(
            ProductId::new(2),
            AddonDraft {
                product_id: Some(ProductId::new(2)),
                name: Some("Cheese".to_string()),
                price: Some(Decimal::ZERO),
            },
        )
        .unwrap();
        assert_eq!(addon.price, Price::ZERO);

        let err = NewAddon::parse(ProductId::new(2), AddonDraft::default()).unwrap_err();
        assert_eq!(field_of(&err), "name");
    }

    #[test]
    fn test_draft_product_id_required() {
        let err = AddonDraft::default().product_id().unwrap_err();
        assert_eq!(field_of(&err), "productId");
        assert!(VariantDraft::default().product_id().is_err());
    }

    #[test]
    fn test_draft_deserializes_camel_case() {
        let draft: ProductDraft = serde_json::from_value(json!({
            "name": "Tee",
            "description": "Cotton",
            "productTypeId": 2,
            "images": ["tee.jpg"]
        }))
        .unwrap();
        assert_eq!(draft.product_type_id, Some(ProductTypeId::new(2)));
    }

    #[test]
    fn test_numeric_price_keeps_scale() {
        let draft: VariantDraft =
            serde_json::from_str(r#"{"price": 5.00, "stock": 1, "sku": "BRG-1"}"#).unwrap();
        assert_eq!(draft.price.unwrap().to_string(), "5.00");

        let draft: AddonDraft =
            serde_json::from_str(r#"{"name": "Cheese", "price": 0.125}"#).unwrap();
        assert_eq!(draft.price, Some(Decimal::new(125, 3)));

        let draft: AddonDraft = serde_json::from_str(r#"{"price": "1.50"}"#).unwrap();
        assert_eq!(draft.price.unwrap().to_string(), "1.50");
    }

    #[test]
    fn test_product_display_image() {
        let product = Product {
            id: ProductId::new(1),
            name: "Tee".to_string(),
            description: "Cotton".to_string(),
            images: vec!["front.jpg".to_string(), "back.jpg".to_string()],
            product_type_id: ProductTypeId::new(1),
            created_at: Utc::now(),
        };
        assert_eq!(product.display_image(), Some("front.jpg"));
        assert_eq!(
            Product {
                images: Vec::new(),
                ..product
            }
            .display_image(),
            None
        );
    }

    #[test]
    fn test_variant_label() {
        let variant = Variant {
            id: VariantId::new(1),
            product_id: ProductId::new(1),
            size: Some("M".to_string()),
            color: Some("Red".to_string()),
            price: Price::ZERO,
            stock: Stock::default(),
            sku: "TEE-M-RED".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(variant.label(), "M · Red");
        assert_eq!(
            Variant {
                size: None,
                color: None,
                ..variant
            }
            .label(),
            "TEE-M-RED"
        );
    }
}
