//! The catalog domain: records, validation, pricing and read projections.

pub mod error;
pub mod model;
pub mod pricing;
pub mod projection;
pub mod rules;

pub use error::{CatalogError, CatalogResult, Entity};
pub use model::{
    Addon, AddonDraft, DEFAULT_ADDON_CATEGORY, NewAddon, NewProduct, NewProductType, NewVariant,
    Product, ProductDetail, ProductDraft, ProductType, ProductTypeDraft, Variant, VariantDraft,
};
pub use pricing::{Configuration, compute_total, compute_total_with};
pub use projection::{
    ALL_TYPES, CatalogView, Categorized, GroupedCatalog, OTHER_GROUP, TypeFilter, TypeGroup,
    by_type_name, filter_by_type, filter_options, group_by_type,
};
pub use rules::{
    can_have_addons, validate_addon_creation, validate_product_creation,
    validate_product_type_creation, validate_variant_creation,
};
