//! In-memory catalog store.
//!
//! Every mutation takes the single write lock, so parent checks, uniqueness
//! checks and cascades are atomic with the write they guard.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use printfuse_core::{
    Addon, AddonId, NewAddon, NewProduct, NewProductType, NewVariant, Product, ProductDetail,
    ProductId, ProductType, ProductTypeId, Variant, VariantId, by_type_name,
};

use super::{CatalogStore, ProductFilter, RepositoryError};

#[derive(Debug, Default)]
struct Tables {
    last_id: LastIds,
    product_types: BTreeMap<ProductTypeId, ProductType>,
    products: BTreeMap<ProductId, Product>,
    variants: BTreeMap<VariantId, Variant>,
    addons: BTreeMap<AddonId, Addon>,
}

#[derive(Debug, Default)]
struct LastIds {
    product_type: i32,
    product: i32,
    variant: i32,
    addon: i32,
}

fn next_id(last: &mut i32) -> Result<i32, RepositoryError> {
    *last = last
        .checked_add(1)
        .ok_or_else(|| RepositoryError::Conflict("id sequence exhausted".to_owned()))?;
    Ok(*last)
}

impl Tables {
    fn detail(&self, product: &Product) -> ProductDetail {
        ProductDetail {
            product: product.clone(),
            product_type: self.product_types.get(&product.product_type_id).cloned(),
            variants: self
                .variants
                .values()
                .filter(|v| v.product_id == product.id)
                .cloned()
                .collect(),
            addons: self
                .addons
                .values()
                .filter(|a| a.product_id == product.id)
                .cloned()
                .collect(),
        }
    }

    fn require_product(&self, id: ProductId) -> Result<(), RepositoryError> {
        if self.products.contains_key(&id) {
            Ok(())
        } else {
            Err(RepositoryError::MissingParent(format!("product {id}")))
        }
    }
}

/// Catalog store held entirely in process memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn create_product_type(
        &self,
        input: NewProductType,
    ) -> Result<ProductType, RepositoryError> {
        let mut tables = self.tables.write().await;

        if tables.product_types.values().any(|t| t.name == input.name) {
            return Err(RepositoryError::Conflict(format!(
                "product type {:?} already exists",
                input.name
            )));
        }

        let id = ProductTypeId::new(next_id(&mut tables.last_id.product_type)?);
        let product_type = ProductType {
            id,
            name: input.name,
            supports_addons: input.supports_addons,
            created_at: Utc::now(),
        };
        tables.product_types.insert(id, product_type.clone());
        Ok(product_type)
    }

    async fn list_product_types(&self) -> Result<Vec<ProductType>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.product_types.values().cloned().collect())
    }

    async fn find_product_type(
        &self,
        id: ProductTypeId,
    ) -> Result<Option<ProductType>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.product_types.get(&id).cloned())
    }

    async fn create_product(&self, input: NewProduct) -> Result<Product, RepositoryError> {
        let mut tables = self.tables.write().await;

        if !tables.product_types.contains_key(&input.product_type_id) {
            return Err(RepositoryError::MissingParent(format!(
                "product type {}",
                input.product_type_id
            )));
        }

        let id = ProductId::new(next_id(&mut tables.last_id.product)?);
        let product = Product {
            id,
            name: input.name,
            description: input.description,
            images: input.images,
            product_type_id: input.product_type_id,
            created_at: Utc::now(),
        };
        tables.products.insert(id, product.clone());
        Ok(product)
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        let tables = self.tables.read().await;
        let details = tables.products.values().map(|p| tables.detail(p));
        Ok(match filter.type_name.as_deref() {
            Some(name) => by_type_name(details, name),
            None => details.collect(),
        })
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.products.get(&id).map(|p| tables.detail(p)))
    }

    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let mut tables = self.tables.write().await;

        let Some(product) = tables.products.remove(&id) else {
            return Ok(None);
        };
        tables.variants.retain(|_, v| v.product_id != id);
        tables.addons.retain(|_, a| a.product_id != id);
        Ok(Some(product))
    }

    async fn create_variant(&self, input: NewVariant) -> Result<Variant, RepositoryError> {
        let mut tables = self.tables.write().await;

        tables.require_product(input.product_id)?;
        if tables.variants.values().any(|v| v.sku == input.sku) {
            return Err(RepositoryError::Conflict(format!(
                "sku {:?} already exists",
                input.sku
            )));
        }

        let id = VariantId::new(next_id(&mut tables.last_id.variant)?);
        let variant = Variant {
            id,
            product_id: input.product_id,
            size: input.size,
            color: input.color,
            price: input.price,
            stock: input.stock,
            sku: input.sku,
            created_at: Utc::now(),
        };
        tables.variants.insert(id, variant.clone());
        Ok(variant)
    }

    async fn create_addon(&self, input: NewAddon) -> Result<Addon, RepositoryError> {
        let mut tables = self.tables.write().await;

        tables.require_product(input.product_id)?;

        let id = AddonId::new(next_id(&mut tables.last_id.addon)?);
        let addon = Addon {
            id,
            product_id: input.product_id,
            name: input.name,
            price: input.price,
            created_at: Utc::now(),
        };
        tables.addons.insert(id, addon.clone());
        Ok(addon)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
