//! `PostgreSQL` catalog store.
//!
//! Queries are checked at runtime (`query_as` with `FromRow` rows) so the
//! crate builds without a live database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};

use printfuse_core::{
    Addon, AddonId, NewAddon, NewProduct, NewProductType, NewVariant, Price, Product,
    ProductDetail, ProductId, ProductType, ProductTypeId, Stock, Variant, VariantId,
};

use super::{CatalogStore, ProductFilter, RepositoryError};

const PRODUCT_TYPE_COLUMNS: &str = "id, name, supports_addons, created_at";
const PRODUCT_COLUMNS: &str = "id, name, description, images, product_type_id, created_at";
const VARIANT_COLUMNS: &str = "id, product_id, size, color, price, stock, sku, created_at";
const ADDON_COLUMNS: &str = "id, product_id, name, price, created_at";

#[derive(Debug, sqlx::FromRow)]
struct ProductTypeRow {
    id: ProductTypeId,
    name: String,
    supports_addons: bool,
    created_at: DateTime<Utc>,
}

impl From<ProductTypeRow> for ProductType {
    fn from(row: ProductTypeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            supports_addons: row.supports_addons,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: String,
    images: Vec<String>,
    product_type_id: ProductTypeId,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            images: row.images,
            product_type_id: row.product_type_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VariantRow {
    id: VariantId,
    product_id: ProductId,
    size: Option<String>,
    color: Option<String>,
    price: Decimal,
    stock: i32,
    sku: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<VariantRow> for Variant {
    type Error = RepositoryError;

    fn try_from(row: VariantRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price on variant {}: {e}", row.id))
        })?;
        let stock = Stock::new(i64::from(row.stock)).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid stock on variant {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            size: row.size,
            color: row.color,
            price,
            stock,
            sku: row.sku,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AddonRow {
    id: AddonId,
    product_id: ProductId,
    name: String,
    price: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<AddonRow> for Addon {
    type Error = RepositoryError;

    fn try_from(row: AddonRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price on add-on {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            product_id: row.product_id,
            name: row.name,
            price,
            created_at: row.created_at,
        })
    }
}

/// Map insert failures onto store errors.
fn write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        let constraint = db_err.constraint().unwrap_or("unknown").to_owned();
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(constraint);
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::MissingParent(constraint);
        }
    }
    RepositoryError::Database(e)
}

/// Catalog store backed by `PostgreSQL`.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Lock the product row against deletion for the rest of the transaction.
    async fn lock_product(
        tx: &mut Transaction<'_, Postgres>,
        id: ProductId,
    ) -> Result<(), RepositoryError> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM catalog.product WHERE id = $1 FOR SHARE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;

        row.map(|_| ())
            .ok_or_else(|| RepositoryError::MissingParent(format!("product {id}")))
    }

    /// Begin a read-only transaction whose reads share one snapshot.
    async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    /// Attach types, variants and add-ons to product rows read in `tx`.
    async fn details(
        tx: &mut Transaction<'_, Postgres>,
        rows: Vec<ProductRow>,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = rows.iter().map(|r| r.id.as_i32()).collect();

        let types: HashMap<ProductTypeId, ProductType> =
            sqlx::query_as::<_, ProductTypeRow>(&format!(
                "SELECT {PRODUCT_TYPE_COLUMNS} FROM catalog.product_type ORDER BY id"
            ))
            .fetch_all(&mut **tx)
            .await?
            .into_iter()
            .map(|row| (row.id, ProductType::from(row)))
            .collect();

        let variant_rows = sqlx::query_as::<_, VariantRow>(&format!(
            "SELECT {VARIANT_COLUMNS} FROM catalog.variant WHERE product_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(&mut **tx)
        .await?;

        let addon_rows = sqlx::query_as::<_, AddonRow>(&format!(
            "SELECT {ADDON_COLUMNS} FROM catalog.addon WHERE product_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(&mut **tx)
        .await?;

        let mut variants: HashMap<ProductId, Vec<Variant>> = HashMap::new();
        for row in variant_rows {
            let variant = Variant::try_from(row)?;
            variants.entry(variant.product_id).or_default().push(variant);
        }
        let mut addons: HashMap<ProductId, Vec<Addon>> = HashMap::new();
        for row in addon_rows {
            let addon = Addon::try_from(row)?;
            addons.entry(addon.product_id).or_default().push(addon);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let product = Product::from(row);
                ProductDetail {
                    product_type: types.get(&product.product_type_id).cloned(),
                    variants: variants.remove(&product.id).unwrap_or_default(),
                    addons: addons.remove(&product.id).unwrap_or_default(),
                    product,
                }
            })
            .collect())
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create_product_type(
        &self,
        input: NewProductType,
    ) -> Result<ProductType, RepositoryError> {
        let row = sqlx::query_as::<_, ProductTypeRow>(&format!(
            "INSERT INTO catalog.product_type (name, supports_addons) VALUES ($1, $2) \
             RETURNING {PRODUCT_TYPE_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(input.supports_addons)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(row.into())
    }

    async fn list_product_types(&self) -> Result<Vec<ProductType>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductTypeRow>(&format!(
            "SELECT {PRODUCT_TYPE_COLUMNS} FROM catalog.product_type ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductType::from).collect())
    }

    async fn find_product_type(
        &self,
        id: ProductTypeId,
    ) -> Result<Option<ProductType>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductTypeRow>(&format!(
            "SELECT {PRODUCT_TYPE_COLUMNS} FROM catalog.product_type WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProductType::from))
    }

    #[instrument(skip(self, input), fields(product_type_id = %input.product_type_id))]
    async fn create_product(&self, input: NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO catalog.product (name, description, images, product_type_id) \
             VALUES ($1, $2, $3, $4) RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.images)
        .bind(input.product_type_id)
        .fetch_one(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(row.into())
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductDetail>, RepositoryError> {
        let mut tx = self.begin_snapshot().await?;
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT p.id, p.name, p.description, p.images, p.product_type_id, p.created_at
            FROM catalog.product p
            LEFT JOIN catalog.product_type t ON t.id = p.product_type_id
            WHERE $1::text IS NULL OR t.name = $1
            ORDER BY p.id
            ",
        )
        .bind(filter.type_name.as_deref())
        .fetch_all(&mut *tx)
        .await?;

        let details = Self::details(&mut tx, rows).await?;
        tx.commit().await?;
        debug!(count = details.len(), "Listed products");
        Ok(details)
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError> {
        let mut tx = self.begin_snapshot().await?;
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let detail = Self::details(&mut tx, vec![row]).await?.into_iter().next();
        tx.commit().await?;
        Ok(detail)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        // Variants and add-ons go with it via ON DELETE CASCADE.
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "DELETE FROM catalog.product WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    #[instrument(skip(self, input), fields(product_id = %input.product_id, sku = %input.sku))]
    async fn create_variant(&self, input: NewVariant) -> Result<Variant, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_product(&mut tx, input.product_id).await?;

        let row = sqlx::query_as::<_, VariantRow>(&format!(
            "INSERT INTO catalog.variant (product_id, size, color, price, stock, sku) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {VARIANT_COLUMNS}"
        ))
        .bind(input.product_id)
        .bind(&input.size)
        .bind(&input.color)
        .bind(input.price)
        .bind(input.stock)
        .bind(&input.sku)
        .fetch_one(&mut *tx)
        .await
        .map_err(write_error)?;

        tx.commit().await?;
        Variant::try_from(row)
    }

    #[instrument(skip(self, input), fields(product_id = %input.product_id))]
    async fn create_addon(&self, input: NewAddon) -> Result<Addon, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_product(&mut tx, input.product_id).await?;

        let row = sqlx::query_as::<_, AddonRow>(&format!(
            "INSERT INTO catalog.addon (product_id, name, price) \
             VALUES ($1, $2, $3) RETURNING {ADDON_COLUMNS}"
        ))
        .bind(input.product_id)
        .bind(&input.name)
        .bind(input.price)
        .fetch_one(&mut *tx)
        .await
        .map_err(write_error)?;

        tx.commit().await?;
        Addon::try_from(row)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
