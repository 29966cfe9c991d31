//! Catalog route handlers.
//!
//! Request bodies arrive as `Result<Json<T>, JsonRejection>` so a malformed
//! body becomes an `AppError::BadRequest` with a JSON error body instead of
//! axum's plain-text rejection.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use printfuse_core::{
    Addon, AddonDraft, AddonId, CatalogView, IdParseError, Product, ProductDetail, ProductDraft,
    ProductId, ProductType, ProductTypeDraft, TypeFilter, Variant, VariantDraft, VariantId,
};

use crate::error::{AppError, Result};
use crate::services::PriceQuote;
use crate::state::AppState;

/// Query parameters for the browse view.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(rename = "type")]
    pub type_name: Option<String>,
}

/// A shopper's selection to price.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRequest {
    pub variant_id: Option<VariantId>,
    #[serde(default)]
    pub addon_ids: Vec<AddonId>,
}

/// Response body for a deleted product.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
    pub deleted: Product,
}

fn parse_product_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|e: IdParseError| AppError::BadRequest(e.to_string()))
}

// =============================================================================
// Product types
// =============================================================================

/// `GET /api/products/types`
pub async fn list_types(State(state): State<AppState>) -> Result<Json<Vec<ProductType>>> {
    Ok(Json(state.catalog().list_product_types().await?))
}

/// `POST /api/products/types`
pub async fn create_type(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProductTypeDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductType>)> {
    let Json(draft) = payload?;
    let product_type = state.catalog().create_product_type(draft).await?;
    Ok((StatusCode::CREATED, Json(product_type)))
}

// =============================================================================
// Products
// =============================================================================

/// `POST /api/products`
pub async fn create_product(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProductDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>)> {
    let Json(draft) = payload?;
    let product = state.catalog().create_product(draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /api/products`
pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<ProductDetail>>> {
    Ok(Json(state.catalog().list_products().await?))
}

/// `GET /api/products/catalog?type=Food`
pub async fn catalog(
    State(state): State<AppState>,
    query: std::result::Result<Query<CatalogQuery>, QueryRejection>,
) -> Result<Json<CatalogView<ProductDetail>>> {
    let Query(query) = query?;
    let active = TypeFilter::from(query.type_name.as_deref());
    Ok(Json(state.catalog().browse_catalog(&active).await?))
}

/// `GET /api/products/type/{type}`
pub async fn products_by_type(
    State(state): State<AppState>,
    Path(type_name): Path<String>,
) -> Result<Json<Vec<ProductDetail>>> {
    Ok(Json(state.catalog().list_products_by_type(&type_name).await?))
}

/// `GET /api/products/{id}`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetail>> {
    let id = parse_product_id(&id)?;
    Ok(Json(state.catalog().get_product(id).await?))
}

/// `DELETE /api/products/{id}`
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let id = parse_product_id(&id)?;
    let deleted = state.catalog().delete_product(id).await?;
    Ok(Json(DeleteResponse {
        message: "Product deleted successfully",
        deleted,
    }))
}

// =============================================================================
// Variants, add-ons and pricing
// =============================================================================

/// `POST /api/products/variant`
pub async fn create_variant(
    State(state): State<AppState>,
    payload: std::result::Result<Json<VariantDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Variant>)> {
    let Json(draft) = payload?;
    let variant = state.catalog().add_variant(draft).await?;
    Ok((StatusCode::CREATED, Json(variant)))
}

/// `POST /api/products/addon`
pub async fn create_addon(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddonDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Addon>)> {
    let Json(draft) = payload?;
    let addon = state.catalog().add_addon(draft).await?;
    Ok((StatusCode::CREATED, Json(addon)))
}

/// `POST /api/products/{id}/price`
pub async fn price(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<PriceRequest>, JsonRejection>,
) -> Result<Json<PriceQuote>> {
    let id = parse_product_id(&id)?;
    let Json(request) = payload?;
    let quote = state
        .catalog()
        .price_configuration(id, request.variant_id, &request.addon_ids)
        .await?;
    Ok(Json(quote))
}
