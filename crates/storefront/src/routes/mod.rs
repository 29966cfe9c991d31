//! HTTP route handlers for the catalog API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /ping                          - "pong"
//! GET    /health                        - Liveness
//! GET    /health/ready                  - Readiness (store reachable)
//!
//! # Product types
//! GET    /api/products/types            - All product types
//! POST   /api/products/types            - Create a product type
//!
//! # Products
//! POST   /api/products                  - Create a product
//! GET    /api/products                  - All products with details
//! GET    /api/products/catalog?type=X   - Grouped browse view
//! GET    /api/products/type/{type}      - Products of one type
//! GET    /api/products/{id}             - One product
//! DELETE /api/products/{id}             - Delete a product
//!
//! # Variants, add-ons, pricing
//! POST   /api/products/variant          - Add a variant
//! POST   /api/products/addon            - Add an add-on
//! POST   /api/products/{id}/price       - Price a selection
//! ```

pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product API router (mounted at `/api/products`).
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list_products).post(products::create_product))
        .route(
            "/types",
            get(products::list_types).post(products::create_type),
        )
        .route("/catalog", get(products::catalog))
        .route("/type/{type}", get(products::products_by_type))
        .route("/variant", post(products::create_variant))
        .route("/addon", post(products::create_addon))
        .route(
            "/{id}",
            get(products::get_product).delete(products::delete_product),
        )
        .route("/{id}/price", post(products::price))
}

/// Create all routes for the catalog API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(health::ping))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/products", product_routes())
}
