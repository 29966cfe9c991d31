//! End-to-end tests for the catalog HTTP API.
//!
//! Each test builds the full router (middleware included) over a fresh
//! in-memory store and drives it with `tower::ServiceExt::oneshot`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};

use printfuse_integration_tests::TestApp;

fn product_body(name: &str, product_type_id: i64) -> Value {
    json!({
        "name": name,
        "description": format!("{name} description"),
        "productTypeId": product_type_id,
        "images": [format!("https://cdn.example.com/{name}.jpg")]
    })
}

/// A Food type with a Burger (5.00) and a Cheese add-on (1.00).
struct BurgerFixture {
    app: TestApp,
    product_id: i64,
    variant_id: i64,
    cheese_id: i64,
}

async fn burger_fixture() -> BurgerFixture {
    let app = TestApp::new();
    let food = app.create("/api/products/types", &json!({"name": "Food"})).await;
    let product_id = app
        .create("/api/products", &product_body("Burger", food))
        .await;
    let variant_id = app
        .create(
            "/api/products/variant",
            &json!({
                "productId": product_id,
                "size": "Regular",
                "price": "5.00",
                "stock": 10,
                "sku": "BURGER-REG"
            }),
        )
        .await;
    let cheese_id = app
        .create(
            "/api/products/addon",
            &json!({"productId": product_id, "name": "Cheese", "price": "1.00"}),
        )
        .await;

    BurgerFixture {
        app,
        product_id,
        variant_id,
        cheese_id,
    }
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_ping_and_health() {
    let app = TestApp::new();

    let ping = app.get("/ping").await;
    assert_eq!(ping.status, StatusCode::OK);
    assert_eq!(ping.body, "pong");

    assert_eq!(app.get("/health").await.status, StatusCode::OK);
    assert_eq!(app.get("/health/ready").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/ping")
        .header("x-request-id", "trace-me")
        .body(Body::empty())
        .unwrap();

    let response = app.send_request(request).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers["x-request-id"], "trace-me");

    let generated = app.get("/ping").await;
    assert!(generated.headers.contains_key("x-request-id"));
}

// ============================================================================
// Pricing
// ============================================================================

#[tokio::test]
async fn test_burger_with_cheese_totals_six() {
    let f = burger_fixture().await;

    let quote = f
        .app
        .post(
            &format!("/api/products/{}/price", f.product_id),
            &json!({"variantId": f.variant_id, "addonIds": [f.cheese_id]}),
        )
        .await;

    assert_eq!(quote.status, StatusCode::OK, "{}", quote.body);
    assert_eq!(quote.body["total"], "6.00");
    assert_eq!(quote.body["display"], "6.00");
    assert_eq!(quote.body["productId"], f.product_id);
    assert_eq!(quote.body["variantId"], f.variant_id);
    assert_eq!(quote.body["addonIds"], json!([f.cheese_id]));
    assert_eq!(quote.body["variantLabel"], "Regular");
    assert_eq!(quote.body["inStock"], true);
    assert_eq!(quote.body["image"], "https://cdn.example.com/Burger.jpg");
}

#[tokio::test]
async fn test_numeric_prices_keep_their_scale() {
    let app = TestApp::new();
    let food = app.create("/api/products/types", &json!({"name": "Food"})).await;
    let burger = app
        .create("/api/products", &product_body("Burger", food))
        .await;
    let body: Value = serde_json::from_str(&format!(
        r#"{{"productId": {burger}, "price": 5.00, "stock": 10, "sku": "BURGER-REG"}}"#
    ))
    .unwrap();
    let variant = app.create("/api/products/variant", &body).await;
    let body: Value = serde_json::from_str(&format!(
        r#"{{"productId": {burger}, "name": "Cheese", "price": 1.00}}"#
    ))
    .unwrap();
    let cheese = app.create("/api/products/addon", &body).await;

    let quote = app
        .post(
            &format!("/api/products/{burger}/price"),
            &json!({"variantId": variant, "addonIds": [cheese]}),
        )
        .await;

    assert_eq!(quote.status, StatusCode::OK, "{}", quote.body);
    assert_eq!(quote.body["total"], "6.00");
    assert_eq!(quote.body["display"], "6.00");

    let detail = app.get(&format!("/api/products/{burger}")).await;
    assert_eq!(detail.body["variants"][0]["price"], "5.00");
}

#[tokio::test]
async fn test_price_is_independent_of_addon_order() {
    let f = burger_fixture().await;
    let bacon_id = f
        .app
        .create(
            "/api/products/addon",
            &json!({"productId": f.product_id, "name": "Bacon", "price": "1.50"}),
        )
        .await;
    let uri = format!("/api/products/{}/price", f.product_id);

    let forward = f
        .app
        .post(
            &uri,
            &json!({"variantId": f.variant_id, "addonIds": [f.cheese_id, bacon_id]}),
        )
        .await;
    let reverse = f
        .app
        .post(
            &uri,
            &json!({"variantId": f.variant_id, "addonIds": [bacon_id, f.cheese_id]}),
        )
        .await;

    assert_eq!(forward.body["total"], "7.50");
    assert_eq!(forward.body["total"], reverse.body["total"]);
}

#[tokio::test]
async fn test_price_without_variant_is_rejected() {
    let f = burger_fixture().await;

    let response = f
        .app
        .post(
            &format!("/api/products/{}/price", f.product_id),
            &json!({"addonIds": [f.cheese_id]}),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["kind"], "no_variant_selected");
}

#[tokio::test]
async fn test_price_with_foreign_addon_is_rejected() {
    let f = burger_fixture().await;
    let food_type = f.app.get("/api/products/types").await.body[0]["id"].clone();
    let fries = f
        .app
        .create("/api/products", &product_body("Fries", food_type.as_i64().unwrap()))
        .await;
    let ketchup = f
        .app
        .create(
            "/api/products/addon",
            &json!({"productId": fries, "name": "Ketchup", "price": "0.25"}),
        )
        .await;

    let response = f
        .app
        .post(
            &format!("/api/products/{}/price", f.product_id),
            &json!({"variantId": f.variant_id, "addonIds": [ketchup]}),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["kind"], "invalid_addon");
}

// ============================================================================
// Add-on eligibility
// ============================================================================

#[tokio::test]
async fn test_apparel_rejects_addons() {
    let app = TestApp::new();
    let apparel = app
        .create("/api/products/types", &json!({"name": "Apparel"}))
        .await;
    let shirt = app
        .create("/api/products", &product_body("T-Shirt", apparel))
        .await;

    let response = app
        .post(
            "/api/products/addon",
            &json!({"productId": shirt, "name": "Gift wrap", "price": "2.00"}),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["kind"], "ineligible_category");

    let detail = app.get(&format!("/api/products/{shirt}")).await;
    assert_eq!(detail.body["addons"], json!([]));
}

// ============================================================================
// Browsing
// ============================================================================

#[tokio::test]
async fn test_catalog_view_groups_and_filters() {
    let app = TestApp::new();
    let food = app.create("/api/products/types", &json!({"name": "Food"})).await;
    let apparel = app
        .create("/api/products/types", &json!({"name": "Apparel"}))
        .await;
    for (name, type_id) in [("Burger", food), ("T-Shirt", apparel), ("Fries", food)] {
        app.create("/api/products", &product_body(name, type_id)).await;
    }

    let all = app.get("/api/products/catalog").await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["activeType"], "All");
    assert_eq!(all.body["filters"], json!(["All", "Food", "Apparel"]));
    let groups = all.body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["type"], "Food");
    let food_names: Vec<&str> = groups[0]["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(food_names, ["Burger", "Fries"]);

    let apparel_only = app.get("/api/products/catalog?type=Apparel").await;
    assert_eq!(apparel_only.body["activeType"], "Apparel");
    let groups = apparel_only.body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["type"], "Apparel");
}

#[tokio::test]
async fn test_products_by_type_is_exact() {
    let app = TestApp::new();
    let food = app.create("/api/products/types", &json!({"name": "Food"})).await;
    app.create("/api/products", &product_body("Burger", food)).await;

    let exact = app.get("/api/products/type/Food").await;
    assert_eq!(exact.body.as_array().unwrap().len(), 1);

    let other_case = app.get("/api/products/type/food").await;
    assert_eq!(other_case.status, StatusCode::OK);
    assert_eq!(other_case.body, json!([]));
}

#[tokio::test]
async fn test_listing_is_repeatable() {
    let f = burger_fixture().await;

    let first = f.app.get("/api/products").await;
    let second = f.app.get("/api/products").await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, second.body);
    let burger = &first.body[0];
    assert_eq!(burger["productType"]["name"], "Food");
    assert_eq!(burger["variants"][0]["sku"], "BURGER-REG");
    assert_eq!(burger["addons"][0]["name"], "Cheese");
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let app = TestApp::new();

    let get = app.get("/api/products/999").await;
    assert_eq!(get.status, StatusCode::NOT_FOUND);
    assert_eq!(get.body["kind"], "not_found");

    assert_eq!(app.delete("/api/products/999").await.status, StatusCode::NOT_FOUND);

    let bad_id = app.get("/api/products/burger").await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_name_names_field() {
    let app = TestApp::new();
    let food = app.create("/api/products/types", &json!({"name": "Food"})).await;

    let response = app
        .post(
            "/api/products",
            &json!({"description": "Nameless", "productTypeId": food, "images": []}),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["kind"], "validation");
    assert_eq!(response.body["field"], "name");
}

#[tokio::test]
async fn test_duplicate_sku_conflicts() {
    let f = burger_fixture().await;

    let response = f
        .app
        .post(
            "/api/products/variant",
            &json!({
                "productId": f.product_id,
                "size": "Large",
                "price": "7.00",
                "stock": 3,
                "sku": "BURGER-REG"
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["kind"], "conflict");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/products/types")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app.send_request(request).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["kind"], "bad_request");
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn test_delete_cascades() {
    let f = burger_fixture().await;

    let response = f.app.delete(&format!("/api/products/{}", f.product_id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Product deleted successfully");
    assert_eq!(response.body["deleted"]["name"], "Burger");

    let listing: Value = f.app.get("/api/products").await.body;
    assert_eq!(listing, json!([]));

    let reprice = f
        .app
        .post(
            &format!("/api/products/{}/price", f.product_id),
            &json!({"variantId": f.variant_id, "addonIds": []}),
        )
        .await;
    assert_eq!(reprice.status, StatusCode::NOT_FOUND);
}
