//! Integration tests for Printfuse.
//!
//! # Running Tests
//!
//! ```bash
//! # HTTP tests against the in-memory store
//! cargo test -p printfuse-integration-tests
//!
//! # Store tests against PostgreSQL (migrated database required)
//! CATALOG_DATABASE_URL=postgres://localhost/printfuse_test \
//!     cargo test -p printfuse-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `catalog_api` - End-to-end HTTP tests through the full router
//! - `postgres_store` - `PgCatalogStore` against a real database

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use printfuse_storefront::{
    config::StorefrontConfig,
    db::{CatalogStore, InMemoryCatalogStore},
    state::AppState,
};

/// The full application router over a fresh store.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
}

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// App backed by an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryCatalogStore::new()))
    }

    /// App backed by `store`.
    #[must_use]
    pub fn with_store(store: Arc<dyn CatalogStore>) -> Self {
        let state = AppState::new(StorefrontConfig::default(), store);
        Self {
            router: printfuse_storefront::app(state),
        }
    }

    /// Send a request with an optional JSON body.
    ///
    /// Bodies that are not JSON come back as a JSON string.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    pub async fn send(&self, method: Method, uri: &str, body: Option<&Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("valid request");

        self.send_request(request).await
    }

    /// Send a prepared request.
    ///
    /// # Panics
    ///
    /// Panics if the router fails or the body cannot be read.
    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("readable body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// POST and return the `id` of the created record.
    ///
    /// # Panics
    ///
    /// Panics unless the response is `201 Created` with a numeric `id`.
    pub async fn create(&self, uri: &str, body: &Value) -> i64 {
        let response = self.post(uri, body).await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "POST {uri} failed: {}",
            response.body
        );
        response.body["id"].as_i64().expect("numeric id")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
