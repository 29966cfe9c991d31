//! CORS policy for browser clients of the catalog API.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::REQUEST_ID_HEADER;

/// Build the CORS layer for the configured origins.
///
/// An empty list allows any origin. Entries that are not valid header values
/// are skipped with a warning.
#[must_use]
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| {
                HeaderValue::from_str(origin)
                    .inspect_err(|_| tracing::warn!(%origin, "Ignoring invalid CORS origin"))
                    .ok()
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, header::ACCESS_CONTROL_ALLOW_ORIGIN},
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    async fn allowed_origin(origins: &[String], origin: &str) -> Option<HeaderValue> {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(origins));
        let response = app
            .oneshot(
                Request::get("/")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).cloned()
    }

    #[tokio::test]
    async fn test_any_origin_when_unconfigured() {
        let header = allowed_origin(&[], "http://localhost:5173").await;
        assert_eq!(header.unwrap(), "*");
    }

    #[tokio::test]
    async fn test_configured_origins_only() {
        let origins = vec!["https://shop.example.com".to_string()];
        assert_eq!(
            allowed_origin(&origins, "https://shop.example.com")
                .await
                .unwrap(),
            "https://shop.example.com"
        );
        assert!(allowed_origin(&origins, "https://evil.example.com")
            .await
            .is_none());
    }
}
