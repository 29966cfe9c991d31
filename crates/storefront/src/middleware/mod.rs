//! HTTP middleware stack for the catalog API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, transaction)
//! 2. CORS
//! 3. `TraceLayer` (request span with a `request_id` field)
//! 4. Request ID (fill the span field, echo `x-request-id`)

pub mod cors;
pub mod request_id;

pub use cors::cors_layer;
pub use request_id::{REQUEST_ID_HEADER, make_request_span, request_id_middleware};
