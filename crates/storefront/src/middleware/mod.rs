//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (correlation ID on span, Sentry scope and response)

pub mod request_id;

pub use request_id::{RequestId, request_id_middleware};
