//! Harvest & Home storefront library.
//!
//! Session gating, catalog, cart, navigation, toasts and the recipe
//! advisor, served as a JSON API. Built as a library so the router can be
//! driven directly from integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gemini;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod supabase;

use axum::{Router, body::Body, http::Request, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::state::AppState;

/// Build the full application router: API routes, `/health`, request IDs
/// and request tracing. Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(
            ServiceBuilder::new()
                // Request span (outer, so the request ID lands on it)
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = tracing::field::Empty,
                        )
                    }),
                )
                .layer(axum::middleware::from_fn(
                    middleware::request_id_middleware,
                )),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
