//! HTTP route handlers for the storefront.
//!
//! Every handler is a thin JSON shell over an [`AppState`] operation.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/session                  - Session phase, email, demo flag
//!
//! # Auth
//! POST /api/auth/sign-in             - Password sign-in
//! POST /api/auth/sign-up             - Create an account
//! GET  /api/auth/oauth/{provider}    - OAuth authorize URL
//! POST /api/auth/oauth/callback      - Tokens from the OAuth redirect
//! POST /api/auth/demo                - Demo sign-in
//! POST /api/auth/sign-out            - Sign out
//!
//! # Catalog (requires session)
//! GET  /api/catalog                  - Farms, products, load status
//! POST /api/catalog/reload           - Retry a failed load
//! GET  /api/products?category=&sort= - Browse listing
//! GET  /api/farms/{id}/products      - One farm's products
//!
//! # Navigation (requires session)
//! GET  /api/view                     - Resolved current screen
//! POST /api/view                     - Navigate
//! GET  /api/toast                    - Current toast
//! DELETE /api/toast                  - Dismiss toast
//!
//! # Cart and checkout (requires session)
//! GET  /api/cart
//! POST /api/cart/add | /quantity | /clear | /open | /close | /checkout
//! GET  /api/checkout                 - Order summary
//! POST /api/checkout                 - Place order
//!
//! # Recipes (requires session)
//! POST /api/recipes/ideas
//! POST /api/recipes/assistant
//! POST /api/recipes/assistant/add
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod recipes;
pub mod view;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-up", post(auth::sign_up))
        .route("/oauth/callback", post(auth::oauth_callback))
        .route("/oauth/{provider}", get(auth::oauth_url))
        .route("/demo", post(auth::demo))
        .route("/sign-out", post(auth::sign_out))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/quantity", post(cart::set_quantity))
        .route("/clear", post(cart::clear))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
        .route("/checkout", post(cart::proceed_to_checkout))
}

/// Create the recipe routes router.
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/ideas", post(recipes::ideas))
        .route("/assistant", post(recipes::assistant))
        .route("/assistant/add", post(recipes::add_to_cart))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/session", get(auth::session))
        .nest("/api/auth", auth_routes())
        // Catalog
        .route("/api/catalog", get(catalog::show))
        .route("/api/catalog/reload", post(catalog::reload))
        .route("/api/products", get(catalog::products))
        .route("/api/farms/{id}/products", get(catalog::farm_products))
        // Navigation and notifications
        .route("/api/view", get(view::show).post(view::navigate))
        .route("/api/toast", get(view::toast).delete(view::dismiss_toast))
        // Cart and checkout
        .nest("/api/cart", cart_routes())
        .route(
            "/api/checkout",
            get(cart::checkout_summary).post(cart::place_order),
        )
        .nest("/api/recipes", recipe_routes())
}
