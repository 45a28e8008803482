//! Catalog, cart, navigation and checkout through the application root.

use harvest_home_core::{Category, FarmId, Price, ProductId};
use harvest_home_integration_tests::TestApp;
use harvest_home_storefront::error::AppError;
use harvest_home_storefront::models::View;
use harvest_home_storefront::services::catalog::{BrowseFilter, SortKey};
use harvest_home_storefront::services::navigation::Screen;
use harvest_home_storefront::services::notifications::ToastKind;

const TOMATOES: ProductId = ProductId::new(101);
const CARROTS: ProductId = ProductId::new(102);

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_browse_filters_and_sorts() {
    let app = TestApp::signed_in().await;

    let dairy = app
        .state
        .browse(BrowseFilter::Only(Category::Dairy), SortKey::PriceAsc)
        .await
        .unwrap();

    assert!(!dairy.is_empty());
    assert!(dairy.iter().all(|p| p.category == Category::Dairy));
    assert!(dairy.windows(2).all(|w| w[0].price <= w[1].price));
}

#[tokio::test]
async fn test_farm_products_and_unknown_farm() {
    let app = TestApp::signed_in().await;

    let products = app.state.farm_products(FarmId::new(1)).await.unwrap();
    assert!(products.iter().all(|p| p.farm_id == FarmId::new(1)));
    assert_eq!(products.first().map(|p| p.id), Some(TOMATOES));

    let missing = app.state.farm_products(FarmId::new(999)).await;
    assert!(matches!(missing, Err(AppError::NotFound(msg)) if msg == "Farm not found"));
}

#[tokio::test]
async fn test_partial_load_failure_and_reload() {
    let app = TestApp::with_auth(harvest_home_integration_tests::FakeAuth::with_session(
        "grower@example.com",
    ));
    app.catalog.set_fail_farms(true);
    app.state.mount().await;

    let catalog = app.state.catalog().await.unwrap();
    assert!(catalog.status().farms_failed);
    assert!(!catalog.status().products_failed);
    assert!(catalog.farms().is_empty());
    assert!(!catalog.products().is_empty());

    app.catalog.set_fail_farms(false);
    let status = app.state.reload_catalog().await.unwrap();
    assert!(!status.any_failed());
    assert_eq!(app.state.catalog().await.unwrap().farms().len(), 3);
}

// =============================================================================
// Navigation
// =============================================================================

#[tokio::test]
async fn test_home_screen_highlights() {
    let app = TestApp::signed_in().await;

    match app.state.screen().await.unwrap() {
        Screen::Home { farms, featured } => {
            assert_eq!(farms.len(), 3);
            assert_eq!(featured.len(), 4);
            assert_eq!(featured.first().map(|p| p.id), Some(TOMATOES));
        }
        other => panic!("expected home, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_product_view_resolves_to_not_found() {
    let app = TestApp::signed_in().await;

    let screen = app.state.go(View::Product(ProductId::new(4242))).await.unwrap();

    assert!(matches!(screen, Screen::NotFound { message } if message == "Product not found"));
}

#[tokio::test]
async fn test_product_view_includes_farm() {
    let app = TestApp::signed_in().await;

    let screen = app.state.go(View::Product(CARROTS)).await.unwrap();

    match screen {
        Screen::Product { product, farm } => {
            assert_eq!(product.id, CARROTS);
            assert_eq!(farm.map(|f| f.id), Some(FarmId::new(1)));
        }
        other => panic!("expected product, got {other:?}"),
    }
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_add_to_cart_opens_panel_and_toasts() {
    let app = TestApp::signed_in().await;

    let cart = app.state.add_to_cart(TOMATOES, 2).await.unwrap();

    assert!(cart.open);
    assert_eq!(cart.item_count, 2);
    assert_eq!(cart.subtotal, Price::from_cents(998));
    let toast = app.state.toast().unwrap();
    assert_eq!(toast.kind, ToastKind::Info);
    assert_eq!(toast.text, "Heirloom Tomatoes added to cart");
}

#[tokio::test]
async fn test_adding_twice_merges_lines() {
    let app = TestApp::signed_in().await;

    app.state.add_to_cart(TOMATOES, 1).await.unwrap();
    let cart = app.state.add_to_cart(TOMATOES, 0).await.unwrap();

    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.item_count, 2);
}

#[tokio::test]
async fn test_add_unknown_product() {
    let app = TestApp::signed_in().await;

    let result = app.state.add_to_cart(ProductId::new(4242), 1).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert!(app.state.cart().await.unwrap().lines.is_empty());
}

#[tokio::test]
async fn test_manual_quantity_entry() {
    let app = TestApp::signed_in().await;
    app.state.add_to_cart(TOMATOES, 1).await.unwrap();
    app.state.add_to_cart(CARROTS, 1).await.unwrap();

    let cart = app.state.set_cart_quantity(TOMATOES, " 5 ").await.unwrap();
    assert_eq!(cart.item_count, 6);

    let rejected = app.state.set_cart_quantity(TOMATOES, "five").await;
    assert!(matches!(rejected, Err(AppError::Quantity(_))));
    assert_eq!(app.state.cart().await.unwrap().item_count, 6);

    let cart = app.state.set_cart_quantity(CARROTS, "0").await.unwrap();
    assert_eq!(cart.lines.len(), 1);
    assert_eq!(cart.item_count, 5);
}

#[tokio::test]
async fn test_cart_panel_open_close() {
    let app = TestApp::signed_in().await;

    assert!(app.state.open_cart().await.unwrap().open);
    assert!(!app.state.close_cart().await.unwrap().open);
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_proceed_to_checkout_closes_panel() {
    let app = TestApp::signed_in().await;
    app.state.add_to_cart(TOMATOES, 1).await.unwrap();

    let screen = app.state.proceed_to_checkout().await.unwrap();

    assert!(matches!(screen, Screen::Checkout { .. }));
    assert!(!app.state.cart().await.unwrap().open);
    assert_eq!(app.state.current_view().await.unwrap(), View::Checkout);
}

#[tokio::test]
async fn test_place_order() {
    let app = TestApp::signed_in().await;
    app.state.add_to_cart(TOMATOES, 2).await.unwrap();
    app.state.go(View::Checkout).await.unwrap();

    let summary = app.state.place_order().await.unwrap();

    assert_eq!(summary.subtotal, Price::from_cents(998));
    assert_eq!(summary.shipping, Price::from_cents(500));
    assert_eq!(summary.total, Price::from_cents(1498));
    assert!(app.state.cart().await.unwrap().lines.is_empty());
    assert_eq!(app.state.current_view().await.unwrap(), View::Home);
    let toast = app.state.toast().unwrap();
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.text, "Order placed successfully!");
}

#[tokio::test]
async fn test_place_order_with_empty_cart() {
    let app = TestApp::signed_in().await;
    app.state.go(View::Checkout).await.unwrap();

    let result = app.state.place_order().await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert_eq!(app.state.current_view().await.unwrap(), View::Checkout);
    assert!(app.state.toast().is_none());
}

#[tokio::test]
async fn test_toast_dismissal() {
    let app = TestApp::signed_in().await;
    app.state.add_to_cart(TOMATOES, 1).await.unwrap();

    app.state.dismiss_toast();

    assert!(app.state.toast().is_none());
}
