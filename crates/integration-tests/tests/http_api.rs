//! The JSON API driven through the router, without a socket.

use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use harvest_home_integration_tests::{GOOD_PASSWORD, TestApp};
use harvest_home_storefront::app;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn call(
    harness: &TestApp,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app(harness.state.clone())
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_and_request_id() {
    let app = TestApp::signed_out().await;

    let response = harvest_home_storefront::app(app.state.clone())
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "req-42"
    );
}

#[tokio::test]
async fn test_locked_routes_until_sign_in() {
    let app = TestApp::signed_out().await;

    let (status, body) = call(&app, Method::GET, "/api/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "unauthenticated");

    let (status, body) = call(&app, Method::GET, "/api/cart", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Please sign in to continue.");
}

#[tokio::test]
async fn test_sign_in_then_shop() {
    let app = TestApp::signed_out().await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/sign-in",
        Some(json!({"email": "shopper@example.com", "password": GOOD_PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "authenticated");
    assert_eq!(body["email"], "shopper@example.com");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/cart/add",
        Some(json!({"product_id": 101, "quantity": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemCount"], 2);
    assert_eq!(body["open"], true);

    let (_, toast) = call(&app, Method::GET, "/api/toast", None).await;
    assert_eq!(toast["kind"], "info");

    let (status, body) = call(&app, Method::GET, "/api/checkout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], "14.98");

    let (status, _) = call(&app, Method::POST, "/api/checkout", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, Method::GET, "/api/view", None).await;
    assert_eq!(body["screen"], "home");
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = TestApp::signed_out().await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/sign-in",
        Some(json!({"email": "shopper@example.com", "password": "nope-nope"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid login credentials");
}

#[tokio::test]
async fn test_demo_sign_in_without_body() {
    let app = TestApp::signed_out().await;

    let (status, body) = call(&app, Method::POST, "/api/auth/demo", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["demo"], true);
}

#[tokio::test]
async fn test_oauth_redirect_url() {
    let app = TestApp::signed_out().await;

    let (status, body) = call(&app, Method::GET, "/api/auth/oauth/google", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["url"].as_str().unwrap().starts_with("https://auth.test/"));

    let (status, _) = call(&app, Method::GET, "/api/auth/oauth/github", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_navigation_is_lenient() {
    let app = TestApp::signed_in().await;

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/view",
        Some(json!({"view": {"name": "farm", "payload": 2}})),
    )
    .await;
    assert_eq!(body["screen"], "farm");
    assert_eq!(body["farm"]["id"], 2);

    let (_, body) = call(
        &app,
        Method::POST,
        "/api/view",
        Some(json!({"view": {"name": "wishlist"}})),
    )
    .await;
    assert_eq!(body["screen"], "home");
}

#[tokio::test]
async fn test_browse_query() {
    let app = TestApp::signed_in().await;

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/products?category=Bakery&sort=price-desc",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().unwrap();
    assert!(!products.is_empty());
    assert!(products.iter().all(|p| p["category"] == "Bakery"));

    let (status, _) = call(&app, Method::GET, "/api/products?category=Seafood", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quantity_text_is_validated() {
    let app = TestApp::signed_in().await;
    call(
        &app,
        Method::POST,
        "/api/cart/add",
        Some(json!({"product_id": 101})),
    )
    .await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/cart/quantity",
        Some(json!({"product_id": 101, "quantity": "lots"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/cart/quantity",
        Some(json!({"product_id": 101, "quantity": "4"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["itemCount"], 4);
}

#[tokio::test]
async fn test_sign_out_route() {
    let app = TestApp::signed_in().await;

    let (status, body) = call(&app, Method::POST, "/api/auth/sign-out", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "unauthenticated");
    assert_eq!(app.auth.sign_out_calls(), 1);
}
