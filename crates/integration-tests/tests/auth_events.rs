//! Changes pushed by the auth service and applied by the auth listener.

use harvest_home_core::ProductId;
use harvest_home_integration_tests::{TestApp, remote_session};
use harvest_home_storefront::models::{SessionPhase, View};
use harvest_home_storefront::services::auth::{AuthChangeKind, OAuthCallback};

fn callback(token: &str) -> OAuthCallback {
    OAuthCallback {
        access_token: token.to_string(),
        refresh_token: "refresh".to_string(),
        expires_in: Some(3600),
    }
}

#[tokio::test]
async fn test_oauth_completion_signs_in_through_listener() {
    let app = TestApp::signed_out().await;

    app.state.complete_oauth(callback("access")).await.unwrap();
    app.wait_for_phase(SessionPhase::Authenticated).await;

    let snapshot = app.state.session().await;
    assert_eq!(snapshot.email.as_deref(), Some("oauth@example.com"));
    assert!(!snapshot.demo);
}

#[tokio::test]
async fn test_rejected_oauth_tokens_surface_provider_message() {
    let app = TestApp::signed_out().await;

    let err = app.state.complete_oauth(callback("")).await.unwrap_err();

    assert_eq!(
        err.user_message(),
        "Google sign in failed. Please try demo mode."
    );
    assert_eq!(app.state.session().await.phase, SessionPhase::Unauthenticated);
}

#[tokio::test]
async fn test_pushed_sign_out_clears_cart_and_resets_view() {
    let app = TestApp::signed_in().await;
    app.state.add_to_cart(ProductId::new(102), 3).await.unwrap();
    app.state.go(View::Farms).await.unwrap();

    app.auth.emit(AuthChangeKind::SignedOut, None);
    app.wait_for_phase(SessionPhase::Unauthenticated).await;

    app.state.sign_in_demo(None).await.unwrap();
    assert!(app.state.cart().await.unwrap().lines.is_empty());
    assert_eq!(app.state.current_view().await.unwrap(), View::Home);
}

#[tokio::test]
async fn test_token_refresh_keeps_view_and_cart() {
    let app = TestApp::signed_in().await;
    app.state.add_to_cart(ProductId::new(101), 1).await.unwrap();
    app.state.go(View::Browse).await.unwrap();

    app.auth.emit(
        AuthChangeKind::TokenRefreshed,
        Some(remote_session("grower@example.com")),
    );
    // Flush the listener with a change that is observable.
    app.auth.emit(
        AuthChangeKind::UserUpdated,
        Some(remote_session("renamed@example.com")),
    );
    for _ in 0..200 {
        if app.state.session().await.email.as_deref() == Some("renamed@example.com") {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    assert_eq!(
        app.state.session().await.email.as_deref(),
        Some("renamed@example.com")
    );
    assert_eq!(app.state.current_view().await.unwrap(), View::Browse);
    assert_eq!(app.state.cart().await.unwrap().item_count, 1);
}

#[tokio::test]
async fn test_unmount_stops_listening() {
    let app = TestApp::signed_out().await;
    app.state.unmount();
    assert!(!app.state.is_mounted());

    app.auth.emit(
        AuthChangeKind::SignedIn,
        Some(remote_session("late@example.com")),
    );
    tokio::time::sleep(std::time::Duration::from_millis(30)).await;

    assert_eq!(app.state.session().await.phase, SessionPhase::Unauthenticated);
}
