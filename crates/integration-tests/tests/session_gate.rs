//! Session gating, sign-in paths and sign-out through the application root.

use std::time::Duration;

use harvest_home_core::ProductId;
use harvest_home_integration_tests::{CONFIRM_PREFIX, FakeAuth, GOOD_PASSWORD, TestApp};
use harvest_home_storefront::error::AppError;
use harvest_home_storefront::models::{SessionPhase, View};
use harvest_home_storefront::services::auth::AuthError;
use harvest_home_storefront::services::notifications::ToastKind;
use harvest_home_storefront::services::session::DEMO_EMAIL;
use harvest_home_storefront::state::{SIGN_UP_CONFIRMATION, SignUpResult};
use secrecy::SecretString;

fn password(p: &str) -> SecretString {
    SecretString::from(p)
}

// =============================================================================
// Mount
// =============================================================================

#[tokio::test]
async fn test_everything_is_locked_while_loading() {
    let app = TestApp::with_auth(FakeAuth::new());
    app.auth.delay_initial(Duration::from_millis(100));

    let state = app.state.clone();
    let mount = tokio::spawn(async move { state.mount().await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(app.state.session().await.phase, SessionPhase::Loading);
    assert!(matches!(
        app.state.catalog().await,
        Err(AppError::Locked(SessionPhase::Loading))
    ));
    assert!(matches!(
        app.state.add_to_cart(ProductId::new(101), 1).await,
        Err(AppError::Locked(SessionPhase::Loading))
    ));

    mount.await.unwrap();
    assert_eq!(app.state.session().await.phase, SessionPhase::Unauthenticated);
}

#[tokio::test]
async fn test_existing_session_is_restored_on_mount() {
    let app = TestApp::signed_in().await;

    let snapshot = app.state.session().await;
    assert_eq!(snapshot.phase, SessionPhase::Authenticated);
    assert_eq!(snapshot.email.as_deref(), Some("grower@example.com"));
    assert!(!snapshot.demo);

    let catalog = app.state.catalog().await.unwrap();
    assert_eq!(catalog.farms().len(), 3);
    assert!(catalog.status().loaded);
    assert!(!catalog.status().any_failed());
}

#[tokio::test]
async fn test_failed_session_lookup_means_signed_out() {
    let app = TestApp::with_auth(FakeAuth::new());
    app.auth.fail_initial();
    app.state.mount().await;

    assert_eq!(app.state.session().await.phase, SessionPhase::Unauthenticated);
    assert!(matches!(
        app.state.cart().await,
        Err(AppError::Locked(SessionPhase::Unauthenticated))
    ));
}

#[tokio::test]
async fn test_mount_is_idempotent() {
    let app = TestApp::signed_out().await;
    app.state.mount().await;

    assert!(app.state.is_mounted());
    assert_eq!(app.catalog.fetches(), (1, 1));
}

#[tokio::test]
async fn test_sign_in_during_slow_lookup_is_not_overwritten() {
    let app = TestApp::with_auth(FakeAuth::new());
    app.auth.delay_initial(Duration::from_millis(100));

    let state = app.state.clone();
    let mount = tokio::spawn(async move { state.mount().await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    app.state.sign_in_demo(None).await.unwrap();
    mount.await.unwrap();

    let snapshot = app.state.session().await;
    assert_eq!(snapshot.phase, SessionPhase::Authenticated);
    assert!(snapshot.demo);
}

// =============================================================================
// Sign-in paths
// =============================================================================

#[tokio::test]
async fn test_password_sign_in() {
    let app = TestApp::signed_out().await;

    let snapshot = app
        .state
        .sign_in("  shopper@example.com ", &password(GOOD_PASSWORD))
        .await
        .unwrap();

    assert_eq!(snapshot.phase, SessionPhase::Authenticated);
    assert_eq!(snapshot.email.as_deref(), Some("shopper@example.com"));
    assert_eq!(app.state.current_view().await.unwrap(), View::Home);
}

#[tokio::test]
async fn test_rejected_sign_in_leaves_session_unchanged() {
    let app = TestApp::signed_out().await;

    let err = app
        .state
        .sign_in("shopper@example.com", &password("wrong-password"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Auth(AuthError::Rejected(_))));
    assert_eq!(err.user_message(), "Invalid login credentials");
    assert_eq!(app.state.session().await.phase, SessionPhase::Unauthenticated);
}

#[tokio::test]
async fn test_sign_in_input_is_validated_locally() {
    let app = TestApp::signed_out().await;

    let bad_email = app
        .state
        .sign_in("not-an-email", &password(GOOD_PASSWORD))
        .await;
    assert!(matches!(
        bad_email,
        Err(AppError::Auth(AuthError::InvalidEmail(_)))
    ));

    let short = app.state.sign_in("shopper@example.com", &password("abc")).await;
    assert!(matches!(short, Err(AppError::Auth(AuthError::WeakPassword(_)))));
}

#[tokio::test]
async fn test_sign_up_requiring_confirmation() {
    let app = TestApp::signed_out().await;

    let result = app
        .state
        .sign_up(&format!("{CONFIRM_PREFIX}@example.com"), &password(GOOD_PASSWORD))
        .await
        .unwrap();

    match result {
        SignUpResult::ConfirmationRequired { message } => {
            assert_eq!(message, SIGN_UP_CONFIRMATION);
        }
        SignUpResult::SignedIn { .. } => panic!("expected confirmation"),
    }
    assert_eq!(app.state.session().await.phase, SessionPhase::Unauthenticated);
}

#[tokio::test]
async fn test_sign_up_with_session_signs_in() {
    let app = TestApp::signed_out().await;

    let result = app
        .state
        .sign_up("new@example.com", &password(GOOD_PASSWORD))
        .await
        .unwrap();

    assert!(matches!(result, SignUpResult::SignedIn { .. }));
    assert_eq!(app.state.session().await.phase, SessionPhase::Authenticated);
}

#[tokio::test]
async fn test_demo_sign_in_without_email() {
    let app = TestApp::signed_out().await;

    let snapshot = app.state.sign_in_demo(Some("   ")).await.unwrap();

    assert!(snapshot.demo);
    assert_eq!(snapshot.email.as_deref(), Some(DEMO_EMAIL));
    let toast = app.state.toast().unwrap();
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.text, "Welcome! You're exploring in demo mode.");
}

#[tokio::test]
async fn test_demo_sign_in_with_email() {
    let app = TestApp::signed_out().await;

    let snapshot = app.state.sign_in_demo(Some("visitor@example.com")).await.unwrap();

    assert_eq!(snapshot.email.as_deref(), Some("visitor@example.com"));
    assert_eq!(
        app.state.toast().unwrap().text,
        "Logged in as visitor@example.com"
    );
}

#[tokio::test]
async fn test_demo_sign_in_rejects_malformed_email() {
    let app = TestApp::signed_out().await;

    let result = app.state.sign_in_demo(Some("nope")).await;

    assert!(matches!(result, Err(AppError::Auth(AuthError::InvalidEmail(_)))));
    assert_eq!(app.state.session().await.phase, SessionPhase::Unauthenticated);
}

#[tokio::test]
async fn test_oauth_url_and_unknown_provider() {
    let app = TestApp::signed_out().await;

    let url = app.state.sign_in_with_oauth("google").unwrap();
    assert_eq!(url.host_str(), Some("auth.test"));

    let err = app.state.sign_in_with_oauth("myspace").unwrap_err();
    assert!(matches!(err, AppError::OAuth { .. }));
}

// =============================================================================
// Sign-out
// =============================================================================

#[tokio::test]
async fn test_sign_out_clears_cart_and_navigation() {
    let app = TestApp::signed_in().await;
    app.state.add_to_cart(ProductId::new(101), 2).await.unwrap();
    app.state.go(View::Browse).await.unwrap();

    let snapshot = app.state.sign_out().await;
    assert_eq!(snapshot.phase, SessionPhase::Unauthenticated);
    assert_eq!(app.auth.sign_out_calls(), 1);

    app.state.sign_in_demo(None).await.unwrap();
    assert!(app.state.cart().await.unwrap().lines.is_empty());
    assert_eq!(app.state.current_view().await.unwrap(), View::Home);
}

#[tokio::test]
async fn test_remote_sign_out_failure_still_signs_out_locally() {
    let app = TestApp::signed_in().await;
    app.auth.fail_sign_out();

    let snapshot = app.state.sign_out().await;

    assert_eq!(snapshot.phase, SessionPhase::Unauthenticated);
    assert_eq!(app.auth.sign_out_calls(), 1);
}

#[tokio::test]
async fn test_signing_out_when_signed_out_is_a_no_op() {
    let app = TestApp::signed_out().await;

    let snapshot = app.state.sign_out().await;

    assert_eq!(snapshot.phase, SessionPhase::Unauthenticated);
    assert_eq!(app.auth.sign_out_calls(), 0);
}
