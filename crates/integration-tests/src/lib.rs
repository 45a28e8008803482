//! Integration tests for the Harvest & Home storefront.
//!
//! Provides in-process fakes for the three external collaborators (auth
//! service, catalog source, content generator) so the whole application
//! root and router can be exercised without network access.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p harvest-home-integration-tests
//! ```

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use harvest_home_core::{Email, Farm, Product};
use harvest_home_storefront::gemini::GeminiError;
use harvest_home_storefront::models::{RemoteSession, Session, SessionPhase, SessionTokens};
use harvest_home_storefront::services::auth::{
    AuthChange, AuthChangeKind, AuthError, AuthEvents, AuthProvider, AuthSubscription,
    OAuthCallback, OAuthProvider, SignUpOutcome,
};
use harvest_home_storefront::services::catalog::{CatalogError, CatalogSource, seed};
use harvest_home_storefront::services::recipes::ContentGenerator;
use harvest_home_storefront::state::AppState;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

/// Password the fake auth service accepts.
pub const GOOD_PASSWORD: &str = "correct-horse";

/// Sign-ups for addresses starting with this need confirming first.
pub const CONFIRM_PREFIX: &str = "confirm";

/// A remote session as the hosted service would issue it.
#[must_use]
pub fn remote_session(email: &str) -> Session {
    Session::Remote(RemoteSession {
        user_id: format!("user-{email}"),
        email: email.to_string(),
        issued_at: Utc::now(),
        tokens: SessionTokens {
            access_token: SecretString::from("access"),
            refresh_token: SecretString::from("refresh"),
            expires_at: None,
        },
    })
}

// =============================================================================
// Auth
// =============================================================================

/// Scripted stand-in for the hosted auth service.
#[derive(Default)]
pub struct FakeAuth {
    events: AuthEvents,
    initial: Mutex<Option<Session>>,
    initial_delay: Mutex<Option<Duration>>,
    fail_initial: AtomicBool,
    fail_sign_out: AtomicBool,
    sign_outs: AtomicUsize,
}

impl FakeAuth {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The service already holds a session at mount time.
    #[must_use]
    pub fn with_session(email: &str) -> Arc<Self> {
        let auth = Self::default();
        *auth.initial.lock().unwrap() = Some(remote_session(email));
        Arc::new(auth)
    }

    pub fn delay_initial(&self, delay: Duration) {
        *self.initial_delay.lock().unwrap() = Some(delay);
    }

    pub fn fail_initial(&self) {
        self.fail_initial.store(true, Ordering::SeqCst);
    }

    pub fn fail_sign_out(&self) {
        self.fail_sign_out.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn sign_out_calls(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }

    /// Push an out-of-band change, as a token refresh or expiry would.
    pub fn emit(&self, kind: AuthChangeKind, session: Option<Session>) {
        self.events.emit(AuthChange { kind, session });
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        let delay = *self.initial_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_initial.load(Ordering::SeqCst) {
            return Err(AuthError::Rejected("session lookup failed".to_string()));
        }
        Ok(self.initial.lock().unwrap().clone())
    }

    fn subscribe(&self) -> AuthSubscription {
        self.events.subscribe()
    }

    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Session, AuthError> {
        if password.expose_secret() == GOOD_PASSWORD {
            Ok(remote_session(email.as_str()))
        } else {
            Err(AuthError::Rejected("Invalid login credentials".to_string()))
        }
    }

    async fn sign_up(
        &self,
        email: &Email,
        _password: &SecretString,
    ) -> Result<SignUpOutcome, AuthError> {
        if email.as_str().starts_with(CONFIRM_PREFIX) {
            Ok(SignUpOutcome::ConfirmationRequired)
        } else {
            Ok(SignUpOutcome::SignedIn(remote_session(email.as_str())))
        }
    }

    fn oauth_url(&self, provider: OAuthProvider) -> Result<Url, AuthError> {
        Ok(Url::parse(&format!(
            "https://auth.test/authorize?provider={provider}"
        ))
        .unwrap())
    }

    async fn complete_oauth(&self, callback: OAuthCallback) -> Result<(), AuthError> {
        if callback.access_token.is_empty() {
            return Err(AuthError::Rejected("missing token".to_string()));
        }
        self.emit(
            AuthChangeKind::SignedIn,
            Some(remote_session("oauth@example.com")),
        );
        Ok(())
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), AuthError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(AuthError::Rejected("network down".to_string()));
        }
        Ok(())
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Seed catalog with switchable failures and fetch counters.
#[derive(Default)]
pub struct FakeCatalog {
    fail_farms: AtomicBool,
    fail_products: AtomicBool,
    farm_fetches: AtomicUsize,
    product_fetches: AtomicUsize,
}

impl FakeCatalog {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_fail_farms(&self, fail: bool) {
        self.fail_farms.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_products(&self, fail: bool) {
        self.fail_products.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn fetches(&self) -> (usize, usize) {
        (
            self.farm_fetches.load(Ordering::SeqCst),
            self.product_fetches.load(Ordering::SeqCst),
        )
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn fetch_farms(&self) -> Result<Vec<Farm>, CatalogError> {
        self.farm_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_farms.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable("farms offline".to_string()));
        }
        Ok(seed::farms())
    }

    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        self.product_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_products.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable("products offline".to_string()));
        }
        Ok(seed::products())
    }
}

// =============================================================================
// Content generation
// =============================================================================

/// Returns a fixed body, or fails when none is set. Records prompts.
#[derive(Default)]
pub struct CannedGenerator {
    body: Mutex<Option<String>>,
    prompts: Mutex<Vec<String>>,
}

impl CannedGenerator {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond_with(&self, body: serde_json::Value) {
        *self.body.lock().unwrap() = Some(body.to_string());
    }

    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentGenerator for CannedGenerator {
    async fn generate_json(
        &self,
        prompt: &str,
        _schema: serde_json::Value,
    ) -> Result<String, GeminiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.body
            .lock()
            .unwrap()
            .clone()
            .ok_or(GeminiError::MissingApiKey)
    }
}

// =============================================================================
// Harness
// =============================================================================

/// An application root wired to fakes.
pub struct TestApp {
    pub state: AppState,
    pub auth: Arc<FakeAuth>,
    pub catalog: Arc<FakeCatalog>,
    pub generator: Arc<CannedGenerator>,
}

impl TestApp {
    /// Build without mounting.
    #[must_use]
    pub fn with_auth(auth: Arc<FakeAuth>) -> Self {
        let catalog = FakeCatalog::new();
        let generator = CannedGenerator::new();
        let state = AppState::new(auth.clone(), catalog.clone(), generator.clone());
        Self {
            state,
            auth,
            catalog,
            generator,
        }
    }

    /// Mounted, signed out.
    pub async fn signed_out() -> Self {
        let app = Self::with_auth(FakeAuth::new());
        app.state.mount().await;
        app
    }

    /// Mounted, with a remote session already held by the auth service.
    pub async fn signed_in() -> Self {
        let app = Self::with_auth(FakeAuth::with_session("grower@example.com"));
        app.state.mount().await;
        app
    }

    /// Wait until the session reaches `phase`, for changes applied by the
    /// auth listener.
    pub async fn wait_for_phase(&self, phase: SessionPhase) {
        for _ in 0..200 {
            if self.state.phase().await == phase {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("session never reached {phase:?}");
    }
}
