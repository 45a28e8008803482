//! Application root shared across handlers.
//!
//! `AppState` owns every store and is the only way to reach them. All
//! mutations go through one async mutex, which plays the part of a single
//! event loop: a user action's mutation completes before the next begins,
//! and the auth listener's mutation is atomic with respect to both. The
//! lock is never held across a call to an external service.

use std::sync::{Arc, Mutex as StdMutex, PoisonError, Weak};

use harvest_home_core::{Email, FarmId, Product, ProductId};
use secrecy::SecretString;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::{CatalogSourceKind, StorefrontConfig};
use crate::error::{AppError, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::gemini::GeminiClient;
use crate::models::{Session, SessionPhase, SessionSnapshot, View};
use crate::services::auth::{
    AuthChange, AuthError, AuthProvider, AuthSubscription, OAuthCallback, OAuthProvider,
    SignUpOutcome, validate_credentials,
};
use crate::services::cart::{CartSnapshot, CartStore, parse_quantity_input};
use crate::services::catalog::{
    BrowseFilter, CatalogSource, CatalogStore, LoadStatus, RemoteCatalog, SeedCatalog, SortKey,
};
use crate::services::checkout::CheckoutSummary;
use crate::services::navigation::{NavigationShell, Screen};
use crate::services::notifications::{NotificationQueue, Toast};
use crate::services::recipes::{
    AssistantRecipe, ContentGenerator, PricedRecipe, RecipeAdvisor, RecipeIdea,
};
use crate::services::session::{SessionController, SessionEvent};
use crate::supabase::{DataClient, SupabaseAuth, SupabaseClient};

/// Shown after a sign-up that needs confirming before sign-in.
pub const SIGN_UP_CONFIRMATION: &str = "Account created! Please sign in with your credentials.";

/// Result of a sign-up as seen by the UI.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum SignUpResult {
    SignedIn { session: SessionSnapshot },
    ConfirmationRequired { message: String },
}

/// Everything the single lock guards.
#[derive(Debug, Default)]
struct Stores {
    session: SessionController,
    catalog: CatalogStore,
    cart: CartStore,
    nav: NavigationShell,
}

impl Stores {
    /// Gate for everything but the session snapshot and sign-in.
    fn require_authenticated(&self) -> Result<&Session, AppError> {
        self.session
            .session()
            .ok_or_else(|| AppError::Locked(self.session.phase()))
    }

    fn product(&self, id: ProductId) -> Result<&Product, AppError> {
        self.catalog
            .product(id)
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    /// Apply a session transition to the stores that follow it.
    fn on_session_event(&mut self, event: SessionEvent) {
        self.nav.on_session_event(event);
        match event {
            SessionEvent::SignedIn => {
                if let Some(session) = self.session.session() {
                    set_sentry_user(session.user_id(), Some(session.email()));
                }
            }
            SessionEvent::SignedOut => {
                self.cart.clear();
                clear_sentry_user();
            }
        }
    }
}

/// Application root.
///
/// Cheaply cloneable via `Arc`. Dropping the last clone stops the auth
/// listener.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    auth: Arc<dyn AuthProvider>,
    catalog_source: Arc<dyn CatalogSource>,
    advisor: RecipeAdvisor,
    notifications: NotificationQueue,
    stores: Mutex<Stores>,
    listener: StdMutex<Option<JoinHandle<()>>>,
}

impl Drop for AppStateInner {
    fn drop(&mut self) {
        let listener = self
            .listener
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = listener.take() {
            handle.abort();
        }
    }
}

impl AppState {
    /// Create a new application root over the given collaborators.
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        catalog_source: Arc<dyn CatalogSource>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                auth,
                catalog_source,
                advisor: RecipeAdvisor::new(generator),
                notifications: NotificationQueue::new(),
                stores: Mutex::new(Stores::default()),
                listener: StdMutex::new(None),
            }),
        }
    }

    /// Wire up the hosted backend and generative endpoint from configuration.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        let supabase = SupabaseClient::new(&config.supabase);
        let auth = Arc::new(SupabaseAuth::new(supabase.clone()));
        let catalog_source: Arc<dyn CatalogSource> = match config.catalog_source {
            CatalogSourceKind::Seed => Arc::new(SeedCatalog),
            CatalogSourceKind::Remote => Arc::new(RemoteCatalog::new(DataClient::new(supabase))),
        };
        let generator = Arc::new(GeminiClient::new(&config.gemini));
        Self::new(auth, catalog_source, generator)
    }

    async fn stores(&self) -> MutexGuard<'_, Stores> {
        self.inner.stores.lock().await
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Fetch the initial session and load the catalog concurrently, then
    /// listen for auth changes until [`unmount`](Self::unmount).
    ///
    /// Each half applies its result as soon as it arrives, so the session
    /// gate opens without waiting for the catalog. Calling `mount` again
    /// while mounted does nothing.
    #[instrument(skip(self))]
    pub async fn mount(&self) {
        if self.is_mounted() {
            return;
        }
        // Subscribe before fetching so a change during the fetch is not lost.
        let subscription = self.inner.auth.subscribe();
        let weak = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(listen(weak, subscription));
        *self
            .inner
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);

        tokio::join!(self.resolve_initial_session(), self.load_catalog());
    }

    /// Stop reacting to auth changes.
    pub fn unmount(&self) {
        let handle = self
            .inner
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            info!("Auth listener stopped");
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.inner
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    async fn resolve_initial_session(&self) {
        let session = self.inner.auth.current_session().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to fetch current session");
            None
        });
        let mut stores = self.stores().await;
        stores.session.resolve_initial(session);
        if let Some(session) = stores.session.session() {
            set_sentry_user(session.user_id(), Some(session.email()));
        }
        info!(phase = ?stores.session.phase(), "Session resolved");
    }

    async fn load_catalog(&self) -> LoadStatus {
        let catalog = CatalogStore::load(self.inner.catalog_source.as_ref()).await;
        let status = catalog.status();
        self.stores().await.catalog = catalog;
        status
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Session phase and identity. Always available.
    pub async fn session(&self) -> SessionSnapshot {
        self.stores().await.session.snapshot()
    }

    /// The toast currently showing. Always available.
    #[must_use]
    pub fn toast(&self) -> Option<Toast> {
        self.inner.notifications.current()
    }

    /// Farms, products and load status.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Locked` unless signed in.
    pub async fn catalog(&self) -> Result<CatalogStore, AppError> {
        let stores = self.stores().await;
        stores.require_authenticated()?;
        Ok(stores.catalog.clone())
    }

    /// Browse listing.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Locked` unless signed in.
    pub async fn browse(
        &self,
        filter: BrowseFilter,
        sort: SortKey,
    ) -> Result<Vec<Product>, AppError> {
        let stores = self.stores().await;
        stores.require_authenticated()?;
        Ok(stores
            .catalog
            .browse(filter, sort)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Products of one farm, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown farm.
    pub async fn farm_products(&self, farm_id: FarmId) -> Result<Vec<Product>, AppError> {
        let stores = self.stores().await;
        stores.require_authenticated()?;
        if stores.catalog.farm(farm_id).is_none() {
            return Err(AppError::NotFound("Farm not found".to_string()));
        }
        Ok(stores.catalog.products_of_farm(farm_id).cloned().collect())
    }

    /// # Errors
    ///
    /// Returns `AppError::Locked` unless signed in.
    pub async fn cart(&self) -> Result<CartSnapshot, AppError> {
        let stores = self.stores().await;
        stores.require_authenticated()?;
        Ok(stores.cart.snapshot())
    }

    /// # Errors
    ///
    /// Returns `AppError::Locked` unless signed in.
    pub async fn current_view(&self) -> Result<View, AppError> {
        let stores = self.stores().await;
        stores.require_authenticated()?;
        Ok(stores.nav.current())
    }

    /// The current view resolved against catalog and cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Locked` unless signed in.
    pub async fn screen(&self) -> Result<Screen, AppError> {
        let stores = self.stores().await;
        stores.require_authenticated()?;
        Ok(stores.nav.resolve(&stores.catalog, &stores.cart))
    }

    /// # Errors
    ///
    /// Returns `AppError::Locked` unless signed in.
    pub async fn checkout_summary(&self) -> Result<CheckoutSummary, AppError> {
        let stores = self.stores().await;
        stores.require_authenticated()?;
        Ok(CheckoutSummary::of(&stores.cart))
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Password sign-in.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` for invalid input or a refused sign-in; the
    /// session is unchanged.
    #[instrument(skip(self, password))]
    pub async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SessionSnapshot, AppError> {
        let email = validate_credentials(email, password)?;
        let session = self
            .inner
            .auth
            .sign_in_with_password(&email, password)
            .await?;
        Ok(self.apply_sign_in(session).await)
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` for invalid input or a refused sign-up.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<SignUpResult, AppError> {
        let email = validate_credentials(email, password)?;
        match self.inner.auth.sign_up(&email, password).await? {
            SignUpOutcome::SignedIn(session) => Ok(SignUpResult::SignedIn {
                session: self.apply_sign_in(session).await,
            }),
            SignUpOutcome::ConfirmationRequired => Ok(SignUpResult::ConfirmationRequired {
                message: SIGN_UP_CONFIRMATION.to_string(),
            }),
        }
    }

    async fn apply_sign_in(&self, session: Session) -> SessionSnapshot {
        let mut stores = self.stores().await;
        let event = stores.session.sign_in(session);
        stores.on_session_event(event);
        add_breadcrumb("auth", "Signed in", None);
        stores.session.snapshot()
    }

    /// URL to send the browser to for OAuth sign-in.
    ///
    /// # Errors
    ///
    /// Returns `AppError::OAuth` for an unknown provider or a failure to
    /// build the URL.
    pub fn sign_in_with_oauth(&self, provider: &str) -> Result<Url, AppError> {
        let parsed: OAuthProvider = provider
            .parse()
            .map_err(|e| AppError::oauth(provider, e))?;
        self.inner
            .auth
            .oauth_url(parsed)
            .map_err(|e| AppError::oauth(provider, e))
    }

    /// Hand the tokens from an OAuth redirect to the auth service. The
    /// session arrives through the auth listener.
    ///
    /// # Errors
    ///
    /// Returns `AppError::OAuth` if the tokens are refused.
    #[instrument(skip_all)]
    pub async fn complete_oauth(&self, callback: OAuthCallback) -> Result<(), AppError> {
        self.inner
            .auth
            .complete_oauth(callback)
            .await
            .map_err(|e| AppError::oauth(OAuthProvider::Google.as_str(), e))
    }

    /// Sign in without the auth service.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` if a supplied email is malformed.
    pub async fn sign_in_demo(&self, email: Option<&str>) -> Result<SessionSnapshot, AppError> {
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(Email::parse)
            .transpose()
            .map_err(AuthError::from)?;

        let mut stores = self.stores().await;
        let (event, toast) = stores.session.sign_in_demo(email.as_ref());
        stores.on_session_event(event);
        self.inner.notifications.post(toast);
        add_breadcrumb("auth", "Demo sign-in", None);
        Ok(stores.session.snapshot())
    }

    /// Sign out. The local session is cleared first and stays cleared
    /// even if the remote sign-out fails.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> SessionSnapshot {
        let (session, snapshot) = {
            let mut stores = self.stores().await;
            let session = stores.session.sign_out();
            if session.is_some() {
                stores.on_session_event(SessionEvent::SignedOut);
            }
            (session, stores.session.snapshot())
        };

        if let Some(session) = session
            && let Err(e) = self.inner.auth.sign_out(&session).await
        {
            warn!(error = %e, "Remote sign-out failed, local session already cleared");
        }
        snapshot
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add a product. Opens the cart panel and posts a toast.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` for an unknown product.
    pub async fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartSnapshot, AppError> {
        let mut stores = self.stores().await;
        stores.require_authenticated()?;
        let product = stores.product(product_id)?.clone();
        self.add_line(&mut stores, &product, quantity);
        Ok(stores.cart.snapshot())
    }

    fn add_line(&self, stores: &mut Stores, product: &Product, quantity: u32) {
        stores.cart.add(product, quantity);
        self.inner
            .notifications
            .post(Toast::info(format!("{} added to cart", product.name)));
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[
                ("product_id", &product.id.to_string()),
                ("quantity", &quantity.to_string()),
            ]),
        );
    }

    /// Apply a quantity typed into the cart panel.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Quantity` for non-numeric input (cart unchanged).
    pub async fn set_cart_quantity(
        &self,
        product_id: ProductId,
        raw: &str,
    ) -> Result<CartSnapshot, AppError> {
        let mut stores = self.stores().await;
        stores.require_authenticated()?;
        let quantity = parse_quantity_input(raw)?;
        stores.cart.set_quantity(product_id, quantity);
        Ok(stores.cart.snapshot())
    }

    /// # Errors
    ///
    /// Returns `AppError::Locked` unless signed in.
    pub async fn clear_cart(&self) -> Result<CartSnapshot, AppError> {
        self.with_cart(CartStore::clear).await
    }

    /// # Errors
    ///
    /// Returns `AppError::Locked` unless signed in.
    pub async fn open_cart(&self) -> Result<CartSnapshot, AppError> {
        self.with_cart(CartStore::open).await
    }

    /// # Errors
    ///
    /// Returns `AppError::Locked` unless signed in.
    pub async fn close_cart(&self) -> Result<CartSnapshot, AppError> {
        self.with_cart(CartStore::close).await
    }

    async fn with_cart(&self, f: impl FnOnce(&mut CartStore)) -> Result<CartSnapshot, AppError> {
        let mut stores = self.stores().await;
        stores.require_authenticated()?;
        f(&mut stores.cart);
        Ok(stores.cart.snapshot())
    }

    /// Close the cart panel and show the checkout screen.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Locked` unless signed in.
    pub async fn proceed_to_checkout(&self) -> Result<Screen, AppError> {
        let mut stores = self.stores().await;
        stores.require_authenticated()?;
        stores.cart.close();
        stores.nav.go(View::Checkout);
        Ok(stores.nav.resolve(&stores.catalog, &stores.cart))
    }

    /// Place the order: clear the cart, go home, confirm with a toast.
    /// Nothing is persisted.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` when the cart is empty.
    #[instrument(skip(self))]
    pub async fn place_order(&self) -> Result<CheckoutSummary, AppError> {
        let mut stores = self.stores().await;
        stores.require_authenticated()?;
        if stores.cart.is_empty() {
            return Err(AppError::BadRequest("Your cart is empty".to_string()));
        }
        let summary = CheckoutSummary::of(&stores.cart);
        stores.cart.clear();
        stores.nav.go(View::Home);
        self.inner
            .notifications
            .post(Toast::success("Order placed successfully!"));
        info!(items = summary.item_count, total = %summary.total, "Order placed");
        Ok(summary)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Show `view`. Ids are not validated here.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Locked` unless signed in.
    pub async fn go(&self, view: View) -> Result<Screen, AppError> {
        let mut stores = self.stores().await;
        stores.require_authenticated()?;
        stores.nav.go(view);
        add_breadcrumb("navigation", "Changed view", None);
        Ok(stores.nav.resolve(&stores.catalog, &stores.cart))
    }

    /// Reload the catalog after a failed load. Collections that loaded
    /// fine are served from the client cache.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Locked` unless signed in.
    pub async fn reload_catalog(&self) -> Result<LoadStatus, AppError> {
        self.stores().await.require_authenticated()?;
        Ok(self.load_catalog().await)
    }

    pub fn dismiss_toast(&self) {
        self.inner.notifications.dismiss();
    }

    // =========================================================================
    // Recipes
    // =========================================================================

    /// Recipe ideas for one product.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Recipe` when generation fails.
    pub async fn recipe_ideas(&self, product_id: ProductId) -> Result<Vec<RecipeIdea>, AppError> {
        let name = {
            let stores = self.stores().await;
            stores.require_authenticated()?;
            stores.product(product_id)?.name.clone()
        };
        Ok(self.inner.advisor.ideas_for(&name).await?)
    }

    /// Recipes built from the current inventory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Recipe`, keeping "request failed" and "no
    /// results" apart.
    pub async fn assistant_recipes(&self, request: &str) -> Result<Vec<PricedRecipe>, AppError> {
        let products = {
            let stores = self.stores().await;
            stores.require_authenticated()?;
            stores.catalog.products().to_vec()
        };
        Ok(self.inner.advisor.from_inventory(request, &products).await?)
    }

    /// Add every matched ingredient of `recipe`, one cart add per
    /// ingredient.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` when nothing in the recipe can be
    /// bought.
    pub async fn add_recipe_to_cart(
        &self,
        recipe: AssistantRecipe,
    ) -> Result<CartSnapshot, AppError> {
        let mut stores = self.stores().await;
        stores.require_authenticated()?;
        let priced = PricedRecipe::price(recipe, stores.catalog.products());
        if !priced.can_add_all {
            return Err(AppError::BadRequest(
                "None of this recipe's ingredients are available".to_string(),
            ));
        }
        for (product, quantity) in priced.cart_items() {
            self.add_line(&mut stores, product, quantity);
        }
        Ok(stores.cart.snapshot())
    }

    /// Apply a change pushed by the auth service.
    async fn apply_auth_change(&self, change: AuthChange) {
        let kind = change.kind;
        let mut stores = self.stores().await;
        if let Some(event) = stores.session.apply_change(change) {
            stores.on_session_event(event);
        }
        info!(?kind, phase = ?stores.session.phase(), "Auth state changed");
    }

    /// Current session phase, for logging and gating checks outside the
    /// store lock.
    pub async fn phase(&self) -> SessionPhase {
        self.stores().await.session.phase()
    }
}

/// Auth listener. Holds only a weak reference so it never keeps the app
/// alive.
async fn listen(weak: Weak<AppStateInner>, mut subscription: AuthSubscription) {
    while let Some(change) = subscription.next().await {
        let Some(inner) = weak.upgrade() else {
            break;
        };
        AppState { inner }.apply_auth_change(change).await;
    }
}
