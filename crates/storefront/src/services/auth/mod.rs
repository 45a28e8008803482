//! Authentication collaborator interface.
//!
//! The hosted backend owns identity. This module defines what the
//! storefront needs from it ([`AuthProvider`]), the change notifications it
//! pushes ([`AuthChange`] via [`AuthEvents`]), and the local credential
//! checks done before any request leaves the process.

mod error;

pub use error::AuthError;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use harvest_home_core::Email;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::broadcast;
use url::Url;

use crate::models::Session;

/// Minimum password length accepted by the hosted auth service.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Capacity of the auth change channel. Changes are rare; a lagging
/// listener only ever needs the latest one.
const AUTH_EVENT_CAPACITY: usize = 16;

/// External OAuth identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
}

impl OAuthProvider {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            other => Err(AuthError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Tokens handed back to the browser at the end of an OAuth redirect.
#[derive(Deserialize)]
pub struct OAuthCallback {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: Option<i64>,
}

impl fmt::Debug for OAuthCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCallback")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Result of a sign-up request.
#[derive(Debug)]
pub enum SignUpOutcome {
    /// The account is usable immediately.
    SignedIn(Session),
    /// The account exists but must be confirmed before signing in.
    ConfirmationRequired,
}

/// Kind of auth state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChangeKind {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// A change the auth service observed outside of a direct call, e.g. an
/// OAuth redirect completing or a token refresh.
#[derive(Debug, Clone)]
pub struct AuthChange {
    pub kind: AuthChangeKind,
    pub session: Option<Session>,
}

/// Broadcast side of the auth change stream.
#[derive(Debug, Clone)]
pub struct AuthEvents {
    tx: broadcast::Sender<AuthChange>,
}

impl AuthEvents {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(AUTH_EVENT_CAPACITY);
        Self { tx }
    }

    /// Notify all current subscribers. No subscribers is not an error.
    pub fn emit(&self, change: AuthChange) {
        let _ = self.tx.send(change);
    }

    #[must_use]
    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of the auth change stream. Dropping it unsubscribes.
#[derive(Debug)]
pub struct AuthSubscription {
    rx: broadcast::Receiver<AuthChange>,
}

impl AuthSubscription {
    /// Wait for the next change. Returns `None` once the provider is gone.
    pub async fn next(&mut self) -> Option<AuthChange> {
        loop {
            match self.rx.recv().await {
                Ok(change) => return Some(change),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "auth listener lagged, skipping stale changes");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// What the storefront needs from the hosted auth service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The session the service currently holds, if any.
    async fn current_session(&self) -> Result<Option<Session>, AuthError>;

    /// Listen for changes the service observes on its own.
    fn subscribe(&self) -> AuthSubscription;

    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Session, AuthError>;

    async fn sign_up(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<SignUpOutcome, AuthError>;

    /// URL to send the browser to for OAuth sign-in.
    fn oauth_url(&self, provider: OAuthProvider) -> Result<Url, AuthError>;

    /// Finish an OAuth redirect. The resulting session arrives as a
    /// [`AuthChangeKind::SignedIn`] change on the subscription.
    async fn complete_oauth(&self, callback: OAuthCallback) -> Result<(), AuthError>;

    /// Revoke the session remotely. Local state is the caller's concern.
    async fn sign_out(&self, session: &Session) -> Result<(), AuthError>;
}

/// Validate sign-in/sign-up input before contacting the auth service.
///
/// # Errors
///
/// Returns `AuthError::InvalidEmail` or `AuthError::WeakPassword`.
pub fn validate_credentials(email: &str, password: &SecretString) -> Result<Email, AuthError> {
    let email = Email::parse(email)?;
    let len = password.expose_secret().chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password should be at least {MIN_PASSWORD_LENGTH} characters."
        )));
    }
    Ok(email)
}
