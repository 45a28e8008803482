//! Auth endpoints and the held session.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use harvest_home_core::Email;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use url::Url;

use super::types::{SignUpResponse, TokenResponse, UserResponse};
use super::{SupabaseClient, SupabaseError};
use crate::models::{RemoteSession, Session, SessionTokens};
use crate::services::auth::{
    AuthChange, AuthChangeKind, AuthError, AuthEvents, AuthProvider, AuthSubscription,
    OAuthCallback, OAuthProvider, SignUpOutcome,
};

/// Refresh this long before the access token actually expires.
const REFRESH_MARGIN: Duration = Duration::seconds(60);

/// [`AuthProvider`] backed by the hosted auth service.
///
/// Holds the current session in memory. Direct calls return their result
/// to the caller; only changes observed out-of-band (OAuth completion,
/// token refresh, a refresh being refused) are broadcast.
pub struct SupabaseAuth {
    client: SupabaseClient,
    stored: RwLock<Option<Session>>,
    events: AuthEvents,
}

impl SupabaseAuth {
    #[must_use]
    pub fn new(client: SupabaseClient) -> Self {
        Self {
            client,
            stored: RwLock::new(None),
            events: AuthEvents::new(),
        }
    }

    async fn store(&self, session: Option<Session>) {
        *self.stored.write().await = session;
    }

    /// Exchange the refresh token for a new session.
    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &SecretString) -> Result<Option<Session>, AuthError> {
        let mut url = self.client.endpoint("auth/v1/token")?;
        url.query_pairs_mut()
            .append_pair("grant_type", "refresh_token");
        let request = self
            .client
            .request(Method::POST, url, None)
            .json(&json!({ "refresh_token": refresh_token.expose_secret() }));

        match self.client.send_json::<TokenResponse>(request).await {
            Ok(token) => {
                let session = token.into_session(Utc::now());
                self.store(Some(session.clone())).await;
                self.events.emit(AuthChange {
                    kind: AuthChangeKind::TokenRefreshed,
                    session: Some(session.clone()),
                });
                info!("Session refreshed");
                Ok(Some(session))
            }
            Err(e) if e.is_client_error() => {
                warn!(error = %e, "Refresh token rejected, signing out");
                self.store(None).await;
                self.events.emit(AuthChange {
                    kind: AuthChangeKind::SignedOut,
                    session: None,
                });
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        let held = self.stored.read().await.clone();
        let Some(session) = held else {
            return Ok(None);
        };

        let refresh_token = session.tokens().and_then(|tokens| {
            let due = tokens
                .expires_at
                .is_some_and(|at| at - REFRESH_MARGIN <= Utc::now());
            due.then(|| tokens.refresh_token.clone())
        });

        match refresh_token {
            Some(token) => self.refresh(&token).await,
            None => Ok(Some(session)),
        }
    }

    fn subscribe(&self) -> AuthSubscription {
        self.events.subscribe()
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_in_with_password(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<Session, AuthError> {
        let mut url = self.client.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let request = self.client.request(Method::POST, url, None).json(&json!({
            "email": email.as_str(),
            "password": password.expose_secret(),
        }));

        let token: TokenResponse = self
            .client
            .send_json(request)
            .await
            .map_err(rejection)?;
        let session = token.into_session(Utc::now());
        self.store(Some(session.clone())).await;
        Ok(session)
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_up(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<SignUpOutcome, AuthError> {
        let mut url = self.client.endpoint("auth/v1/signup")?;
        if let Some(redirect) = self.client.oauth_redirect_url() {
            url.query_pairs_mut().append_pair("redirect_to", redirect);
        }
        let request = self.client.request(Method::POST, url, None).json(&json!({
            "email": email.as_str(),
            "password": password.expose_secret(),
        }));

        let response: SignUpResponse = self
            .client
            .send_json(request)
            .await
            .map_err(rejection)?;

        match response {
            SignUpResponse::Session(token) => {
                let session = token.into_session(Utc::now());
                self.store(Some(session.clone())).await;
                Ok(SignUpOutcome::SignedIn(session))
            }
            SignUpResponse::User(user) => {
                info!(user_id = %user.id, "Account created, confirmation required");
                Ok(SignUpOutcome::ConfirmationRequired)
            }
        }
    }

    fn oauth_url(&self, provider: OAuthProvider) -> Result<Url, AuthError> {
        let mut url = self.client.endpoint("auth/v1/authorize")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("provider", provider.as_str());
            if let Some(redirect) = self.client.oauth_redirect_url() {
                query.append_pair("redirect_to", redirect);
            }
        }
        Ok(url)
    }

    #[instrument(skip_all)]
    async fn complete_oauth(&self, callback: OAuthCallback) -> Result<(), AuthError> {
        let access_token = SecretString::from(callback.access_token);
        let url = self.client.endpoint("auth/v1/user")?;
        let request = self
            .client
            .request(Method::GET, url, Some(&access_token));
        let user: UserResponse = self
            .client
            .send_json(request)
            .await
            .map_err(rejection)?;

        let now = Utc::now();
        let session = Session::Remote(RemoteSession {
            user_id: user.id,
            email: user.email.unwrap_or_default(),
            issued_at: now,
            tokens: SessionTokens {
                access_token,
                refresh_token: SecretString::from(callback.refresh_token),
                expires_at: callback.expires_in.map(|secs| now + Duration::seconds(secs)),
            },
        });

        self.store(Some(session.clone())).await;
        self.events.emit(AuthChange {
            kind: AuthChangeKind::SignedIn,
            session: Some(session),
        });
        Ok(())
    }

    #[instrument(skip_all, fields(user_id = %session.user_id()))]
    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        // Forget locally first so a failed revoke still signs the user out here.
        self.store(None).await;

        let Some(tokens) = session.tokens() else {
            return Ok(());
        };
        let url = self.client.endpoint("auth/v1/logout")?;
        let request = self
            .client
            .request(Method::POST, url, Some(&tokens.access_token));
        self.client.send_empty(request).await?;
        Ok(())
    }
}

/// Requests the service refused become inline messages; everything else
/// stays a service failure.
fn rejection(e: SupabaseError) -> AuthError {
    match e {
        SupabaseError::Api { status, message } if (400..500).contains(&status) => {
            AuthError::Rejected(message)
        }
        other => AuthError::Service(other),
    }
}
