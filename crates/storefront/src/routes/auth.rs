//! Session and sign-in route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::models::SessionSnapshot;
use crate::services::auth::OAuthCallback;
use crate::state::{AppState, SignUpResult};

/// Email and password from the sign-in and sign-up forms.
#[derive(Deserialize)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialsForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Optional email for demo sign-in.
#[derive(Debug, Default, Deserialize)]
pub struct DemoForm {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OAuthRedirect {
    pub url: String,
}

/// GET /api/session
pub async fn session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session().await)
}

/// POST /api/auth/sign-in
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(form): Json<CredentialsForm>,
) -> Result<Json<SessionSnapshot>> {
    let CredentialsForm { email, password } = form;
    let password = SecretString::from(password);
    Ok(Json(state.sign_in(&email, &password).await?))
}

/// POST /api/auth/sign-up
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(form): Json<CredentialsForm>,
) -> Result<Json<SignUpResult>> {
    let CredentialsForm { email, password } = form;
    let password = SecretString::from(password);
    Ok(Json(state.sign_up(&email, &password).await?))
}

/// GET /api/auth/oauth/{provider}
pub async fn oauth_url(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Json<OAuthRedirect>> {
    let url = state.sign_in_with_oauth(&provider)?;
    Ok(Json(OAuthRedirect { url: url.into() }))
}

/// POST /api/auth/oauth/callback
///
/// The session itself shows up on `/api/session` once the auth listener
/// has applied it.
pub async fn oauth_callback(
    State(state): State<AppState>,
    Json(callback): Json<OAuthCallback>,
) -> Result<Json<SessionSnapshot>> {
    state.complete_oauth(callback).await?;
    Ok(Json(state.session().await))
}

/// POST /api/auth/demo
pub async fn demo(
    State(state): State<AppState>,
    body: Option<Json<DemoForm>>,
) -> Result<Json<SessionSnapshot>> {
    let form = body.map(|Json(form)| form).unwrap_or_default();
    Ok(Json(state.sign_in_demo(form.email.as_deref()).await?))
}

/// POST /api/auth/sign-out
pub async fn sign_out(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.sign_out().await)
}
