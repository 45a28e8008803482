//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::models::SessionPhase;
use crate::services::auth::{AuthError, OAuthProvider};
use crate::services::cart::QuantityError;
use crate::services::recipes::RecipeError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Sign-in, sign-up or sign-out failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Starting an OAuth sign-in failed.
    #[error("OAuth error ({provider}): {source}")]
    OAuth {
        provider: String,
        #[source]
        source: AuthError,
    },

    /// Recipe generation failed or found nothing.
    #[error("Recipe error: {0}")]
    Recipe(#[from] RecipeError),

    /// The operation needs a signed-in session.
    #[error("Locked: session is {0:?}")]
    Locked(SessionPhase),

    /// Manual quantity input was not a number.
    #[error("Invalid quantity: {0}")]
    Quantity(#[from] QuantityError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// An OAuth failure for `provider`.
    #[must_use]
    pub fn oauth(provider: impl Into<String>, source: AuthError) -> Self {
        Self::OAuth {
            provider: provider.into(),
            source,
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) | Self::OAuth { source: err, .. } => match err {
                AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_)
                | AuthError::UnsupportedProvider(_) => StatusCode::BAD_REQUEST,
                AuthError::Rejected(_) => StatusCode::UNAUTHORIZED,
                AuthError::Service(_) => StatusCode::BAD_GATEWAY,
            },
            Self::Recipe(err) => match err {
                RecipeError::RequestFailed(_) => StatusCode::BAD_GATEWAY,
                RecipeError::NoResults => StatusCode::NOT_FOUND,
                RecipeError::EmptyRequest => StatusCode::BAD_REQUEST,
            },
            Self::Locked(SessionPhase::Loading) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Locked(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Quantity(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Text safe to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(err) => err.user_message(),
            Self::OAuth { provider, source } => match source {
                AuthError::UnsupportedProvider(_) => source.user_message(),
                _ => format!("{} sign in failed. Please try demo mode.", provider_title(provider)),
            },
            Self::Recipe(err) => err.to_string(),
            Self::Locked(SessionPhase::Loading) => "Still loading, please wait.".to_string(),
            Self::Locked(_) => "Please sign in to continue.".to_string(),
            Self::Quantity(_) => "Quantity must be a whole number.".to_string(),
            Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
        }
    }
}

fn provider_title(provider: &str) -> String {
    match provider.parse::<OAuthProvider>() {
        Ok(OAuthProvider::Google) => "Google".to_string(),
        Err(_) => provider.to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Auth(AuthError::Service(_))) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        // Don't expose internal error details to clients
        let body = Json(json!({ "error": self.user_message() }));
        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
