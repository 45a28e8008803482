//! Authentication error types.

use thiserror::Error;

use crate::supabase::SupabaseError;

/// Errors from sign-in, sign-up and sign-out.
///
/// All of these are shown inline on the auth screen; none of them changes
/// the held session.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] harvest_home_core::EmailError),

    /// Password fails the local checks.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// The auth service refused the request (wrong password, duplicate
    /// account, unconfirmed email...). Carries the service's own message.
    #[error("{0}")]
    Rejected(String),

    /// OAuth provider not supported.
    #[error("unsupported sign-in provider: {0}")]
    UnsupportedProvider(String),

    /// The auth service could not be reached or answered nonsense.
    #[error("auth service error: {0}")]
    Service(#[from] SupabaseError),
}

impl AuthError {
    /// Text for the dismissible message on the auth screen.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail(e) => e.to_string(),
            Self::WeakPassword(msg) | Self::Rejected(msg) => msg.clone(),
            Self::UnsupportedProvider(_) => "That sign-in method is not available.".to_string(),
            Self::Service(_) => "Authentication failed.".to_string(),
        }
    }
}
