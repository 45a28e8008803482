//! Session types.
//!
//! A [`Session`] is the capability held while a user is signed in. Most of
//! the app only asks "is there one?" and "which email?". The credential
//! material belongs to the auth provider and is never serialized.

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::Serialize;

/// Credential material issued by the hosted auth service.
#[derive(Clone)]
pub struct SessionTokens {
    pub access_token: SecretString,
    pub refresh_token: SecretString,
    /// When the access token stops being accepted, if the provider said.
    pub expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// A session issued by the hosted auth service.
#[derive(Debug, Clone)]
pub struct RemoteSession {
    pub user_id: String,
    pub email: String,
    pub issued_at: DateTime<Utc>,
    pub tokens: SessionTokens,
}

/// A session fabricated locally for demo/offline use.
///
/// Carries no credentials; nothing remote will accept it.
#[derive(Debug, Clone)]
pub struct LocalSession {
    pub user_id: String,
    pub email: String,
    pub issued_at: DateTime<Utc>,
}

/// The signed-in identity.
#[derive(Debug, Clone)]
pub enum Session {
    Remote(RemoteSession),
    Local(LocalSession),
}

impl Session {
    #[must_use]
    pub fn user_id(&self) -> &str {
        match self {
            Self::Remote(s) => &s.user_id,
            Self::Local(s) => &s.user_id,
        }
    }

    #[must_use]
    pub fn email(&self) -> &str {
        match self {
            Self::Remote(s) => &s.email,
            Self::Local(s) => &s.email,
        }
    }

    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        match self {
            Self::Remote(s) => s.issued_at,
            Self::Local(s) => s.issued_at,
        }
    }

    /// Credentials for remote calls; `None` for local sessions.
    #[must_use]
    pub const fn tokens(&self) -> Option<&SessionTokens> {
        match self {
            Self::Remote(s) => Some(&s.tokens),
            Self::Local(_) => None,
        }
    }

    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

/// Which gate the UI should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Loading,
    Authenticated,
    Unauthenticated,
}

/// What the presentation layer sees of the session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub email: Option<String>,
    pub demo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> Session {
        Session::Remote(RemoteSession {
            user_id: "8d0c".to_string(),
            email: "grower@example.com".to_string(),
            issued_at: Utc::now(),
            tokens: SessionTokens {
                access_token: SecretString::from("access-value"),
                refresh_token: SecretString::from("refresh-value"),
                expires_at: None,
            },
        })
    }

    #[test]
    fn test_local_session_has_no_tokens() {
        let local = Session::Local(LocalSession {
            user_id: "demo-user-1234".to_string(),
            email: "guest@harvestandhome.demo".to_string(),
            issued_at: Utc::now(),
        });
        assert!(local.is_local());
        assert!(local.tokens().is_none());
        assert!(remote().tokens().is_some());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let debug = format!("{:?}", remote());
        assert!(debug.contains("grower@example.com"));
        assert!(!debug.contains("access-value"));
        assert!(!debug.contains("refresh-value"));
    }

    #[test]
    fn test_phase_serializes_lowercase() {
        let json = serde_json::to_string(&SessionPhase::Unauthenticated).unwrap_or_default();
        assert_eq!(json, "\"unauthenticated\"");
    }
}
