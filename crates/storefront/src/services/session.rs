//! Session Controller: the authentication gate.
//!
//! Starts in `Loading`, leaves it exactly once, and from then on moves
//! between `Authenticated` and `Unauthenticated`. Transitions that should
//! reset navigation are reported as an explicit [`SessionEvent`] instead of
//! being inferred from the old and new values.

use chrono::Utc;
use harvest_home_core::Email;
use rand::Rng;

use crate::models::{LocalSession, Session, SessionPhase, SessionSnapshot};
use crate::services::auth::{AuthChange, AuthChangeKind};
use crate::services::notifications::Toast;

/// Address shown for a demo session started without one.
pub const DEMO_EMAIL: &str = "guest@harvestandhome.demo";

/// Held session state.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Loading,
    Authenticated(Session),
    Unauthenticated,
}

/// Transitions other components react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    SignedOut,
}

#[derive(Debug, Default)]
pub struct SessionController {
    state: SessionState,
}

impl SessionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        match self.state {
            SessionState::Loading => SessionPhase::Loading,
            SessionState::Authenticated(_) => SessionPhase::Authenticated,
            SessionState::Unauthenticated => SessionPhase::Unauthenticated,
        }
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase(),
            email: self.session().map(|s| s.email().to_string()),
            demo: self.session().is_some_and(Session::is_local),
        }
    }

    /// Settle the initial fetch. Ignored once `Loading` is over, so a slow
    /// fetch cannot overwrite a sign-in that happened meanwhile.
    pub fn resolve_initial(&mut self, session: Option<Session>) {
        if !matches!(self.state, SessionState::Loading) {
            tracing::debug!("Initial session arrived after state settled, ignoring");
            return;
        }
        self.state = session.map_or(SessionState::Unauthenticated, SessionState::Authenticated);
    }

    /// Apply a change pushed by the auth service.
    pub fn apply_change(&mut self, change: AuthChange) -> Option<SessionEvent> {
        match (change.kind, change.session) {
            (AuthChangeKind::SignedIn, Some(session)) => Some(self.sign_in(session)),
            (AuthChangeKind::SignedOut, _) | (_, None) => {
                let was_signed_in = self.session().is_some();
                self.state = SessionState::Unauthenticated;
                was_signed_in.then_some(SessionEvent::SignedOut)
            }
            (AuthChangeKind::TokenRefreshed | AuthChangeKind::UserUpdated, Some(session)) => {
                self.state = SessionState::Authenticated(session);
                None
            }
        }
    }

    /// Hold `session` as the signed-in identity.
    pub fn sign_in(&mut self, session: Session) -> SessionEvent {
        self.state = SessionState::Authenticated(session);
        SessionEvent::SignedIn
    }

    /// Sign in with a locally fabricated session, without the auth
    /// service. Returns the welcome toast to show.
    pub fn sign_in_demo(&mut self, email: Option<&Email>) -> (SessionEvent, Toast) {
        let toast = match email {
            Some(email) => Toast::success(format!("Logged in as {email}")),
            None => Toast::success("Welcome! You're exploring in demo mode."),
        };
        let event = self.sign_in(local_session(email));
        (event, toast)
    }

    /// Drop the held session, returning it so the caller can revoke it
    /// remotely. Local state is cleared whatever happens next.
    pub fn sign_out(&mut self) -> Option<Session> {
        match std::mem::replace(&mut self.state, SessionState::Unauthenticated) {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

/// A demo session. Carries no credentials.
#[must_use]
pub fn local_session(email: Option<&Email>) -> Session {
    let suffix: u32 = rand::rng().random_range(100_000..1_000_000);
    Session::Local(LocalSession {
        user_id: format!("demo-user-{suffix}"),
        email: email.map_or_else(|| DEMO_EMAIL.to_string(), ToString::to_string),
        issued_at: Utc::now(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::models::{RemoteSession, SessionTokens};

    fn remote(email: &str) -> Session {
        Session::Remote(RemoteSession {
            user_id: "u-1".to_string(),
            email: email.to_string(),
            issued_at: Utc::now(),
            tokens: SessionTokens {
                access_token: SecretString::from("a"),
                refresh_token: SecretString::from("r"),
                expires_at: None,
            },
        })
    }

    #[test]
    fn test_starts_loading() {
        let controller = SessionController::new();
        assert_eq!(controller.phase(), SessionPhase::Loading);
        assert!(controller.snapshot().email.is_none());
    }

    #[test]
    fn test_resolve_initial_once() {
        let mut controller = SessionController::new();
        controller.resolve_initial(None);
        assert_eq!(controller.phase(), SessionPhase::Unauthenticated);

        controller.resolve_initial(Some(remote("late@example.com")));
        assert_eq!(controller.phase(), SessionPhase::Unauthenticated);
    }

    #[test]
    fn test_late_initial_fetch_does_not_override_sign_in() {
        let mut controller = SessionController::new();
        controller.sign_in(remote("first@example.com"));
        controller.resolve_initial(None);
        assert_eq!(controller.phase(), SessionPhase::Authenticated);
    }

    #[test]
    fn test_signed_in_change_emits_event() {
        let mut controller = SessionController::new();
        controller.resolve_initial(None);
        let event = controller.apply_change(AuthChange {
            kind: AuthChangeKind::SignedIn,
            session: Some(remote("grower@example.com")),
        });
        assert_eq!(event, Some(SessionEvent::SignedIn));
        assert_eq!(
            controller.snapshot().email.as_deref(),
            Some("grower@example.com")
        );
    }

    #[test]
    fn test_token_refresh_updates_without_event() {
        let mut controller = SessionController::new();
        controller.sign_in(remote("old@example.com"));
        let event = controller.apply_change(AuthChange {
            kind: AuthChangeKind::TokenRefreshed,
            session: Some(remote("new@example.com")),
        });
        assert!(event.is_none());
        assert_eq!(controller.session().unwrap().email(), "new@example.com");
    }

    #[test]
    fn test_signed_out_change() {
        let mut controller = SessionController::new();
        controller.sign_in(remote("grower@example.com"));
        let event = controller.apply_change(AuthChange {
            kind: AuthChangeKind::SignedOut,
            session: None,
        });
        assert_eq!(event, Some(SessionEvent::SignedOut));
        assert_eq!(controller.phase(), SessionPhase::Unauthenticated);
    }

    #[test]
    fn test_demo_sign_in_messages() {
        let mut controller = SessionController::new();
        let (event, toast) = controller.sign_in_demo(None);
        assert_eq!(event, SessionEvent::SignedIn);
        assert!(toast.text.contains("demo mode"));
        let snapshot = controller.snapshot();
        assert!(snapshot.demo);
        assert_eq!(snapshot.email.as_deref(), Some(DEMO_EMAIL));

        let email = Email::parse("chef@example.com").unwrap();
        let (_, toast) = controller.sign_in_demo(Some(&email));
        assert_eq!(toast.text, "Logged in as chef@example.com");
    }

    #[test]
    fn test_local_session_id() {
        let session = local_session(None);
        assert!(session.user_id().starts_with("demo-user-"));
        assert!(session.tokens().is_none());
    }

    #[test]
    fn test_sign_out_returns_session() {
        let mut controller = SessionController::new();
        controller.sign_in(remote("grower@example.com"));
        assert!(controller.sign_out().is_some());
        assert_eq!(controller.phase(), SessionPhase::Unauthenticated);
        assert!(controller.sign_out().is_none());
    }
}
