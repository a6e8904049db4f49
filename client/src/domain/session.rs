//! Session state, the events that drive it and the pure reducer.
//!
//! The reducer never performs I/O; [`SessionManager`] applies events in
//! arrival order and mirrors the result to session storage.
//!
//! [`SessionManager`]: crate::domain::SessionManager

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::PublicUser;

/// Opaque token marking a signed-in session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Fresh random token.
    pub fn generate() -> Self {
        Self(format!("hb_{}", Uuid::new_v4().simple()))
    }

    /// Token read back from storage; blank values are rejected.
    pub fn from_stored(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        (!raw.is_empty()).then(|| Self(raw.to_owned()))
    }

    /// Raw token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Coarse session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Restoring or signing in.
    Loading,
    /// No account signed in.
    Anonymous,
    /// An account is signed in.
    Authenticated,
}

/// What a protected screen should do for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGate {
    /// Show a spinner.
    Loading,
    /// Render the screen.
    Allowed,
    /// Render nothing.
    Denied,
}

/// Session snapshot.
///
/// ## Invariants
/// - `is_authenticated` holds exactly when both `user` and `token` are set.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Signed-in account.
    pub user: Option<PublicUser>,
    /// Session token.
    pub token: Option<SessionToken>,
    /// Whether an account is signed in.
    pub is_authenticated: bool,
    /// Whether restoration or sign-in is in flight.
    pub is_loading: bool,
    /// Last sign-in failure message, informational only.
    pub error: Option<String>,
}

impl SessionState {
    /// State at process start: loading, nobody signed in.
    pub fn initial() -> Self {
        Self {
            user: None,
            token: None,
            is_authenticated: false,
            is_loading: true,
            error: None,
        }
    }

    fn anonymous() -> Self {
        Self {
            is_loading: false,
            ..Self::initial()
        }
    }

    fn authenticated(user: PublicUser, token: SessionToken) -> Self {
        Self {
            user: Some(user),
            token: Some(token),
            is_authenticated: true,
            is_loading: false,
            error: None,
        }
    }

    /// Coarse phase; loading wins over the auth flags.
    pub fn phase(&self) -> SessionPhase {
        if self.is_loading {
            SessionPhase::Loading
        } else if self.is_authenticated {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }

    /// Gate for protected screens.
    pub fn route_gate(&self) -> RouteGate {
        match self.phase() {
            SessionPhase::Loading => RouteGate::Loading,
            SessionPhase::Authenticated => RouteGate::Allowed,
            SessionPhase::Anonymous => RouteGate::Denied,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Session persisted by a previous run.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredSession {
    /// Stored account.
    pub user: PublicUser,
    /// Stored token.
    pub token: SessionToken,
}

/// Events applied to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Storage was read at start-up; `None` when nothing usable was found.
    RestoreSession(Option<RestoredSession>),
    /// A sign-in attempt began.
    LoginStart,
    /// A sign-in attempt succeeded.
    LoginSuccess {
        /// Signed-in account.
        user: PublicUser,
        /// New token.
        token: SessionToken,
    },
    /// A sign-in attempt failed with a user-facing message.
    LoginFailure(String),
    /// The account signed out.
    Logout,
    /// The signed-in account changed.
    UpdateUser(PublicUser),
}

/// Apply one event.
///
/// # Examples
/// ```
/// use hireboard::domain::{reduce, SessionEvent, SessionPhase, SessionState};
///
/// let state = reduce(SessionState::initial(), SessionEvent::RestoreSession(None));
/// assert_eq!(state.phase(), SessionPhase::Anonymous);
/// let state = reduce(state, SessionEvent::LoginStart);
/// let state = reduce(state, SessionEvent::Logout);
/// assert!(!state.is_loading);
/// ```
pub fn reduce(state: SessionState, event: SessionEvent) -> SessionState {
    match event {
        SessionEvent::RestoreSession(Some(RestoredSession { user, token })) => {
            SessionState::authenticated(user, token)
        }
        SessionEvent::RestoreSession(None) => SessionState {
            error: state.error,
            ..SessionState::anonymous()
        },
        SessionEvent::LoginStart => SessionState {
            is_loading: true,
            error: None,
            ..state
        },
        SessionEvent::LoginSuccess { user, token } => SessionState::authenticated(user, token),
        SessionEvent::LoginFailure(message) => SessionState {
            error: Some(message),
            ..SessionState::anonymous()
        },
        SessionEvent::Logout => SessionState::anonymous(),
        SessionEvent::UpdateUser(user) if state.is_authenticated => SessionState {
            user: Some(user),
            ..state
        },
        SessionEvent::UpdateUser(_) => state,
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for every transition.

    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{User, UserRole};

    #[fixture]
    fn user() -> PublicUser {
        User::new("ana@hire.test", "Ana", UserRole::Applicant).to_public()
    }

    #[fixture]
    fn signed_in(user: PublicUser) -> SessionState {
        reduce(
            SessionState::initial(),
            SessionEvent::LoginSuccess {
                user,
                token: SessionToken::generate(),
            },
        )
    }

    #[rstest]
    fn restore_with_session_authenticates(user: PublicUser) {
        let token = SessionToken::generate();
        let state = reduce(
            SessionState::initial(),
            SessionEvent::RestoreSession(Some(RestoredSession {
                user: user.clone(),
                token: token.clone(),
            })),
        );
        assert_eq!(state.phase(), SessionPhase::Authenticated);
        assert_eq!(state.user, Some(user));
        assert_eq!(state.token, Some(token));
        assert!(!state.is_loading);
    }

    #[test]
    fn restore_without_session_clears_loading() {
        let state = reduce(SessionState::initial(), SessionEvent::RestoreSession(None));
        assert_eq!(state.phase(), SessionPhase::Anonymous);
        assert_eq!(state.route_gate(), RouteGate::Denied);
    }

    #[rstest]
    fn login_start_keeps_auth_state_and_clears_error(signed_in: SessionState) {
        let failed = reduce(
            SessionState::initial(),
            SessionEvent::LoginFailure("Invalid email or password".to_owned()),
        );
        let retrying = reduce(failed, SessionEvent::LoginStart);
        assert!(retrying.is_loading);
        assert!(retrying.error.is_none());
        assert!(!retrying.is_authenticated);

        let again = reduce(signed_in, SessionEvent::LoginStart);
        assert!(again.is_authenticated);
        assert_eq!(again.route_gate(), RouteGate::Loading);
    }

    #[rstest]
    fn login_failure_clears_session(signed_in: SessionState) {
        let state = reduce(signed_in, SessionEvent::LoginFailure("nope".to_owned()));
        assert!(state.user.is_none());
        assert!(state.token.is_none());
        assert!(!state.is_authenticated);
        assert!(!state.is_loading);
        assert_eq!(state.error.as_deref(), Some("nope"));
    }

    #[rstest]
    fn logout_after_login_start_is_consistent(signed_in: SessionState) {
        let loading = reduce(signed_in, SessionEvent::LoginStart);
        let state = reduce(loading, SessionEvent::Logout);
        assert_eq!(
            state,
            SessionState {
                is_loading: false,
                ..SessionState::initial()
            }
        );
    }

    #[rstest]
    fn update_user_keeps_token(signed_in: SessionState) {
        let token = signed_in.token.clone();
        let mut renamed = signed_in.user.clone().expect("signed in");
        renamed.name = "Ana Cruz".to_owned();
        let state = reduce(signed_in, SessionEvent::UpdateUser(renamed));
        assert_eq!(state.token, token);
        assert_eq!(state.user.map(|user| user.name), Some("Ana Cruz".to_owned()));
        assert!(state.is_authenticated);
    }

    #[rstest]
    fn update_user_is_ignored_when_signed_out(user: PublicUser) {
        let anonymous = reduce(SessionState::initial(), SessionEvent::RestoreSession(None));
        let state = reduce(anonymous.clone(), SessionEvent::UpdateUser(user));
        assert_eq!(state, anonymous);
    }

    #[test]
    fn tokens_are_unique_and_hidden_from_debug() {
        let first = SessionToken::generate();
        assert_ne!(first, SessionToken::generate());
        assert!(!format!("{first:?}").contains(first.as_str()));
        assert!(SessionToken::from_stored("  ").is_none());
    }
}
