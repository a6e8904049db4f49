//! Owned session container: applies events in arrival order and mirrors the
//! session to device storage.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{info, warn};

use crate::domain::ports::{AuthWorkflow, SessionStorage, SessionStorageError, StorageKey};
use crate::domain::session::{RestoredSession, SessionEvent, SessionState, SessionToken, reduce};
use crate::domain::{AuthError, LoginCredentials, PublicUser};

/// Injectable session container.
///
/// Each public operation holds the state lock for its whole duration, so
/// events and their storage writes apply atomically in arrival order.
pub struct SessionManager {
    state: Mutex<SessionState>,
    changes: watch::Sender<SessionState>,
    storage: Arc<dyn SessionStorage>,
    auth: Arc<dyn AuthWorkflow>,
}

impl SessionManager {
    /// Manager in the initial loading state.
    pub fn new(storage: Arc<dyn SessionStorage>, auth: Arc<dyn AuthWorkflow>) -> Self {
        let (changes, _) = watch::channel(SessionState::initial());
        Self {
            state: Mutex::new(SessionState::initial()),
            changes,
            storage,
            auth,
        }
    }

    /// Current snapshot.
    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Receiver notified after every applied event.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.changes.subscribe()
    }

    fn apply(&self, state: &mut SessionState, event: SessionEvent) {
        *state = reduce(state.clone(), event);
        self.changes.send_replace(state.clone());
    }

    /// Rebuild the session from storage.
    ///
    /// Missing, unreadable or corrupt entries restore an anonymous
    /// session; loading is always cleared.
    pub async fn restore(&self) -> SessionState {
        let mut state = self.state.lock().await;
        let restored = match self.read_stored_session().await {
            Ok(restored) => restored,
            Err(err) => {
                warn!(error = %err, "session restore failed, continuing signed out");
                None
            }
        };
        info!(restored = restored.is_some(), "session restore finished");
        self.apply(&mut state, SessionEvent::RestoreSession(restored));
        state.clone()
    }

    async fn read_stored_session(&self) -> Result<Option<RestoredSession>, SessionStorageError> {
        let token = self.storage.get_item(StorageKey::AuthToken).await?;
        let user_data = self.storage.get_item(StorageKey::UserData).await?;
        let (Some(token), Some(user_data)) = (token, user_data) else {
            return Ok(None);
        };
        let Some(token) = SessionToken::from_stored(&token) else {
            return Ok(None);
        };
        let user: PublicUser = serde_json::from_str(&user_data).map_err(|err| {
            SessionStorageError::read(StorageKey::UserData.as_str(), err.to_string())
        })?;
        Ok(Some(RestoredSession { user, token }))
    }

    /// Sign in and persist the new session.
    ///
    /// On failure the session is signed out, both storage keys are removed
    /// and the user-facing message is recorded.
    pub async fn login(&self, email: &str, password: &str) -> Result<PublicUser, AuthError> {
        let mut state = self.state.lock().await;
        self.apply(&mut state, SessionEvent::LoginStart);
        let credentials = LoginCredentials::new(email, password);
        let outcome = match self.auth.login(&credentials).await {
            Ok(user) => {
                let token = SessionToken::generate();
                match self.persist(&user, Some(&token)).await {
                    Ok(()) => Ok((user, token)),
                    Err(err) => {
                        warn!(error = %err, "failed to persist session");
                        Err(AuthError::Unavailable)
                    }
                }
            }
            Err(err) => Err(err),
        };
        match outcome {
            Ok((user, token)) => {
                info!(user_id = ?user.id, "signed in");
                self.apply(
                    &mut state,
                    SessionEvent::LoginSuccess {
                        user: user.clone(),
                        token,
                    },
                );
                Ok(user)
            }
            Err(err) => {
                self.forget_stored_session().await;
                self.apply(&mut state, SessionEvent::LoginFailure(err.to_string()));
                Err(err)
            }
        }
    }

    /// Remove both session keys so storage matches a signed-out state.
    async fn forget_stored_session(&self) {
        for key in [StorageKey::AuthToken, StorageKey::UserData] {
            if let Err(err) = self.storage.remove_item(key).await {
                warn!(error = %err, %key, "failed to clear stored session");
            }
        }
    }

    /// Sign out and forget the stored session.
    pub async fn logout(&self) -> Result<(), SessionStorageError> {
        let mut state = self.state.lock().await;
        self.storage.remove_item(StorageKey::AuthToken).await?;
        self.storage.remove_item(StorageKey::UserData).await?;
        self.apply(&mut state, SessionEvent::Logout);
        info!("signed out");
        Ok(())
    }

    /// Replace the signed-in account and persist it; the token is kept.
    ///
    /// Ignored while signed out.
    pub async fn update_user(&self, user: PublicUser) -> Result<SessionState, SessionStorageError> {
        let mut state = self.state.lock().await;
        if !state.is_authenticated {
            return Ok(state.clone());
        }
        self.persist(&user, None).await?;
        self.apply(&mut state, SessionEvent::UpdateUser(user));
        Ok(state.clone())
    }

    async fn persist(
        &self,
        user: &PublicUser,
        token: Option<&SessionToken>,
    ) -> Result<(), SessionStorageError> {
        let user_data = serde_json::to_string(user).map_err(|err| {
            SessionStorageError::write(StorageKey::UserData.as_str(), err.to_string())
        })?;
        self.storage.set_item(StorageKey::UserData, &user_data).await?;
        if let Some(token) = token {
            self.storage
                .set_item(StorageKey::AuthToken, token.as_str())
                .await?;
        }
        Ok(())
    }
}
