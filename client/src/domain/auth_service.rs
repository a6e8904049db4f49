//! Login and registration against the account repository.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{AuthWorkflow, CredentialHasher, UserRepository};
use crate::domain::{AuthError, LoginCredentials, PublicUser, RegistrationRequest, User};

/// [`AuthWorkflow`] implementation.
///
/// Every login failure surfaces as [`AuthError::InvalidCredentials`] so
/// callers cannot tell unknown emails from wrong passwords.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AuthService {
    /// Create the service.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use hireboard::domain::{AuthService, DocumentAccess};
    /// # use hireboard::domain::ports::FixtureCredentialHasher;
    /// # use hireboard::outbound::memory_store::InMemoryDocumentStore;
    /// # use hireboard::outbound::persistence::DocumentUserRepository;
    /// let access = DocumentAccess::new(
    ///     Arc::new(InMemoryDocumentStore::new()),
    ///     Arc::new(mockable::DefaultClock),
    /// );
    /// let _auth = AuthService::new(
    ///     Arc::new(DocumentUserRepository::new(access)),
    ///     Arc::new(FixtureCredentialHasher),
    /// );
    /// ```
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl AuthWorkflow for AuthService {
    async fn login(&self, credentials: &LoginCredentials) -> Result<PublicUser, AuthError> {
        let report = credentials.validate();
        if !report.is_valid() {
            return Err(AuthError::Validation(report));
        }
        let user = match self.users.find_by_email(credentials.email()).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                info!("login rejected: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
            Err(err) => {
                warn!(error = %err, "login lookup failed");
                return Err(AuthError::InvalidCredentials);
            }
        };
        let verified = user
            .password_hash()
            .is_some_and(|hash| self.hasher.verify(credentials.password(), hash));
        if !verified {
            info!(user_id = ?user.id, "login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }
        info!(user_id = ?user.id, "login succeeded");
        Ok(user.to_public())
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<PublicUser, AuthError> {
        let report = request.validate();
        let Some(role) = request.role().filter(|_| report.is_valid()) else {
            return Err(AuthError::Validation(report));
        };
        match self.users.find_by_email(request.email()).await {
            Ok(Some(_)) => return Err(AuthError::EmailAlreadyRegistered),
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "registration lookup failed");
                return Err(AuthError::Unavailable);
            }
        }
        let hash = self.hasher.hash(request.password()).map_err(|err| {
            warn!(error = %err, "password hashing failed");
            AuthError::Unavailable
        })?;
        let mut user = User::new(request.email(), request.name(), role).with_password_hash(hash);
        let id = self.users.create(&user).await.map_err(|err| {
            warn!(error = %err, "account creation failed");
            AuthError::Unavailable
        })?;
        info!(user_id = %id, "account registered");
        user.id = Some(id);
        Ok(user.to_public())
    }
}
