//! Driving port for the login and registration use-cases.
//!
//! The session manager talks to this trait so its tests can substitute a
//! double instead of wiring a store and a hasher.

use async_trait::async_trait;

use crate::domain::{AuthError, LoginCredentials, PublicUser, RegistrationRequest};

/// Login and registration use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthWorkflow: Send + Sync {
    /// Verify credentials and return the signed-in account.
    async fn login(&self, credentials: &LoginCredentials) -> Result<PublicUser, AuthError>;

    /// Create an account and return it with its new id.
    async fn register(&self, request: &RegistrationRequest) -> Result<PublicUser, AuthError>;
}
