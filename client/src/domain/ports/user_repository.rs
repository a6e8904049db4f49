//! Port abstraction for account persistence.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::document::FieldMap;
use super::document_store::DocumentStoreError;
use super::query::{TypedQuery, UserField};

/// Account persistence used by the auth and profile workflows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new account and return its id.
    async fn create(&self, user: &User) -> Result<UserId, DocumentStoreError>;

    /// Fetch an account by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DocumentStoreError>;

    /// Fetch the first account whose email matches exactly.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DocumentStoreError>;

    /// Merge `changes` into an existing account.
    async fn update(&self, id: &UserId, changes: FieldMap) -> Result<(), DocumentStoreError>;

    /// Remove an account; missing accounts are ignored.
    async fn delete(&self, id: &UserId) -> Result<(), DocumentStoreError>;

    /// Accounts matching a typed query.
    async fn list(&self, query: TypedQuery<UserField>) -> Result<Vec<User>, DocumentStoreError>;
}
