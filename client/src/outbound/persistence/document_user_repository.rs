//! Account repository over the `users` collection.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    CollectionName, DocumentStoreError, FieldMap, FilterOp, TypedQuery, UserField, UserRepository,
};
use crate::domain::{DocumentAccess, User, UserId};

use super::document_id;

/// [`UserRepository`] backed by [`DocumentAccess`].
#[derive(Clone)]
pub struct DocumentUserRepository {
    access: DocumentAccess,
}

impl DocumentUserRepository {
    /// Wrap an access layer.
    pub fn new(access: DocumentAccess) -> Self {
        Self { access }
    }
}

#[async_trait]
impl UserRepository for DocumentUserRepository {
    async fn create(&self, user: &User) -> Result<UserId, DocumentStoreError> {
        let id = self
            .access
            .create(&CollectionName::USERS, user.to_fields())
            .await?;
        Ok(UserId::from(id))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DocumentStoreError> {
        let document = self
            .access
            .read(&CollectionName::USERS, &document_id(id.as_str())?)
            .await?;
        Ok(document.as_ref().map(User::from_document))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DocumentStoreError> {
        let query = TypedQuery::new()
            .filter(UserField::Email, FilterOp::Equal, email)
            .limit(1)
            .build();
        let found = self.access.get_all(&CollectionName::USERS, &query).await?;
        debug!(matches = found.len(), "looked up account by email");
        Ok(found.first().map(User::from_document))
    }

    async fn update(&self, id: &UserId, changes: FieldMap) -> Result<(), DocumentStoreError> {
        self.access
            .update(&CollectionName::USERS, &document_id(id.as_str())?, changes)
            .await
    }

    async fn delete(&self, id: &UserId) -> Result<(), DocumentStoreError> {
        self.access
            .delete(&CollectionName::USERS, &document_id(id.as_str())?)
            .await
    }

    async fn list(&self, query: TypedQuery<UserField>) -> Result<Vec<User>, DocumentStoreError> {
        let found = self
            .access
            .get_all(&CollectionName::USERS, &query.build())
            .await?;
        Ok(found.iter().map(User::from_document).collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use std::sync::Arc;

    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::{FieldValue, SortDirection};
    use crate::domain::{PasswordHash, UserRole};
    use crate::outbound::memory_store::InMemoryDocumentStore;

    #[fixture]
    fn repo() -> DocumentUserRepository {
        DocumentUserRepository::new(DocumentAccess::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(mockable::DefaultClock),
        ))
    }

    #[rstest]
    #[tokio::test]
    async fn created_accounts_are_found_by_email_and_id(repo: DocumentUserRepository) {
        let user = User::new("ana@hire.test", "Ana", UserRole::Employer)
            .with_password_hash(PasswordHash::new("fixture$secret1"));
        let id = repo.create(&user).await.expect("create");

        let by_email = repo
            .find_by_email("ana@hire.test")
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(by_email.id.as_ref(), Some(&id));
        assert_eq!(by_email.role, UserRole::Employer);
        assert!(by_email.created_at.is_some());
        assert_eq!(by_email.password_hash(), user.password_hash());

        let by_id = repo.find_by_id(&id).await.expect("lookup");
        assert_eq!(by_id.map(|found| found.email), Some("ana@hire.test".to_owned()));
    }

    #[rstest]
    #[tokio::test]
    async fn email_lookup_is_exact(repo: DocumentUserRepository) {
        repo.create(&User::new("ana@hire.test", "Ana", UserRole::Applicant))
            .await
            .expect("create");
        assert!(repo.find_by_email("ANA@hire.test").await.expect("lookup").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn update_merges_and_delete_removes(repo: DocumentUserRepository) {
        let id = repo
            .create(&User::new("ana@hire.test", "Ana", UserRole::Applicant))
            .await
            .expect("create");
        let mut changes = FieldMap::new();
        changes.insert("bio".to_owned(), FieldValue::from("Rustacean"));
        repo.update(&id, changes).await.expect("update");
        let stored = repo.find_by_id(&id).await.expect("read").expect("present");
        assert_eq!(stored.bio, "Rustacean");
        assert_eq!(stored.name, "Ana");

        repo.delete(&id).await.expect("delete");
        assert!(repo.find_by_id(&id).await.expect("read").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn list_applies_typed_query(repo: DocumentUserRepository) {
        for (email, name) in [("b@hire.test", "Bea"), ("a@hire.test", "Ana")] {
            repo.create(&User::new(email, name, UserRole::Applicant))
                .await
                .expect("create");
        }
        let users = repo
            .list(TypedQuery::new().order_by(UserField::Name, SortDirection::Ascending))
            .await
            .expect("list");
        let names: Vec<_> = users.iter().map(|user| user.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bea"]);
    }
}
