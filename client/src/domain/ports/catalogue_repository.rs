//! Port abstraction for the legacy marketplace collections.

use async_trait::async_trait;

use crate::domain::{Category, Item, ItemFilter, UserId};

use super::document::{DocumentId, FieldMap};
use super::document_store::DocumentStoreError;

/// Category and item persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// Categories ordered by name.
    async fn categories(&self) -> Result<Vec<Category>, DocumentStoreError>;

    /// Store a new category.
    async fn create_category(&self, category: &Category) -> Result<DocumentId, DocumentStoreError>;

    /// Store a new item.
    async fn create_item(&self, item: &Item) -> Result<DocumentId, DocumentStoreError>;

    /// Fetch an item by id.
    async fn item(&self, id: &DocumentId) -> Result<Option<Item>, DocumentStoreError>;

    /// Items matching `filter`, newest first.
    async fn items(&self, filter: &ItemFilter) -> Result<Vec<Item>, DocumentStoreError>;

    /// Items sold by one account, newest first.
    async fn user_items(&self, seller_id: &UserId) -> Result<Vec<Item>, DocumentStoreError> {
        self.items(&ItemFilter::by_seller(seller_id.clone())).await
    }

    /// Merge `changes` into an existing item.
    async fn update_item(&self, id: &DocumentId, changes: FieldMap)
    -> Result<(), DocumentStoreError>;

    /// Remove an item; missing items are ignored.
    async fn delete_item(&self, id: &DocumentId) -> Result<(), DocumentStoreError>;
}
