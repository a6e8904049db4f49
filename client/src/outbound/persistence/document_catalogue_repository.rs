//! Category and item repository over the legacy marketplace collections.

use async_trait::async_trait;

use crate::domain::ports::{
    CatalogueField, CatalogueRepository, CollectionName, DocumentId, DocumentStoreError,
    FieldMap, FilterOp, SortDirection, TypedQuery,
};
use crate::domain::{Category, DocumentAccess, Item, ItemFilter};

/// [`CatalogueRepository`] backed by [`DocumentAccess`].
#[derive(Clone)]
pub struct DocumentCatalogueRepository {
    access: DocumentAccess,
}

impl DocumentCatalogueRepository {
    /// Wrap an access layer.
    pub fn new(access: DocumentAccess) -> Self {
        Self { access }
    }
}

fn item_query(filter: &ItemFilter) -> TypedQuery<CatalogueField> {
    let mut query = TypedQuery::new().order_by(CatalogueField::CreatedAt, SortDirection::Descending);
    if let Some(category) = &filter.category {
        query = query.filter(CatalogueField::Category, FilterOp::Equal, category.as_str());
    }
    if let Some(seller_id) = &filter.seller_id {
        query = query.filter(CatalogueField::SellerId, FilterOp::Equal, seller_id.as_str());
    }
    if let Some(limit) = filter.limit {
        query = query.limit(limit);
    }
    query
}

#[async_trait]
impl CatalogueRepository for DocumentCatalogueRepository {
    async fn categories(&self) -> Result<Vec<Category>, DocumentStoreError> {
        let query = TypedQuery::new()
            .order_by(CatalogueField::Name, SortDirection::Ascending)
            .build();
        let found = self
            .access
            .get_all(&CollectionName::CATEGORIES, &query)
            .await?;
        Ok(found.iter().map(Category::from_document).collect())
    }

    async fn create_category(&self, category: &Category) -> Result<DocumentId, DocumentStoreError> {
        self.access
            .create(&CollectionName::CATEGORIES, category.to_fields())
            .await
    }

    async fn create_item(&self, item: &Item) -> Result<DocumentId, DocumentStoreError> {
        self.access
            .create(&CollectionName::ITEMS, item.to_fields())
            .await
    }

    async fn item(&self, id: &DocumentId) -> Result<Option<Item>, DocumentStoreError> {
        let document = self.access.read(&CollectionName::ITEMS, id).await?;
        Ok(document.as_ref().map(Item::from_document))
    }

    async fn items(&self, filter: &ItemFilter) -> Result<Vec<Item>, DocumentStoreError> {
        let found = self
            .access
            .get_all(&CollectionName::ITEMS, &item_query(filter).build())
            .await?;
        Ok(found.iter().map(Item::from_document).collect())
    }

    async fn update_item(
        &self,
        id: &DocumentId,
        changes: FieldMap,
    ) -> Result<(), DocumentStoreError> {
        self.access.update(&CollectionName::ITEMS, id, changes).await
    }

    async fn delete_item(&self, id: &DocumentId) -> Result<(), DocumentStoreError> {
        self.access.delete(&CollectionName::ITEMS, id).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, Duration, Local, TimeZone, Utc};
    use mockable::Clock;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{FieldValue, OrderBy};
    use crate::domain::{ITEM_STATUS_AVAILABLE, UserId};
    use crate::outbound::memory_store::InMemoryDocumentStore;

    struct SteppingClock(Mutex<DateTime<Utc>>);

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            let mut now = self.0.lock().expect("clock lock");
            *now += Duration::seconds(1);
            *now
        }
    }

    fn repo() -> DocumentCatalogueRepository {
        let start = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        DocumentCatalogueRepository::new(DocumentAccess::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(SteppingClock(Mutex::new(start))),
        ))
    }

    fn item(title: &str, category: &str, seller: &str) -> Item {
        Item {
            id: None,
            title: title.to_owned(),
            description: String::new(),
            price: 10.0,
            category: category.to_owned(),
            condition: "Good".to_owned(),
            images: Vec::new(),
            location: "Cebu".to_owned(),
            seller_id: UserId::new(seller),
            status: ITEM_STATUS_AVAILABLE.to_owned(),
            created_at: None,
            updated_at: None,
        }
    }

    #[rstest]
    fn item_query_orders_newest_first() {
        let query = item_query(&ItemFilter {
            category: Some("Books".to_owned()),
            seller_id: None,
            limit: Some(3),
        })
        .build();
        assert_eq!(
            query.order_by,
            Some(OrderBy {
                field: "createdAt".to_owned(),
                direction: SortDirection::Descending,
            })
        );
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters[0].value, FieldValue::from("Books"));
        assert_eq!(query.limit, Some(3));
    }

    #[tokio::test]
    async fn items_filter_by_seller_newest_first() {
        let repo = repo();
        for (title, seller) in [("old", "s-1"), ("other", "s-2"), ("new", "s-1")] {
            repo.create_item(&item(title, "Books", seller))
                .await
                .expect("create");
        }
        let seller = UserId::new("s-1").expect("id");
        let titles: Vec<_> = repo
            .user_items(&seller)
            .await
            .expect("list")
            .into_iter()
            .map(|item| item.title)
            .collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn categories_sort_by_name() {
        let repo = repo();
        for name in ["Jobs", "Books", "Electronics"] {
            repo.create_category(&Category::new(name, "*", ""))
                .await
                .expect("create");
        }
        let names: Vec<_> = repo
            .categories()
            .await
            .expect("list")
            .into_iter()
            .map(|category| category.name)
            .collect();
        assert_eq!(names, vec!["Books", "Electronics", "Jobs"]);
    }
}
