//! Process-local document store with the same query semantics as the
//! remote store.
//!
//! Used by tests, the seeding CLI's dry runs and local development. Results
//! are ordered by the sort field, then by document id in the same
//! direction; documents lacking the sort field are left out, as the remote
//! store does.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    CollectionName, Document, DocumentCursor, DocumentId, DocumentQuery, DocumentStore,
    DocumentStoreError, FieldMap, FieldValue, OrderBy, SortDirection,
};

type Collection = BTreeMap<String, FieldMap>;

/// In-memory [`DocumentStore`].
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryDocumentStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`.
    pub fn len(&self, collection: &CollectionName) -> usize {
        self.read()
            .map(|collections| collections.get(collection.as_str()).map_or(0, BTreeMap::len))
            .unwrap_or_default()
    }

    /// Whether `collection` holds no documents.
    pub fn is_empty(&self, collection: &CollectionName) -> bool {
        self.len(collection) == 0
    }

    /// Store `fields` under a caller-chosen id, replacing any existing
    /// document.
    pub fn put(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        fields: FieldMap,
    ) -> Result<(), DocumentStoreError> {
        self.write()?
            .entry(collection.as_str().to_owned())
            .or_default()
            .insert(id.as_str().to_owned(), fields);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Collection>>, DocumentStoreError> {
        self.collections
            .read()
            .map_err(|_| DocumentStoreError::connection("in-memory store lock poisoned"))
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<String, Collection>>, DocumentStoreError> {
        self.collections
            .write()
            .map_err(|_| DocumentStoreError::connection("in-memory store lock poisoned"))
    }
}

fn to_document(id: &str, fields: &FieldMap) -> Result<Document, DocumentStoreError> {
    let id = DocumentId::new(id).map_err(|err| DocumentStoreError::decode(err.to_string()))?;
    Ok(Document::new(id, fields.clone()))
}

fn sort_value<'a>(document: &'a Document, order: &OrderBy) -> Option<&'a FieldValue> {
    document.get(&order.field)
}

// Position of a document under the query order: sort value then id.
fn compare_position(
    order: Option<&OrderBy>,
    left: (Option<&FieldValue>, &str),
    right: (Option<&FieldValue>, &str),
) -> Ordering {
    let direction = order.map_or(SortDirection::Ascending, |order| order.direction);
    let by_value = match (left.0, right.0) {
        (Some(a), Some(b)) => a.total_cmp(b),
        _ => Ordering::Equal,
    };
    direction.apply(by_value.then_with(|| left.1.cmp(right.1)))
}

fn is_after(document: &Document, cursor: &DocumentCursor, order: Option<&OrderBy>) -> bool {
    let value = order.and_then(|order| sort_value(document, order));
    compare_position(
        order,
        (value, document.id.as_str()),
        (cursor.order_value.as_ref(), cursor.document_id.as_str()),
    )
    .is_gt()
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(
        &self,
        collection: &CollectionName,
        fields: FieldMap,
    ) -> Result<DocumentId, DocumentStoreError> {
        let raw = Uuid::new_v4().simple().to_string();
        let id = DocumentId::new(raw).map_err(|err| DocumentStoreError::rejected(err.to_string()))?;
        self.put(collection, &id, fields)?;
        Ok(id)
    }

    async fn get(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let collections = self.read()?;
        collections
            .get(collection.as_str())
            .and_then(|docs| docs.get(id.as_str()))
            .map(|fields| to_document(id.as_str(), fields))
            .transpose()
    }

    async fn merge(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        fields: FieldMap,
    ) -> Result<(), DocumentStoreError> {
        let mut collections = self.write()?;
        let existing = collections
            .get_mut(collection.as_str())
            .and_then(|docs| docs.get_mut(id.as_str()))
            .ok_or_else(|| DocumentStoreError::not_found(collection.as_str(), id.as_str()))?;
        existing.extend(fields);
        Ok(())
    }

    async fn remove(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
    ) -> Result<(), DocumentStoreError> {
        if let Some(docs) = self.write()?.get_mut(collection.as_str()) {
            docs.remove(id.as_str());
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: &CollectionName,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        query
            .check()
            .map_err(|err| DocumentStoreError::invalid_query(err.to_string()))?;
        let order = query.order_by.as_ref();
        let mut matches = {
            let collections = self.read()?;
            let Some(docs) = collections.get(collection.as_str()) else {
                return Ok(Vec::new());
            };
            docs.iter()
                .map(|(id, fields)| to_document(id, fields))
                .collect::<Result<Vec<_>, _>>()?
        };
        matches.retain(|document| {
            query.filters.iter().all(|filter| filter.matches(document))
                && order.is_none_or(|order| sort_value(document, order).is_some())
                && query
                    .start_after
                    .as_ref()
                    .is_none_or(|cursor| is_after(document, cursor, order))
        });
        matches.sort_by(|left, right| {
            compare_position(
                order,
                (order.and_then(|o| sort_value(left, o)), left.id.as_str()),
                (order.and_then(|o| sort_value(right, o)), right.id.as_str()),
            )
        });
        if let Some(limit) = query.limit {
            matches.truncate(limit);
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for query semantics.

    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::FilterOp;

    fn fields(pairs: Vec<(&str, FieldValue)>) -> FieldMap {
        pairs
            .into_iter()
            .map(|(key, value)| (key.to_owned(), value))
            .collect()
    }

    fn ids(documents: &[Document]) -> Vec<&str> {
        documents.iter().map(|doc| doc.id.as_str()).collect()
    }

    #[fixture]
    fn store() -> InMemoryDocumentStore {
        let store = InMemoryDocumentStore::new();
        let rows = [
            ("a", "Jobs", 3_i64, vec!["rust"]),
            ("b", "Jobs", 1, vec!["go", "rust"]),
            ("c", "Books", 2, vec![]),
            ("d", "Jobs", 1, vec!["python"]),
        ];
        for (id, category, rank, tags) in rows {
            store
                .put(
                    &CollectionName::ITEMS,
                    &DocumentId::new(id).expect("id"),
                    fields(vec![
                        ("category", category.into()),
                        ("rank", rank.into()),
                        ("tags", FieldValue::list(tags)),
                    ]),
                )
                .expect("seed");
        }
        store
    }

    #[rstest]
    #[tokio::test]
    async fn equality_filters_and_ties_break_on_id(store: InMemoryDocumentStore) {
        let query = DocumentQuery::new()
            .filter("category", FilterOp::Equal, "Jobs")
            .order_by("rank", SortDirection::Ascending);
        let found = store.query(&CollectionName::ITEMS, &query).await.expect("query");
        assert_eq!(ids(&found), vec!["b", "d", "a"]);
    }

    #[rstest]
    #[tokio::test]
    async fn descending_order_reverses_tie_break(store: InMemoryDocumentStore) {
        let query = DocumentQuery::new().order_by("rank", SortDirection::Descending);
        let found = store.query(&CollectionName::ITEMS, &query).await.expect("query");
        assert_eq!(ids(&found), vec!["a", "c", "d", "b"]);
    }

    #[rstest]
    #[case(FilterOp::ArrayContains, FieldValue::from("rust"), vec!["a", "b"])]
    #[case(FilterOp::In, FieldValue::list(["Books"]), vec!["c"])]
    #[case(FilterOp::NotEqual, FieldValue::from("Jobs"), vec!["c"])]
    #[tokio::test]
    async fn operators_filter_documents(
        store: InMemoryDocumentStore,
        #[case] op: FilterOp,
        #[case] value: FieldValue,
        #[case] expected: Vec<&str>,
    ) {
        let field = if op == FilterOp::ArrayContains { "tags" } else { "category" };
        let query = DocumentQuery::new().filter(field, op, value);
        let found = store.query(&CollectionName::ITEMS, &query).await.expect("query");
        assert_eq!(ids(&found), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn start_after_resumes_past_cursor(store: InMemoryDocumentStore) {
        let query = DocumentQuery::new()
            .order_by("rank", SortDirection::Ascending)
            .limit(2);
        let first = store.query(&CollectionName::ITEMS, &query).await.expect("query");
        assert_eq!(ids(&first), vec!["b", "d"]);
        let last = first.last().expect("non-empty page");
        let next = query.clone().start_after(query.cursor_after(last));
        let second = store.query(&CollectionName::ITEMS, &next).await.expect("query");
        assert_eq!(ids(&second), vec!["c", "a"]);
    }

    #[rstest]
    #[tokio::test]
    async fn documents_without_sort_field_are_skipped(store: InMemoryDocumentStore) {
        let query = DocumentQuery::new().order_by("missing", SortDirection::Ascending);
        let found = store.query(&CollectionName::ITEMS, &query).await.expect("query");
        assert!(found.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn merge_requires_existing_document(store: InMemoryDocumentStore) {
        let ghost = DocumentId::new("ghost").expect("id");
        let err = store
            .merge(&CollectionName::ITEMS, &ghost, FieldMap::new())
            .await
            .expect_err("missing document");
        assert_eq!(err, DocumentStoreError::not_found("items", "ghost"));

        let a = DocumentId::new("a").expect("id");
        store
            .merge(&CollectionName::ITEMS, &a, fields(vec![("rank", 9_i64.into())]))
            .await
            .expect("merge");
        let doc = store
            .get(&CollectionName::ITEMS, &a)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(doc.get("rank"), Some(&FieldValue::Integer(9)));
        assert_eq!(doc.get("category"), Some(&FieldValue::from("Jobs")));
    }

    #[rstest]
    #[tokio::test]
    async fn remove_is_idempotent(store: InMemoryDocumentStore) {
        let a = DocumentId::new("a").expect("id");
        store.remove(&CollectionName::ITEMS, &a).await.expect("remove");
        store.remove(&CollectionName::ITEMS, &a).await.expect("remove again");
        assert_eq!(store.len(&CollectionName::ITEMS), 3);
    }

    #[tokio::test]
    async fn insert_generates_distinct_ids() {
        let store = InMemoryDocumentStore::new();
        let first = store
            .insert(&CollectionName::TEST, FieldMap::new())
            .await
            .expect("insert");
        let second = store
            .insert(&CollectionName::TEST, FieldMap::new())
            .await
            .expect("insert");
        assert_ne!(first, second);
    }
}
