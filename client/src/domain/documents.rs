//! Collection-oriented access to the document store.
//!
//! [`DocumentAccess`] is the single place that stamps `createdAt` and
//! `updatedAt`, checks queries before they leave the process and turns the
//! store's one-shot reads into polling subscriptions.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::domain::ports::{
    CollectionName, Document, DocumentId, DocumentQuery, DocumentStore, DocumentStoreError,
    FieldMap, FieldValue,
};

/// Field stamped with the creation time.
pub const CREATED_AT: &str = "createdAt";
/// Field stamped with the last write time.
pub const UPDATED_AT: &str = "updatedAt";

/// How often subscriptions re-run their read unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// CRUD, query and subscription operations over a [`DocumentStore`].
///
/// # Examples
/// ```
/// # use std::sync::Arc;
/// # use hireboard::domain::DocumentAccess;
/// # use hireboard::domain::ports::{CollectionName, FieldMap};
/// # use hireboard::outbound::memory_store::InMemoryDocumentStore;
/// # async fn example() -> Result<(), hireboard::domain::ports::DocumentStoreError> {
/// let access = DocumentAccess::new(
///     Arc::new(InMemoryDocumentStore::default()),
///     Arc::new(mockable::DefaultClock),
/// );
/// let id = access.create(&CollectionName::TEST, FieldMap::new()).await?;
/// let stored = access.read(&CollectionName::TEST, &id).await?;
/// assert!(stored.is_some_and(|doc| doc.get("createdAt").is_some()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DocumentAccess {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
}

impl DocumentAccess {
    /// Wrap a store and the clock used for timestamps.
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Change the subscription polling interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Clock used for timestamps.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Insert `data` with both timestamps set to now; returns the new id.
    pub async fn create(
        &self,
        collection: &CollectionName,
        mut data: FieldMap,
    ) -> Result<DocumentId, DocumentStoreError> {
        let now = FieldValue::Timestamp(self.clock.utc());
        data.insert(CREATED_AT.to_owned(), now.clone());
        data.insert(UPDATED_AT.to_owned(), now);
        let id = self.store.insert(collection, data).await?;
        debug!(%collection, %id, "document created");
        Ok(id)
    }

    /// Fetch one document; absence is `Ok(None)`.
    pub async fn read(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError> {
        self.store.get(collection, id).await
    }

    /// Merge `partial` into an existing document and stamp `updatedAt`.
    ///
    /// Fails with [`DocumentStoreError::NotFound`] when the document is
    /// missing.
    pub async fn update(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        mut partial: FieldMap,
    ) -> Result<(), DocumentStoreError> {
        partial.insert(UPDATED_AT.to_owned(), FieldValue::Timestamp(self.clock.utc()));
        self.store.merge(collection, id, partial).await?;
        debug!(%collection, %id, "document updated");
        Ok(())
    }

    /// Remove a document; removing a missing one succeeds.
    pub async fn delete(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
    ) -> Result<(), DocumentStoreError> {
        self.store.remove(collection, id).await?;
        debug!(%collection, %id, "document deleted");
        Ok(())
    }

    /// Documents matching `query`, ordered by the sort field then id.
    ///
    /// Structurally broken queries fail with
    /// [`DocumentStoreError::InvalidQuery`] without reaching the store.
    pub async fn get_all(
        &self,
        collection: &CollectionName,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        query
            .check()
            .map_err(|err| DocumentStoreError::invalid_query(err.to_string()))?;
        self.store.query(collection, query).await
    }

    /// Poll `query` and call `callback` with the full result set on the
    /// first successful read and whenever it changes.
    ///
    /// Failed polls are logged and retried on the next tick.
    pub fn subscribe_to_collection<F>(
        &self,
        collection: CollectionName,
        query: DocumentQuery,
        mut callback: F,
    ) -> Subscription
    where
        F: FnMut(Vec<Document>) + Send + 'static,
    {
        let access = self.clone();
        let mut last: Option<Vec<Document>> = None;
        let handle = tokio::spawn(async move {
            let mut ticker = access.ticker();
            loop {
                ticker.tick().await;
                match access.get_all(&collection, &query).await {
                    Ok(documents) => {
                        if last.as_ref() != Some(&documents) {
                            last = Some(documents.clone());
                            callback(documents);
                        }
                    }
                    Err(err) => log_poll_failure(&collection, None, &err),
                }
            }
        });
        Subscription::new(handle)
    }

    /// Poll one document and call `callback` with its current state on the
    /// first successful read and whenever it changes.
    pub fn subscribe_to_document<F>(
        &self,
        collection: CollectionName,
        id: DocumentId,
        mut callback: F,
    ) -> Subscription
    where
        F: FnMut(Option<Document>) + Send + 'static,
    {
        let access = self.clone();
        let mut last: Option<Option<Document>> = None;
        let handle = tokio::spawn(async move {
            let mut ticker = access.ticker();
            loop {
                ticker.tick().await;
                match access.read(&collection, &id).await {
                    Ok(document) => {
                        if last.as_ref() != Some(&document) {
                            last = Some(document.clone());
                            callback(document);
                        }
                    }
                    Err(err) => log_poll_failure(&collection, Some(&id), &err),
                }
            }
        });
        Subscription::new(handle)
    }

    fn ticker(&self) -> tokio::time::Interval {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }
}

fn log_poll_failure(collection: &CollectionName, id: Option<&DocumentId>, err: &DocumentStoreError) {
    let id = id.map(DocumentId::as_str).unwrap_or_default();
    if err.is_retryable() {
        debug!(%collection, id, error = %err, "subscription poll failed, retrying");
    } else {
        warn!(%collection, id, error = %err, "subscription poll failed");
    }
}

/// Handle to a running subscription.
///
/// Polling stops on [`Subscription::unsubscribe`] or when the handle is
/// dropped.
#[derive(Debug)]
#[must_use = "dropping a subscription stops it"]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }

    /// Stop polling.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Whether the polling task has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
