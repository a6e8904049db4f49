//! Driven port for the remote document store.
//!
//! Adapters translate these calls into the store's own protocol. They do not
//! stamp timestamps or apply defaults; the document access layer does that
//! once for every adapter.

use async_trait::async_trait;

use super::define_port_error;
use super::document::{CollectionName, Document, DocumentId, FieldMap};
use super::query::DocumentQuery;

define_port_error! {
    /// Errors raised by document store adapters.
    pub enum DocumentStoreError {
        /// The store could not be reached.
        Connection { message: String } =>
            "document store connection failed: {message}"; retryable,
        /// The store did not answer in time.
        Timeout { message: String } =>
            "document store request timed out: {message}"; retryable,
        /// The store asked the client to back off.
        RateLimited { message: String } =>
            "document store rate limited the request: {message}"; retryable,
        /// Credentials were missing or lacked access.
        PermissionDenied { message: String } =>
            "document store denied access: {message}",
        /// An update targeted a document that does not exist.
        NotFound { collection: String, id: String } =>
            "document {collection}/{id} does not exist",
        /// The query was malformed or unsupported.
        InvalidQuery { message: String } =>
            "document store rejected the query: {message}",
        /// The store rejected a write for another reason.
        Rejected { message: String } =>
            "document store rejected the write: {message}",
        /// A response could not be decoded.
        Decode { message: String } =>
            "document store response could not be decoded: {message}",
    }
}

/// Port for collection-oriented document persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return its generated id.
    async fn insert(
        &self,
        collection: &CollectionName,
        fields: FieldMap,
    ) -> Result<DocumentId, DocumentStoreError>;

    /// Fetch a document; `None` when absent.
    async fn get(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
    ) -> Result<Option<Document>, DocumentStoreError>;

    /// Merge fields into an existing document.
    ///
    /// Fails with [`DocumentStoreError::NotFound`] when the document does
    /// not exist.
    async fn merge(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
        fields: FieldMap,
    ) -> Result<(), DocumentStoreError>;

    /// Remove a document. Removing a missing document succeeds.
    async fn remove(
        &self,
        collection: &CollectionName,
        id: &DocumentId,
    ) -> Result<(), DocumentStoreError>;

    /// Run a query and return matching documents in query order.
    async fn query(
        &self,
        collection: &CollectionName,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, DocumentStoreError>;
}
