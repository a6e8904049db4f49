//! Firestore REST adapter for the document store port.
//!
//! Speaks the v1 REST API over reqwest: documents are addressed as
//! `{endpoint}/v1/projects/{p}/databases/{d}/documents/{collection}/{id}`
//! and queries go through `:runQuery` structured queries.

mod http_store;
mod query;
mod value;

pub use http_store::{
    DEFAULT_DATABASE_ID, DEFAULT_FIRESTORE_ENDPOINT, DEFAULT_REQUEST_TIMEOUT, FirestoreConfig,
    FirestoreDocumentStore,
};
