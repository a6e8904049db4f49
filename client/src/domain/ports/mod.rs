//! Domain ports and the document model they exchange.
//!
//! Ports describe how the domain talks to driven adapters: the remote
//! document store, device-local session storage and the password hasher.
//! Each trait exposes strongly typed errors so adapters map their failures
//! into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_workflow;
mod catalogue_repository;
mod credential_hasher;
mod document;
mod document_store;
mod job_posting_repository;
mod query;
mod session_storage;
mod user_repository;

pub use auth_workflow::AuthWorkflow;
#[cfg(test)]
pub use auth_workflow::MockAuthWorkflow;
pub use catalogue_repository::CatalogueRepository;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHashError, CredentialHasher, FixtureCredentialHasher};
pub use document::{
    CollectionName, Document, DocumentId, DocumentPathError, FieldMap, FieldValue,
};
#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{DocumentStore, DocumentStoreError};
pub use job_posting_repository::JobPostingRepository;
#[cfg(test)]
pub use job_posting_repository::MockJobPostingRepository;
pub use query::{
    CatalogueField, DocumentCursor, DocumentField, DocumentQuery, Filter, FilterOp,
    JobPostingField, OrderBy, QueryError, SortDirection, TypedQuery, UnknownFilterOp, UserField,
};
#[cfg(test)]
pub use session_storage::MockSessionStorage;
pub use session_storage::{
    MemorySessionStorage, SessionStorage, SessionStorageError, StorageKey,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
