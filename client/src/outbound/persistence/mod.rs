//! Repository adapters backed by the document access layer.
//!
//! Each repository translates between domain records and document field
//! maps and builds its queries with the typed field enums. They hold no
//! business rules; timestamps come from [`DocumentAccess`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use hireboard::domain::DocumentAccess;
//! use hireboard::outbound::memory_store::InMemoryDocumentStore;
//! use hireboard::outbound::persistence::DocumentUserRepository;
//!
//! let access = DocumentAccess::new(
//!     Arc::new(InMemoryDocumentStore::new()),
//!     Arc::new(mockable::DefaultClock),
//! );
//! let _users = DocumentUserRepository::new(access);
//! ```
//!
//! [`DocumentAccess`]: crate::domain::DocumentAccess

mod document_catalogue_repository;
mod document_job_posting_repository;
mod document_user_repository;

pub use document_catalogue_repository::DocumentCatalogueRepository;
pub use document_job_posting_repository::DocumentJobPostingRepository;
pub use document_user_repository::DocumentUserRepository;

use crate::domain::ports::{DocumentId, DocumentStoreError};

// Domain ids are non-blank; this fails only on a malformed path segment.
fn document_id(raw: &str) -> Result<DocumentId, DocumentStoreError> {
    DocumentId::new(raw).map_err(|err| DocumentStoreError::invalid_query(err.to_string()))
}
