//! Port abstraction for job posting persistence.

use async_trait::async_trait;

use crate::domain::{JobPosting, JobPostingId};

use super::document_store::DocumentStoreError;
use super::query::{JobPostingField, TypedQuery};

/// Job posting persistence used by the job board.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobPostingRepository: Send + Sync {
    /// Store a new posting and return its id.
    async fn create(&self, posting: &JobPosting) -> Result<JobPostingId, DocumentStoreError>;

    /// Fetch a posting by id.
    async fn find_by_id(
        &self,
        id: &JobPostingId,
    ) -> Result<Option<JobPosting>, DocumentStoreError>;

    /// Postings matching a typed query, in query order.
    async fn list(
        &self,
        query: TypedQuery<JobPostingField>,
    ) -> Result<Vec<JobPosting>, DocumentStoreError>;
}
