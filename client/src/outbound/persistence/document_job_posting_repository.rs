//! Job posting repository over the `jobPostings` collection.

use async_trait::async_trait;

use crate::domain::ports::{
    CollectionName, DocumentStoreError, JobPostingField, JobPostingRepository, TypedQuery,
};
use crate::domain::{DocumentAccess, JobPosting, JobPostingId};

use super::document_id;

/// [`JobPostingRepository`] backed by [`DocumentAccess`].
#[derive(Clone)]
pub struct DocumentJobPostingRepository {
    access: DocumentAccess,
}

impl DocumentJobPostingRepository {
    /// Wrap an access layer.
    pub fn new(access: DocumentAccess) -> Self {
        Self { access }
    }
}

#[async_trait]
impl JobPostingRepository for DocumentJobPostingRepository {
    async fn create(&self, posting: &JobPosting) -> Result<JobPostingId, DocumentStoreError> {
        let id = self
            .access
            .create(&CollectionName::JOB_POSTINGS, posting.to_fields())
            .await?;
        Ok(JobPostingId::from(id))
    }

    async fn find_by_id(
        &self,
        id: &JobPostingId,
    ) -> Result<Option<JobPosting>, DocumentStoreError> {
        let document = self
            .access
            .read(&CollectionName::JOB_POSTINGS, &document_id(id.as_str())?)
            .await?;
        Ok(document.as_ref().map(JobPosting::from_document))
    }

    async fn list(
        &self,
        query: TypedQuery<JobPostingField>,
    ) -> Result<Vec<JobPosting>, DocumentStoreError> {
        let found = self
            .access
            .get_all(&CollectionName::JOB_POSTINGS, &query.build())
            .await?;
        Ok(found.iter().map(JobPosting::from_document).collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use std::sync::Arc;

    use super::*;
    use crate::domain::ports::FilterOp;
    use crate::domain::WorkSetup;
    use crate::outbound::memory_store::InMemoryDocumentStore;

    #[tokio::test]
    async fn postings_round_trip_and_filter_by_skill() {
        let repo = DocumentJobPostingRepository::new(DocumentAccess::new(
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(mockable::DefaultClock),
        ));
        let mut posting = JobPosting::new("Backend Engineer", "Acme", "Cebu", "Full-time");
        posting.work_setup = Some(WorkSetup::Remote.into());
        posting.skills = vec!["Rust".to_owned(), "SQL".to_owned()];
        let id = repo.create(&posting).await.expect("create");

        let stored = repo.find_by_id(&id).await.expect("read").expect("present");
        assert_eq!(stored.job_title, "Backend Engineer");
        assert!(stored.is_remote());
        assert!(stored.created_at.is_some());

        let matches = repo
            .list(TypedQuery::new().filter(JobPostingField::Skills, FilterOp::ArrayContains, "Rust"))
            .await
            .expect("list");
        assert_eq!(matches.len(), 1);
        let none = repo
            .list(TypedQuery::new().filter(JobPostingField::Skills, FilterOp::ArrayContains, "Go"))
            .await
            .expect("list");
        assert!(none.is_empty());
    }
}
