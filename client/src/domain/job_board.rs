//! Job browsing with opaque page cursors.
//!
//! Listings are ordered newest first by `createdAt`, ties broken by id. The
//! cursor handed to callers wraps the last posting's timestamp and id.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pagination::{Cursor, CursorError, Page, PageRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::ports::{
    DocumentCursor, DocumentId, DocumentStoreError, FieldValue, FilterOp, JobPostingField,
    JobPostingRepository, SortDirection, TypedQuery,
};
use crate::domain::{DomainError, JobPosting, JobPostingId, UserId, ValidationReport, WorkSetup};

/// Resume key carried inside job board cursors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct JobCursorKey {
    #[serde(rename = "t")]
    created_at: DateTime<Utc>,
    #[serde(rename = "i")]
    id: String,
}

/// Optional narrowing of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSearch {
    /// Only postings of this employer.
    pub employer_id: Option<UserId>,
    /// Only postings with this work setup.
    pub work_setup: Option<WorkSetup>,
    /// Only postings listing this skill.
    pub skill: Option<String>,
}

/// Failures of the job board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobBoardError {
    /// The cursor was not issued by this board.
    #[error("invalid page cursor")]
    InvalidCursor,
    /// A new posting broke the listing rules.
    #[error("{}", .0.joined())]
    Validation(ValidationReport),
    /// The store could not complete the call.
    #[error("Job postings are unavailable, please try again")]
    Unavailable,
}

impl From<JobBoardError> for DomainError {
    fn from(value: JobBoardError) -> Self {
        let message = value.to_string();
        match value {
            JobBoardError::InvalidCursor | JobBoardError::Validation(_) => {
                Self::invalid_request(message)
            }
            JobBoardError::Unavailable => Self::service_unavailable(message),
        }
    }
}

impl From<CursorError> for JobBoardError {
    fn from(_: CursorError) -> Self {
        Self::InvalidCursor
    }
}

fn unavailable(err: DocumentStoreError) -> JobBoardError {
    warn!(error = %err, "job posting store call failed");
    JobBoardError::Unavailable
}

/// Lists, reads and publishes job postings.
#[derive(Clone)]
pub struct JobBoard {
    postings: Arc<dyn JobPostingRepository>,
}

impl JobBoard {
    /// Create the board.
    pub fn new(postings: Arc<dyn JobPostingRepository>) -> Self {
        Self { postings }
    }

    /// Validate and store a posting.
    pub async fn create(&self, posting: &JobPosting) -> Result<JobPostingId, JobBoardError> {
        let report = posting.validate();
        if !report.is_valid() {
            return Err(JobBoardError::Validation(report));
        }
        self.postings.create(posting).await.map_err(unavailable)
    }

    /// One posting, or `None` when it does not exist.
    pub async fn find_by_id(&self, id: &JobPostingId) -> Result<Option<JobPosting>, JobBoardError> {
        self.postings.find_by_id(id).await.map_err(unavailable)
    }

    /// One page of postings, newest first.
    ///
    /// A page shorter than the requested limit carries no cursor.
    pub async fn list_page(
        &self,
        search: &JobSearch,
        request: &PageRequest,
    ) -> Result<Page<JobPosting>, JobBoardError> {
        let mut query = TypedQuery::new()
            .order_by(JobPostingField::CreatedAt, SortDirection::Descending)
            .limit(request.limit());
        if let Some(employer_id) = &search.employer_id {
            query = query.filter(JobPostingField::EmployerId, FilterOp::Equal, employer_id.as_str());
        }
        if let Some(work_setup) = search.work_setup {
            query = query.filter(JobPostingField::WorkSetup, FilterOp::Equal, work_setup.as_str());
        }
        if let Some(skill) = &search.skill {
            query = query.filter(JobPostingField::Skills, FilterOp::ArrayContains, skill.as_str());
        }
        if let Some(token) = request.cursor() {
            let key = Cursor::<JobCursorKey>::decode(token)?.into_key();
            let document_id = DocumentId::new(key.id).map_err(|_| JobBoardError::InvalidCursor)?;
            query = query.start_after(DocumentCursor {
                order_value: Some(FieldValue::Timestamp(key.created_at)),
                document_id,
            });
        }
        let postings = self.postings.list(query).await.map_err(unavailable)?;
        debug!(count = postings.len(), "listed job postings");
        let page = Page::from_fetch(postings, request.limit(), |posting| JobCursorKey {
            created_at: posting.created_at.unwrap_or_default(),
            id: posting
                .id
                .as_ref()
                .map(|id| id.as_str().to_owned())
                .unwrap_or_default(),
        })?;
        Ok(page)
    }
}
