//! Sample data seeding for a Hireboard store.
//!
//! Converts [`SampleDataset`] records into domain records and writes them
//! through the repository ports. Re-running a seed skips records that are
//! already present: categories by name, users by email and job postings by
//! title and company.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Duration;
use mockable::Clock;
use sample_data::{SampleCategory, SampleDataset, SampleJobPosting, SampleRole, SampleUser};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::ports::{
    CatalogueRepository, CollectionName, CredentialHashError, CredentialHasher, DocumentQuery,
    DocumentStoreError, FilterOp, JobPostingField, JobPostingRepository, SortDirection,
    TypedQuery, UserField, UserRepository,
};
use crate::domain::{
    Category, DocumentAccess, JobPosting, PublicUser, StoredWorkSetup, User, UserId, UserRole,
    normalise_email,
};

/// Counts of what one seed run wrote and skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Categories written.
    pub categories_created: usize,
    /// Categories already present.
    pub categories_skipped: usize,
    /// Accounts written.
    pub users_created: usize,
    /// Accounts already present.
    pub users_skipped: usize,
    /// Postings written.
    pub postings_created: usize,
    /// Postings already present.
    pub postings_skipped: usize,
}

/// Errors raised while seeding or clearing.
#[derive(Debug, Error)]
pub enum SeedingError {
    /// The store rejected a call.
    #[error("store error: {0}")]
    Store(#[from] DocumentStoreError),
    /// A sample password could not be hashed.
    #[error("hashing error: {0}")]
    Hashing(#[from] CredentialHashError),
    /// A sample posting broke the posting rules.
    #[error("sample posting '{title}' is invalid: {message}")]
    InvalidPosting {
        /// Title of the offending posting.
        title: String,
        /// Joined validation messages.
        message: String,
    },
}

/// Ports the seeder writes through.
pub struct SeedTargets {
    /// Account repository.
    pub users: Arc<dyn UserRepository>,
    /// Posting repository.
    pub postings: Arc<dyn JobPostingRepository>,
    /// Category and item repository.
    pub catalogue: Arc<dyn CatalogueRepository>,
    /// Raw access used to clear whole collections.
    pub access: DocumentAccess,
}

/// Service that writes sample data and clears collections.
pub struct SampleDataSeeder {
    targets: SeedTargets,
    hasher: Arc<dyn CredentialHasher>,
    clock: Arc<dyn Clock>,
}

impl SampleDataSeeder {
    /// Create a seeder; `clock` dates the sample postings.
    pub fn new(
        targets: SeedTargets,
        hasher: Arc<dyn CredentialHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            targets,
            hasher,
            clock,
        }
    }

    /// Write every record of `dataset` that is not already stored.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError`] on the first store, hashing or validation
    /// failure; records written before it stay written.
    pub async fn seed(&self, dataset: &SampleDataset) -> Result<SeedOutcome, SeedingError> {
        let mut outcome = SeedOutcome::default();
        self.seed_categories(dataset.categories(), &mut outcome)
            .await?;
        let accounts = self.seed_users(dataset.users(), &mut outcome).await?;
        self.seed_postings(dataset.job_postings(), &accounts, &mut outcome)
            .await?;
        info!(
            categories = outcome.categories_created,
            users = outcome.users_created,
            postings = outcome.postings_created,
            "sample data seeded"
        );
        Ok(outcome)
    }

    async fn seed_categories(
        &self,
        categories: &[SampleCategory],
        outcome: &mut SeedOutcome,
    ) -> Result<(), SeedingError> {
        let mut known: HashSet<String> = self
            .targets
            .catalogue
            .categories()
            .await?
            .into_iter()
            .map(|category| category.name)
            .collect();
        for sample in categories {
            if !known.insert(sample.name.clone()) {
                outcome.categories_skipped += 1;
                continue;
            }
            let category = Category::new(&sample.name, &sample.icon, &sample.description);
            self.targets.catalogue.create_category(&category).await?;
            outcome.categories_created += 1;
        }
        Ok(())
    }

    async fn seed_users(
        &self,
        users: &[SampleUser],
        outcome: &mut SeedOutcome,
    ) -> Result<HashMap<String, UserId>, SeedingError> {
        let mut accounts = HashMap::with_capacity(users.len());
        for sample in users {
            let email = normalise_email(&sample.email);
            if let Some(existing) = self.targets.users.find_by_email(&email).await? {
                debug!(%email, "sample account already present");
                if let Some(id) = existing.id {
                    accounts.insert(email, id);
                }
                outcome.users_skipped += 1;
                continue;
            }
            let hash = self.hasher.hash(&sample.password)?;
            let user = sample_user(sample, &email).with_password_hash(hash);
            let id = self.targets.users.create(&user).await?;
            accounts.insert(email, id);
            outcome.users_created += 1;
        }
        Ok(accounts)
    }

    async fn seed_postings(
        &self,
        postings: &[SampleJobPosting],
        accounts: &HashMap<String, UserId>,
        outcome: &mut SeedOutcome,
    ) -> Result<(), SeedingError> {
        let now = self.clock.utc();
        for sample in postings {
            let existing = self
                .targets
                .postings
                .list(
                    TypedQuery::new()
                        .filter(JobPostingField::JobTitle, FilterOp::Equal, sample.job_title.as_str())
                        .filter(
                            JobPostingField::CompanyName,
                            FilterOp::Equal,
                            sample.company_name.as_str(),
                        )
                        .limit(1),
                )
                .await?;
            if !existing.is_empty() {
                outcome.postings_skipped += 1;
                continue;
            }
            let mut posting = sample_posting(sample);
            posting.posted_date = Some(
                Duration::try_days(i64::from(sample.posted_days_ago))
                    .and_then(|age| now.checked_sub_signed(age))
                    .ok_or_else(|| SeedingError::InvalidPosting {
                        title: sample.job_title.clone(),
                        message: format!(
                            "posted {} days ago falls outside the supported date range",
                            sample.posted_days_ago
                        ),
                    })?,
            );
            posting.employer_id = sample
                .employer_email
                .as_deref()
                .map(normalise_email)
                .and_then(|email| accounts.get(&email).cloned());
            let report = posting.validate();
            if !report.is_valid() {
                return Err(SeedingError::InvalidPosting {
                    title: sample.job_title.clone(),
                    message: report.joined(),
                });
            }
            self.targets.postings.create(&posting).await?;
            outcome.postings_created += 1;
        }
        Ok(())
    }

    /// Delete every document of each collection; returns how many went.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError::Store`] when listing or deleting fails.
    pub async fn clear(&self, collections: &[CollectionName]) -> Result<usize, SeedingError> {
        let mut removed = 0;
        for collection in collections {
            let documents = self
                .targets
                .access
                .get_all(collection, &DocumentQuery::new())
                .await?;
            for document in &documents {
                self.targets.access.delete(collection, &document.id).await?;
            }
            info!(%collection, count = documents.len(), "collection cleared");
            removed += documents.len();
        }
        Ok(removed)
    }

    /// Every account, by email, without credentials.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError::Store`] when the query fails.
    pub async fn list_users(&self) -> Result<Vec<PublicUser>, SeedingError> {
        let users = self
            .targets
            .users
            .list(TypedQuery::new().order_by(UserField::Email, SortDirection::Ascending))
            .await?;
        Ok(users.iter().map(User::to_public).collect())
    }
}

fn sample_user(sample: &SampleUser, email: &str) -> User {
    let role = match sample.user_type {
        SampleRole::Applicant => UserRole::Applicant,
        SampleRole::Employer => UserRole::Employer,
    };
    let mut user = User::new(email, sample.name.trim(), role);
    user.avatar.clone_from(&sample.avatar);
    user.bio.clone_from(&sample.bio);
    user.location.clone_from(&sample.location);
    user.rating = sample.rating.clamp(0.0, 5.0);
    user.total_sales = sample.total_sales;
    user
}

fn sample_posting(sample: &SampleJobPosting) -> JobPosting {
    let mut posting = JobPosting::new(
        &sample.job_title,
        &sample.company_name,
        &sample.location,
        &sample.employment_type,
    );
    posting.company_rating = sample.company_rating;
    posting.company_reviews_count = sample.company_reviews_count;
    posting.work_setup = sample.work_setup.as_deref().map(StoredWorkSetup::parse);
    posting.department.clone_from(&sample.department);
    posting.salary.clone_from(&sample.salary);
    posting.application_volume.clone_from(&sample.application_volume);
    posting.skills.clone_from(&sample.skills);
    posting.responsibilities.clone_from(&sample.responsibilities);
    posting.requirements.clone_from(&sample.requirements);
    posting.education_requirement.clone_from(&sample.education_requirement);
    posting.experience_requirement.clone_from(&sample.experience_requirement);
    posting.benefits.clone_from(&sample.benefits);
    posting.additional_notes.clone_from(&sample.additional_notes);
    posting
}
