//! Sample categories, accounts and job postings for seeding a Hireboard store.
//!
//! The crate bundles a checked JSON dataset and exposes it as plain record
//! types. It does not depend on the client crate; the seeder converts the
//! records into domain values when writing them.
//!
//! # Example
//!
//! ```
//! use sample_data::{SampleDataset, SampleRole};
//!
//! let dataset = SampleDataset::embedded().expect("bundled dataset is valid");
//! let employers = dataset.users_with_role(SampleRole::Employer).count();
//!
//! assert!(employers > 0);
//! assert!(!dataset.job_postings().is_empty());
//! ```

mod dataset;
mod error;
mod records;

pub use dataset::{MAX_POSTED_DAYS_AGO, MIN_PASSWORD_LEN, SampleDataset};
pub use error::DatasetError;
pub use records::{SampleCategory, SampleJobPosting, SampleRole, SampleUser};
