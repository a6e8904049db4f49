//! Error types for the sample-data crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or checking a sample dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("failed to read dataset file at '{path}': {message}")]
    IoError {
        /// Path to the dataset file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The dataset JSON is malformed or missing required fields.
    #[error("invalid dataset JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The dataset version is not supported.
    #[error("unsupported dataset version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the dataset.
        actual: u32,
    },

    /// Two sample accounts share an email address.
    #[error("duplicate sample account email '{email}'")]
    DuplicateEmail {
        /// The repeated email address.
        email: String,
    },

    /// A sample account has a password the registration rules would reject.
    #[error("sample account '{email}' has a password shorter than {min} characters")]
    WeakPassword {
        /// Email of the offending account.
        email: String,
        /// Minimum accepted length.
        min: usize,
    },

    /// A job posting names an employer account that is absent or not an
    /// employer.
    #[error("job posting '{job_title}' references unknown employer '{email}'")]
    UnknownEmployer {
        /// Title of the job posting.
        job_title: String,
        /// Employer email the posting refers to.
        email: String,
    },

    /// A job posting claims an age beyond the accepted range.
    #[error("job posting '{job_title}' was posted {days} days ago; at most {max} is accepted")]
    PostingTooOld {
        /// Title of the job posting.
        job_title: String,
        /// Claimed age in days.
        days: u32,
        /// Largest accepted age in days.
        max: u32,
    },
}
