//! Dataset loading and consistency checks.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::DatasetError;
use crate::records::{SampleCategory, SampleJobPosting, SampleRole, SampleUser};

/// Current supported dataset version.
const SUPPORTED_VERSION: u32 = 1;

/// Minimum password length accepted for sample accounts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Oldest posting age accepted, roughly one hundred years.
pub const MAX_POSTED_DAYS_AGO: u32 = 36_500;

const EMBEDDED_JSON: &str = include_str!("../fixtures/sample-data.json");

/// A checked collection of sample categories, accounts and job postings.
///
/// # Example
///
/// ```
/// use sample_data::SampleDataset;
///
/// let json = r#"{
///     "version": 1,
///     "categories": [{"name": "Jobs", "icon": "J", "description": "Work"}],
///     "users": [{"email": "boss@acme.test", "password": "hunter22",
///                "name": "Boss", "userType": "employer"}],
///     "jobPostings": []
/// }"#;
///
/// let dataset = SampleDataset::from_json(json).expect("valid dataset");
/// assert_eq!(dataset.users().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleDataset {
    version: u32,
    categories: Vec<SampleCategory>,
    users: Vec<SampleUser>,
    job_postings: Vec<SampleJobPosting>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDataset {
    version: u32,
    #[serde(default)]
    categories: Vec<SampleCategory>,
    #[serde(default)]
    users: Vec<SampleUser>,
    #[serde(default)]
    job_postings: Vec<SampleJobPosting>,
}

impl SampleDataset {
    /// Returns the dataset bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the bundled fixture fails its checks.
    pub fn embedded() -> Result<Self, DatasetError> {
        Self::from_json(EMBEDDED_JSON)
    }

    /// Parses and checks a dataset from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if:
    /// - The JSON is malformed
    /// - The version is unsupported
    /// - Two accounts share an email (case-insensitive)
    /// - An account password is shorter than [`MIN_PASSWORD_LEN`]
    /// - A job posting names an employer that is not an employer account
    /// - A job posting is older than [`MAX_POSTED_DAYS_AGO`] days
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let raw: RawDataset =
            serde_json::from_str(json).map_err(|e| DatasetError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a dataset from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, DatasetError> {
        let contents = fs::read_to_string(path).map_err(|e| DatasetError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawDataset) -> Result<Self, DatasetError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(DatasetError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        let mut seen = HashSet::new();
        for user in &raw.users {
            if !seen.insert(user.email.trim().to_lowercase()) {
                return Err(DatasetError::DuplicateEmail {
                    email: user.email.clone(),
                });
            }
            if user.password.chars().count() < MIN_PASSWORD_LEN {
                return Err(DatasetError::WeakPassword {
                    email: user.email.clone(),
                    min: MIN_PASSWORD_LEN,
                });
            }
        }

        let employers: HashSet<String> = raw
            .users
            .iter()
            .filter(|user| user.user_type == SampleRole::Employer)
            .map(|user| user.email.trim().to_lowercase())
            .collect();
        for posting in &raw.job_postings {
            if posting.posted_days_ago > MAX_POSTED_DAYS_AGO {
                return Err(DatasetError::PostingTooOld {
                    job_title: posting.job_title.clone(),
                    days: posting.posted_days_ago,
                    max: MAX_POSTED_DAYS_AGO,
                });
            }
            let Some(email) = posting.employer_email.as_deref() else {
                continue;
            };
            if !employers.contains(&email.trim().to_lowercase()) {
                return Err(DatasetError::UnknownEmployer {
                    job_title: posting.job_title.clone(),
                    email: email.to_owned(),
                });
            }
        }

        Ok(Self {
            version: raw.version,
            categories: raw.categories,
            users: raw.users,
            job_postings: raw.job_postings,
        })
    }

    /// Returns the dataset version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the sample categories.
    #[must_use]
    pub fn categories(&self) -> &[SampleCategory] {
        &self.categories
    }

    /// Returns the sample accounts.
    #[must_use]
    pub fn users(&self) -> &[SampleUser] {
        &self.users
    }

    /// Returns the sample job postings.
    #[must_use]
    pub fn job_postings(&self) -> &[SampleJobPosting] {
        &self.job_postings
    }

    /// Returns the accounts with the given role.
    pub fn users_with_role(&self, role: SampleRole) -> impl Iterator<Item = &SampleUser> {
        self.users.iter().filter(move |user| user.user_type == role)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for dataset parsing.

    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]

    use rstest::rstest;

    use super::*;

    fn dataset_json(users: &str, postings: &str) -> String {
        format!(r#"{{"version": 1, "categories": [], "users": [{users}], "jobPostings": [{postings}]}}"#)
    }

    const EMPLOYER: &str =
        r#"{"email": "boss@acme.test", "password": "hunter22", "name": "Boss", "userType": "employer"}"#;
    const APPLICANT: &str =
        r#"{"email": "seeker@acme.test", "password": "hunter22", "name": "Seeker"}"#;

    fn posting_for(email: &str) -> String {
        format!(
            r#"{{"jobTitle": "Engineer", "companyName": "Acme", "location": "Remote",
                "employmentType": "Full-time", "employerEmail": "{email}"}}"#
        )
    }

    #[rstest]
    fn embedded_dataset_is_consistent() {
        let dataset = SampleDataset::embedded().expect("embedded dataset loads");
        assert_eq!(dataset.version(), 1);
        assert!(!dataset.categories().is_empty());
        assert!(dataset.users_with_role(SampleRole::Employer).count() >= 1);
        assert!(!dataset.job_postings().is_empty());
    }

    #[rstest]
    fn rejects_unsupported_version() {
        let err = SampleDataset::from_json(r#"{"version": 2}"#).expect_err("version 2");
        assert_eq!(
            err,
            DatasetError::UnsupportedVersion {
                expected: 1,
                actual: 2
            }
        );
    }

    #[rstest]
    fn rejects_duplicate_emails_ignoring_case() {
        let upper = EMPLOYER.replace("boss@acme.test", "BOSS@acme.test");
        let json = dataset_json(&format!("{EMPLOYER}, {upper}"), "");
        let err = SampleDataset::from_json(&json).expect_err("duplicate email");
        assert!(matches!(err, DatasetError::DuplicateEmail { .. }));
    }

    #[rstest]
    fn rejects_short_passwords() {
        let weak = APPLICANT.replace("hunter22", "abc");
        let err = SampleDataset::from_json(&dataset_json(&weak, "")).expect_err("weak password");
        assert_eq!(
            err,
            DatasetError::WeakPassword {
                email: "seeker@acme.test".to_owned(),
                min: MIN_PASSWORD_LEN
            }
        );
    }

    #[rstest]
    #[case::missing_account("nobody@acme.test")]
    #[case::not_an_employer("seeker@acme.test")]
    fn rejects_postings_without_an_employer_account(#[case] email: &str) {
        let json = dataset_json(&format!("{EMPLOYER}, {APPLICANT}"), &posting_for(email));
        let err = SampleDataset::from_json(&json).expect_err("unknown employer");
        assert!(matches!(err, DatasetError::UnknownEmployer { .. }));
    }

    #[rstest]
    fn accepts_posting_owned_by_employer() {
        let json = dataset_json(EMPLOYER, &posting_for("boss@acme.test"));
        let dataset = SampleDataset::from_json(&json).expect("valid dataset");
        assert_eq!(dataset.job_postings().len(), 1);
    }

    #[rstest]
    #[case::at_limit(MAX_POSTED_DAYS_AGO, true)]
    #[case::past_limit(MAX_POSTED_DAYS_AGO + 1, false)]
    #[case::far_past_limit(4_000_000_000, false)]
    fn bounds_posting_age(#[case] days: u32, #[case] accepted: bool) {
        let aged = format!("\"postedDaysAgo\": {days}, \"employerEmail\"");
        let posting = posting_for("boss@acme.test").replace("\"employerEmail\"", &aged);
        let result = SampleDataset::from_json(&dataset_json(EMPLOYER, &posting));
        if accepted {
            assert!(result.is_ok(), "{result:?}");
        } else {
            assert_eq!(
                result.expect_err("posting too old"),
                DatasetError::PostingTooOld {
                    job_title: "Engineer".to_owned(),
                    days,
                    max: MAX_POSTED_DAYS_AGO,
                }
            );
        }
    }

    #[rstest]
    fn reports_missing_file() {
        let err = SampleDataset::from_file(Path::new("/nonexistent/sample-data.json"))
            .expect_err("missing file");
        assert!(matches!(err, DatasetError::IoError { .. }));
    }
}
