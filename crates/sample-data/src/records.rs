//! Sample record types.
//!
//! These types mirror the shape of the stored documents without depending on
//! the client crate's domain model; the seeder converts them at the point of
//! use.

use serde::{Deserialize, Serialize};

/// Account role of a sample user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleRole {
    /// Job seeker.
    #[default]
    Applicant,
    /// Hiring organisation.
    Employer,
}

/// A legacy marketplace category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCategory {
    /// Category name, unique within the dataset.
    pub name: String,
    /// Short icon glyph shown next to the name.
    pub icon: String,
    /// One-line description.
    pub description: String,
}

/// A sample account with its plaintext password.
///
/// The password is only ever handed to the registration workflow, which
/// stores a salted hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleUser {
    /// Login email.
    pub email: String,
    /// Plaintext password used to register the account.
    pub password: String,
    /// Display name.
    pub name: String,
    /// Account role.
    #[serde(default)]
    pub user_type: SampleRole,
    /// Avatar URI; empty when the account has none.
    #[serde(default)]
    pub avatar: String,
    /// Free-text biography.
    #[serde(default)]
    pub bio: String,
    /// Free-text location.
    #[serde(default)]
    pub location: String,
    /// Rating between 0 and 5.
    #[serde(default)]
    pub rating: f64,
    /// Completed sales counter carried over from the marketplace.
    #[serde(default)]
    pub total_sales: u32,
}

/// A sample job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleJobPosting {
    /// Job title.
    pub job_title: String,
    /// Hiring company.
    pub company_name: String,
    /// Company rating between 0 and 5.
    #[serde(default)]
    pub company_rating: Option<f64>,
    /// Number of company reviews.
    #[serde(default)]
    pub company_reviews_count: Option<u32>,
    /// Free-text location.
    pub location: String,
    /// `Onsite`, `Hybrid` or `Remote`.
    #[serde(default)]
    pub work_setup: Option<String>,
    /// Department name.
    #[serde(default)]
    pub department: Option<String>,
    /// Employment type such as `Full-time`.
    pub employment_type: String,
    /// Salary range text.
    #[serde(default)]
    pub salary: Option<String>,
    /// Application volume label.
    #[serde(default)]
    pub application_volume: Option<String>,
    /// Required skills, in display order.
    #[serde(default)]
    pub skills: Vec<String>,
    /// Responsibilities, in display order.
    #[serde(default)]
    pub responsibilities: Vec<String>,
    /// Requirements, in display order.
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Education requirement text.
    #[serde(default)]
    pub education_requirement: Option<String>,
    /// Experience requirement text.
    #[serde(default)]
    pub experience_requirement: Option<String>,
    /// Benefits, in display order.
    #[serde(default)]
    pub benefits: Vec<String>,
    /// Additional notes.
    #[serde(default)]
    pub additional_notes: Option<String>,
    /// How many days before seeding the posting was published.
    #[serde(default)]
    pub posted_days_ago: u32,
    /// Email of the employer account that owns the posting.
    #[serde(default)]
    pub employer_email: Option<String>,
}

#[cfg(test)]
mod tests {
    //! Serde shape checks for the sample records.

    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("\"applicant\"", SampleRole::Applicant)]
    #[case("\"employer\"", SampleRole::Employer)]
    fn roles_deserialize_from_lowercase(#[case] json: &str, #[case] expected: SampleRole) {
        let role: SampleRole = serde_json::from_str(json).expect("role parses");
        assert_eq!(role, expected);
    }

    #[rstest]
    fn user_optional_fields_default() {
        let json = r#"{"email": "a@b.c", "password": "secret1", "name": "A"}"#;
        let user: SampleUser = serde_json::from_str(json).expect("user parses");
        assert_eq!(user.user_type, SampleRole::Applicant);
        assert!(user.avatar.is_empty());
        assert_eq!(user.total_sales, 0);
    }

    #[rstest]
    fn job_posting_reads_camel_case_keys() {
        let json = r#"{
            "jobTitle": "Engineer",
            "companyName": "Acme",
            "location": "Remote",
            "employmentType": "Full-time",
            "workSetup": "Remote",
            "postedDaysAgo": 3,
            "employerEmail": "boss@acme.test"
        }"#;
        let posting: SampleJobPosting = serde_json::from_str(json).expect("posting parses");
        assert_eq!(posting.work_setup.as_deref(), Some("Remote"));
        assert_eq!(posting.posted_days_ago, 3);
        assert!(posting.skills.is_empty());
    }
}
