//! Job posting record and its presentation helpers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::domain::fields;
use crate::domain::ports::{Document, DocumentId, FieldMap, FieldValue};
use crate::domain::{UserId, ValidationReport};

/// Postings at most this many days old count as recent.
pub const RECENT_POSTING_DAYS: i64 = 7;

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Store-assigned job posting identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobPostingId(String);

impl JobPostingId {
    /// Wrap a store id; blank input is rejected.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        (!id.trim().is_empty()).then_some(Self(id))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<DocumentId> for JobPostingId {
    fn from(value: DocumentId) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for JobPostingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkSetup {
    /// At the employer's site.
    Onsite,
    /// Split between site and home.
    Hybrid,
    /// Fully remote.
    Remote,
}

impl WorkSetup {
    /// Stored token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Onsite => "Onsite",
            Self::Hybrid => "Hybrid",
            Self::Remote => "Remote",
        }
    }

    /// Badge text shown on posting cards.
    pub const fn badge(self) -> &'static str {
        match self {
            Self::Remote => "\u{1F310} Remote",
            Self::Hybrid => "\u{1F3E2} Hybrid",
            Self::Onsite => "\u{1F3E2} On-site",
        }
    }
}

impl FromStr for WorkSetup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Onsite" => Ok(Self::Onsite),
            "Hybrid" => Ok(Self::Hybrid),
            "Remote" => Ok(Self::Remote),
            other => Err(other.to_owned()),
        }
    }
}

/// Work setup as stored: a known value, or raw text kept for validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredWorkSetup {
    /// One of the enumerated values.
    Known(WorkSetup),
    /// Anything else a writer put in the field.
    Unrecognised(String),
}

impl StoredWorkSetup {
    /// Parse stored text.
    pub fn parse(raw: &str) -> Self {
        raw.parse::<WorkSetup>()
            .map_or_else(Self::Unrecognised, Self::Known)
    }

    /// Text as stored.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(setup) => setup.as_str(),
            Self::Unrecognised(raw) => raw.as_str(),
        }
    }

    /// The enumerated value, if recognised.
    pub fn known(&self) -> Option<WorkSetup> {
        match self {
            Self::Known(setup) => Some(*setup),
            Self::Unrecognised(_) => None,
        }
    }
}

impl From<WorkSetup> for StoredWorkSetup {
    fn from(value: WorkSetup) -> Self {
        Self::Known(value)
    }
}

impl Serialize for StoredWorkSetup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A job listing.
///
/// Job postings hold no sensitive fields, so the record itself is the
/// public view and serialises directly for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    /// Store id; `None` until created.
    pub id: Option<JobPostingId>,
    /// Job title.
    pub job_title: String,
    /// Hiring company.
    pub company_name: String,
    /// Company rating between 0 and 5.
    pub company_rating: Option<f64>,
    /// Number of company reviews.
    pub company_reviews_count: Option<u32>,
    /// Free-text location.
    pub location: String,
    /// Work setup.
    pub work_setup: Option<StoredWorkSetup>,
    /// Department.
    pub department: Option<String>,
    /// Employment type such as `Full-time`.
    pub employment_type: String,
    /// Salary range text.
    pub salary: Option<String>,
    /// Publication time.
    pub posted_date: Option<DateTime<Utc>>,
    /// Application volume label.
    pub application_volume: Option<String>,
    /// Required skills.
    pub skills: Vec<String>,
    /// Responsibilities.
    pub responsibilities: Vec<String>,
    /// Requirements.
    pub requirements: Vec<String>,
    /// Education requirement.
    pub education_requirement: Option<String>,
    /// Experience requirement.
    pub experience_requirement: Option<String>,
    /// Benefits.
    pub benefits: Vec<String>,
    /// Additional notes.
    pub additional_notes: Option<String>,
    /// Owning employer account; may dangle.
    pub employer_id: Option<UserId>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
}

impl JobPosting {
    /// New, unsaved posting with every optional field empty.
    pub fn new(
        job_title: impl Into<String>,
        company_name: impl Into<String>,
        location: impl Into<String>,
        employment_type: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            job_title: job_title.into(),
            company_name: company_name.into(),
            company_rating: None,
            company_reviews_count: None,
            location: location.into(),
            work_setup: None,
            department: None,
            employment_type: employment_type.into(),
            salary: None,
            posted_date: None,
            application_volume: None,
            skills: Vec::new(),
            responsibilities: Vec::new(),
            requirements: Vec::new(),
            education_requirement: None,
            experience_requirement: None,
            benefits: Vec::new(),
            additional_notes: None,
            employer_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Rebuild a posting from a stored document.
    pub fn from_document(document: &Document) -> Self {
        let stored = &document.fields;
        Self {
            id: Some(JobPostingId::from(document.id.clone())),
            job_title: fields::text(stored, "jobTitle"),
            company_name: fields::text(stored, "companyName"),
            company_rating: fields::number(stored, "companyRating"),
            company_reviews_count: fields::optional_counter(stored, "companyReviewsCount"),
            location: fields::text(stored, "location"),
            work_setup: fields::optional_text(stored, "workSetup")
                .map(|raw| StoredWorkSetup::parse(&raw)),
            department: fields::optional_text(stored, "department"),
            employment_type: fields::text(stored, "employmentType"),
            salary: fields::optional_text(stored, "salary"),
            posted_date: fields::timestamp(stored, "postedDate"),
            application_volume: fields::optional_text(stored, "applicationVolume"),
            skills: fields::string_list(stored, "skills"),
            responsibilities: fields::string_list(stored, "responsibilities"),
            requirements: fields::string_list(stored, "requirements"),
            education_requirement: fields::optional_text(stored, "educationRequirement"),
            experience_requirement: fields::optional_text(stored, "experienceRequirement"),
            benefits: fields::string_list(stored, "benefits"),
            additional_notes: fields::optional_text(stored, "additionalNotes"),
            employer_id: fields::optional_text(stored, "employerId").and_then(UserId::new),
            created_at: fields::timestamp(stored, "createdAt"),
            updated_at: fields::timestamp(stored, "updatedAt"),
        }
    }

    /// Field map written to the store; optional attributes are omitted when
    /// unset or empty.
    pub fn to_fields(&self) -> FieldMap {
        let mut map = FieldMap::new();
        map.insert("jobTitle".to_owned(), self.job_title.clone().into());
        map.insert("companyName".to_owned(), self.company_name.clone().into());
        map.insert("location".to_owned(), self.location.clone().into());
        map.insert("employmentType".to_owned(), self.employment_type.clone().into());
        map.insert("skills".to_owned(), FieldValue::list(self.skills.clone()));
        map.insert(
            "responsibilities".to_owned(),
            FieldValue::list(self.responsibilities.clone()),
        );
        map.insert("requirements".to_owned(), FieldValue::list(self.requirements.clone()));
        map.insert("benefits".to_owned(), FieldValue::list(self.benefits.clone()));
        if let Some(rating) = self.company_rating {
            map.insert("companyRating".to_owned(), rating.into());
        }
        if let Some(count) = self.company_reviews_count {
            map.insert("companyReviewsCount".to_owned(), count.into());
        }
        fields::put_text(
            &mut map,
            "workSetup",
            self.work_setup.as_ref().map(StoredWorkSetup::as_str),
        );
        fields::put_text(&mut map, "department", self.department.as_deref());
        fields::put_text(&mut map, "salary", self.salary.as_deref());
        fields::put_text(&mut map, "applicationVolume", self.application_volume.as_deref());
        fields::put_text(
            &mut map,
            "educationRequirement",
            self.education_requirement.as_deref(),
        );
        fields::put_text(
            &mut map,
            "experienceRequirement",
            self.experience_requirement.as_deref(),
        );
        fields::put_text(&mut map, "additionalNotes", self.additional_notes.as_deref());
        fields::put_text(
            &mut map,
            "employerId",
            self.employer_id.as_ref().map(UserId::as_str),
        );
        for (key, stamp) in [
            ("postedDate", self.posted_date),
            ("createdAt", self.created_at),
            ("updatedAt", self.updated_at),
        ] {
            if let Some(stamp) = stamp {
                map.insert(key.to_owned(), stamp.into());
            }
        }
        map
    }

    /// `"<title> at <company>"`.
    pub fn formatted_title(&self) -> String {
        format!("{} at {}", self.job_title, self.company_name)
    }

    /// Location followed by the work setup in parentheses, when set.
    pub fn formatted_location(&self) -> String {
        match &self.work_setup {
            Some(setup) => format!("{} ({})", self.location, setup.as_str()),
            None => self.location.clone(),
        }
    }

    fn setup_is(&self, wanted: WorkSetup) -> bool {
        self.work_setup
            .as_ref()
            .and_then(StoredWorkSetup::known)
            == Some(wanted)
    }

    /// Fully remote.
    pub fn is_remote(&self) -> bool {
        self.setup_is(WorkSetup::Remote)
    }

    /// Hybrid.
    pub fn is_hybrid(&self) -> bool {
        self.setup_is(WorkSetup::Hybrid)
    }

    /// On site.
    pub fn is_onsite(&self) -> bool {
        self.setup_is(WorkSetup::Onsite)
    }

    /// Badge text for the work setup; empty when unset or unrecognised.
    pub fn work_setup_display(&self) -> &'static str {
        self.work_setup
            .as_ref()
            .and_then(StoredWorkSetup::known)
            .map_or("", WorkSetup::badge)
    }

    /// Whether salary text is present.
    pub fn has_salary(&self) -> bool {
        self.salary
            .as_deref()
            .is_some_and(|salary| !salary.trim().is_empty())
    }

    /// Skills joined with `", "`.
    pub fn skills_string(&self) -> String {
        self.skills.join(", ")
    }

    /// Benefits joined with `", "`.
    pub fn benefits_string(&self) -> String {
        self.benefits.join(", ")
    }

    // Whole days between posting and `now`, rounded up.
    fn days_since_posting(&self, now: DateTime<Utc>) -> Option<i64> {
        let posted = self.posted_date?;
        let elapsed = (now - posted).num_milliseconds().abs();
        Some((elapsed + DAY_MILLIS - 1) / DAY_MILLIS)
    }

    /// Posted within the last [`RECENT_POSTING_DAYS`] days.
    pub fn is_recent(&self, now: DateTime<Utc>) -> bool {
        self.days_since_posting(now)
            .is_some_and(|days| days <= RECENT_POSTING_DAYS)
    }

    /// Relative posting age such as `"3 days ago"`; empty without a
    /// posting date.
    pub fn time_since_posting(&self, now: DateTime<Utc>) -> String {
        match self.days_since_posting(now) {
            None => String::new(),
            Some(1) => "1 day ago".to_owned(),
            Some(days) if days < 7 => format!("{days} days ago"),
            Some(days) if days < 30 => format!("{} weeks ago", days / 7),
            Some(days) => format!("{} months ago", days / 30),
        }
    }

    /// Check the listing rules.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        report.require(!self.job_title.trim().is_empty(), "Job title is required");
        report.require(
            !self.company_name.trim().is_empty(),
            "Company name is required",
        );
        report.require(!self.location.trim().is_empty(), "Location is required");
        report.require(
            !self.employment_type.trim().is_empty(),
            "Employment type is required",
        );
        report.require(
            !matches!(self.work_setup, Some(StoredWorkSetup::Unrecognised(_))),
            "Work setup must be 'Onsite', 'Hybrid', or 'Remote'",
        );
        report.require(!self.skills.is_empty(), "At least one skill is required");
        report.require(
            !self.responsibilities.is_empty(),
            "At least one responsibility is required",
        );
        report.require(
            !self.requirements.is_empty(),
            "At least one requirement is required",
        );
        report
    }

    /// Stamp a new update time.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }
}
