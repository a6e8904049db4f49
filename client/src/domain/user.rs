//! Account record, its public projection and presentation helpers.
//!
//! [`User`] is the stored shape, including the salted password hash.
//! [`PublicUser`] is the projection handed to the session and the
//! presentation layer; it has no password field at all, so it cannot leak
//! one through serialisation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::fields;
use crate::domain::ports::{Document, DocumentId, FieldMap, FieldValue};

/// Display name used when an account has neither name nor email.
pub const ANONYMOUS_DISPLAY_NAME: &str = "Anonymous User";

/// Stable user identifier assigned by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
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

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DocumentId> for UserId {
    fn from(value: DocumentId) -> Self {
        Self(value.into())
    }
}

/// Account role; exactly one per account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Job seeker.
    #[default]
    Applicant,
    /// Hiring organisation.
    Employer,
}

impl UserRole {
    /// Stored token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applicant => "applicant",
            Self::Employer => "employer",
        }
    }

    /// Label shown next to the account name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Applicant => "Applicant",
            Self::Employer => "Employer",
        }
    }
}

/// Raised when a role token is outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown user type '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applicant" => Ok(Self::Applicant),
            "employer" => Ok(Self::Employer),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Self-described gender on the profile screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// `Male`
    Male,
    /// `Female`
    Female,
    /// `Other`
    Other,
}

impl Gender {
    /// Stored token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Other" => Ok(Self::Other),
            _ => Err(()),
        }
    }
}

/// Postal address split the way the profile form collects it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressDetails {
    /// Province.
    pub province: String,
    /// City or municipality.
    pub city: String,
    /// Barangay.
    pub baranggay: String,
}

impl AddressDetails {
    fn is_empty(&self) -> bool {
        self.province.is_empty() && self.city.is_empty() && self.baranggay.is_empty()
    }

    fn from_field(value: Option<&FieldValue>) -> Self {
        let Some(map) = value.and_then(FieldValue::as_map) else {
            return Self::default();
        };
        let text = |key: &str| {
            map.get(key)
                .and_then(FieldValue::as_str)
                .unwrap_or_default()
                .to_owned()
        };
        Self {
            province: text("province"),
            city: text("city"),
            baranggay: text("baranggay"),
        }
    }

    fn to_field(&self) -> FieldValue {
        let mut map = FieldMap::new();
        map.insert("province".to_owned(), self.province.clone().into());
        map.insert("city".to_owned(), self.city.clone().into());
        map.insert("baranggay".to_owned(), self.baranggay.clone().into());
        FieldValue::Map(map)
    }
}

/// Optional details edited from the profile screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileDetails {
    /// Highest degree.
    pub degree: String,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Gender.
    pub gender: Option<Gender>,
    /// Portfolio URL.
    pub portfolio_link: String,
    /// Postal address.
    pub address_details: AddressDetails,
}

/// Salted one-way password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Borrow the encoded hash.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Stored account record.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Store id; `None` until the record is created.
    pub id: Option<UserId>,
    /// Login email, trimmed and lower-cased.
    pub email: String,
    password_hash: Option<PasswordHash>,
    /// Display name.
    pub name: String,
    /// Account role.
    pub role: UserRole,
    /// Avatar URI; empty when unset.
    pub avatar: String,
    /// Free-text biography.
    pub bio: String,
    /// Free-text location.
    pub location: String,
    /// Rating between 0 and 5.
    pub rating: f64,
    /// Completed sales carried over from the marketplace.
    pub total_sales: u32,
    /// Follower count.
    pub follower: u32,
    /// Following count.
    pub following: u32,
    /// Profile-screen details.
    pub profile: ProfileDetails,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// New, unsaved account with every optional field at its default.
    pub fn new(email: impl Into<String>, name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: None,
            email: email.into(),
            password_hash: None,
            name: name.into(),
            role,
            avatar: String::new(),
            bio: String::new(),
            location: String::new(),
            rating: 0.0,
            total_sales: 0,
            follower: 0,
            following: 0,
            profile: ProfileDetails::default(),
            created_at: None,
            updated_at: None,
        }
    }

    /// Attach a password hash.
    #[must_use]
    pub fn with_password_hash(mut self, hash: PasswordHash) -> Self {
        self.password_hash = Some(hash);
        self
    }

    /// Stored password hash, if any.
    pub fn password_hash(&self) -> Option<&PasswordHash> {
        self.password_hash.as_ref()
    }

    /// Rebuild a record from a stored document.
    ///
    /// Missing or mistyped fields take their defaults; unknown role tokens
    /// fall back to [`UserRole::Applicant`].
    pub fn from_document(document: &Document) -> Self {
        let stored = &document.fields;
        let role = stored
            .get("userType")
            .and_then(FieldValue::as_str)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        let gender = stored
            .get("gender")
            .and_then(FieldValue::as_str)
            .and_then(|raw| raw.parse().ok());
        Self {
            id: Some(UserId::from(document.id.clone())),
            email: fields::text(stored, "email"),
            password_hash: stored
                .get("passwordHash")
                .and_then(FieldValue::as_str)
                .map(PasswordHash::new),
            name: fields::text(stored, "name"),
            role,
            avatar: fields::text(stored, "avatar"),
            bio: fields::text(stored, "bio"),
            location: fields::text(stored, "location"),
            rating: fields::number(stored, "rating").unwrap_or_default(),
            total_sales: fields::counter(stored, "totalSales"),
            follower: fields::counter(stored, "follower"),
            following: fields::counter(stored, "following"),
            profile: ProfileDetails {
                degree: fields::text(stored, "degree"),
                date_of_birth: fields::date(stored, "dateOfBirth"),
                gender,
                portfolio_link: fields::text(stored, "portfolioLink"),
                address_details: AddressDetails::from_field(stored.get("addressDetails")),
            },
            created_at: fields::timestamp(stored, "createdAt"),
            updated_at: fields::timestamp(stored, "updatedAt"),
        }
    }

    /// Field map written to the store.
    ///
    /// Core attributes are always written; profile details, the password
    /// hash and timestamps only when set.
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("email".to_owned(), self.email.clone().into());
        fields.insert("name".to_owned(), self.name.clone().into());
        fields.insert("userType".to_owned(), self.role.as_str().into());
        fields.insert("avatar".to_owned(), self.avatar.clone().into());
        fields.insert("bio".to_owned(), self.bio.clone().into());
        fields.insert("location".to_owned(), self.location.clone().into());
        fields.insert("rating".to_owned(), self.rating.into());
        fields.insert("totalSales".to_owned(), self.total_sales.into());
        fields.insert("follower".to_owned(), self.follower.into());
        fields.insert("following".to_owned(), self.following.into());
        if let Some(hash) = &self.password_hash {
            fields.insert("passwordHash".to_owned(), hash.as_str().into());
        }
        fields.extend(self.profile_fields());
        if let Some(created_at) = self.created_at {
            fields.insert("createdAt".to_owned(), created_at.into());
        }
        if let Some(updated_at) = self.updated_at {
            fields.insert("updatedAt".to_owned(), updated_at.into());
        }
        fields
    }

    /// Field map holding only the profile-screen attributes that are set.
    pub fn profile_fields(&self) -> FieldMap {
        let mut map = FieldMap::new();
        let profile = &self.profile;
        fields::put_text(&mut map, "degree", Some(profile.degree.as_str()));
        if let Some(date) = profile.date_of_birth {
            let midnight = date.and_time(NaiveTime::MIN).and_utc();
            map.insert("dateOfBirth".to_owned(), midnight.into());
        }
        if let Some(gender) = profile.gender {
            map.insert("gender".to_owned(), gender.as_str().into());
        }
        fields::put_text(&mut map, "portfolioLink", Some(profile.portfolio_link.as_str()));
        if !profile.address_details.is_empty() {
            map.insert("addressDetails".to_owned(), profile.address_details.to_field());
        }
        map
    }

    /// Projection without the password hash.
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            user_type: self.role,
            avatar: self.avatar.clone(),
            bio: self.bio.clone(),
            location: self.location.clone(),
            rating: self.rating,
            total_sales: self.total_sales,
            follower: self.follower,
            following: self.following,
            profile: self.profile.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Set the rating; values outside 0 to 5 are ignored.
    ///
    /// Returns whether the rating changed.
    pub fn update_rating(&mut self, rating: f64, now: DateTime<Utc>) -> bool {
        if !(0.0..=5.0).contains(&rating) {
            return false;
        }
        self.rating = rating;
        self.updated_at = Some(now);
        true
    }

    /// Count one more completed sale.
    pub fn increment_sales(&mut self, now: DateTime<Utc>) {
        self.total_sales = self.total_sales.saturating_add(1);
        self.updated_at = Some(now);
    }

    /// Name, then email, then [`ANONYMOUS_DISPLAY_NAME`].
    pub fn display_name(&self) -> &str {
        display_name(&self.name, &self.email)
    }
}

/// Session-safe account projection.
///
/// This is the JSON persisted under the `user_data` storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// Store id.
    #[serde(default)]
    pub id: Option<UserId>,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Account role.
    #[serde(default)]
    pub user_type: UserRole,
    /// Avatar URI.
    #[serde(default)]
    pub avatar: String,
    /// Biography.
    #[serde(default)]
    pub bio: String,
    /// Location.
    #[serde(default)]
    pub location: String,
    /// Rating between 0 and 5.
    #[serde(default)]
    pub rating: f64,
    /// Completed sales.
    #[serde(default)]
    pub total_sales: u32,
    /// Follower count.
    #[serde(default)]
    pub follower: u32,
    /// Following count.
    #[serde(default)]
    pub following: u32,
    /// Profile-screen details.
    #[serde(flatten)]
    pub profile: ProfileDetails,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PublicUser {
    /// Name, then email, then [`ANONYMOUS_DISPLAY_NAME`].
    pub fn display_name(&self) -> &str {
        display_name(&self.name, &self.email)
    }

    /// Up to two upper-case initials from the name, else the email's first
    /// letter.
    pub fn initials(&self) -> String {
        initials(&self.name, &self.email)
    }

    /// Whether an avatar URI is set.
    pub fn has_avatar(&self) -> bool {
        !self.avatar.trim().is_empty()
    }

    /// Whether this is a job seeker account.
    pub fn is_applicant(&self) -> bool {
        self.user_type == UserRole::Applicant
    }

    /// Whether this is an employer account.
    pub fn is_employer(&self) -> bool {
        self.user_type == UserRole::Employer
    }

    /// Role label for display.
    pub fn role_label(&self) -> &'static str {
        self.user_type.label()
    }

    /// Same account when ids or emails match.
    pub fn is_same_account(&self, other: &Self) -> bool {
        let same_id = matches!((&self.id, &other.id), (Some(left), Some(right)) if left == right);
        same_id || (!self.email.is_empty() && self.email == other.email)
    }

    /// Age in whole years on `today`, if a birth date is set.
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        self.profile.date_of_birth.map(|born| age_on(born, today))
    }
}

pub(crate) fn display_name<'a>(name: &'a str, email: &'a str) -> &'a str {
    if !name.is_empty() {
        name
    } else if !email.is_empty() {
        email
    } else {
        ANONYMOUS_DISPLAY_NAME
    }
}

fn initials(name: &str, email: &str) -> String {
    if name.trim().is_empty() {
        return email
            .chars()
            .next()
            .map(|first| first.to_uppercase().collect())
            .unwrap_or_default();
    }
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Whole years between `born` and `today`.
pub fn age_on(born: NaiveDate, today: NaiveDate) -> i32 {
    let years = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        years - 1
    } else {
        years
    }
}
