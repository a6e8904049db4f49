//! Public profile lookup and validated profile edits.

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::Clock;
use tracing::{info, warn};
use url::Url;

use crate::domain::ports::{DocumentStoreError, FieldMap, FieldValue, UserRepository};
use crate::domain::user::age_on;
use crate::domain::{AddressDetails, DomainError, Gender, PublicUser, UserId, ValidationReport};

/// Youngest accepted age on the profile form.
pub const MIN_PROFILE_AGE: i32 = 16;
/// Oldest accepted age on the profile form.
pub const MAX_PROFILE_AGE: i32 = 100;

/// Values submitted from the profile edit form.
///
/// Text fields are trimmed on construction. `gender` stays raw so
/// validation can report values outside the enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// Display name.
    pub name: String,
    /// Biography.
    pub bio: String,
    /// Highest degree.
    pub degree: String,
    /// Date of birth.
    pub date_of_birth: Option<NaiveDate>,
    /// Raw gender selection; empty when unset.
    pub gender: String,
    /// Portfolio URL; empty when unset.
    pub portfolio_link: String,
    /// Postal address.
    pub address_details: AddressDetails,
}

impl ProfileUpdate {
    /// Trim every text field.
    #[must_use]
    pub fn trimmed(self) -> Self {
        let trim = |value: String| value.trim().to_owned();
        Self {
            name: trim(self.name),
            bio: trim(self.bio),
            degree: trim(self.degree),
            date_of_birth: self.date_of_birth,
            gender: trim(self.gender),
            portfolio_link: trim(self.portfolio_link),
            address_details: AddressDetails {
                province: trim(self.address_details.province),
                city: trim(self.address_details.city),
                baranggay: trim(self.address_details.baranggay),
            },
        }
    }

    fn parsed_gender(&self) -> Option<Gender> {
        self.gender.parse().ok()
    }

    /// Check the profile form rules as of `today`.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use hireboard::domain::ProfileUpdate;
    ///
    /// let update = ProfileUpdate {
    ///     name: "Ana".into(),
    ///     portfolio_link: "not a url".into(),
    ///     ..ProfileUpdate::default()
    /// };
    /// let today = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
    /// assert_eq!(update.validate(today).errors(), ["Please enter a valid URL"]);
    /// ```
    pub fn validate(&self, today: NaiveDate) -> ValidationReport {
        let mut report = ValidationReport::default();
        report.require(!self.name.trim().is_empty(), "Name is required");
        report.require(
            self.portfolio_link.is_empty() || Url::parse(&self.portfolio_link).is_ok(),
            "Please enter a valid URL",
        );
        report.require(
            self.date_of_birth
                .map(|born| age_on(born, today))
                .is_none_or(|age| (MIN_PROFILE_AGE..=MAX_PROFILE_AGE).contains(&age)),
            format!("Age must be between {MIN_PROFILE_AGE} and {MAX_PROFILE_AGE} years"),
        );
        report.require(
            self.gender.is_empty() || self.parsed_gender().is_some(),
            "Please select a valid gender",
        );
        report
    }

    /// Field map written to the store.
    ///
    /// Every field is written, so clearing a value on the form clears it
    /// in the store.
    pub fn to_fields(&self) -> FieldMap {
        let mut map = FieldMap::new();
        map.insert("name".to_owned(), self.name.clone().into());
        map.insert("bio".to_owned(), self.bio.clone().into());
        map.insert("degree".to_owned(), self.degree.clone().into());
        map.insert(
            "dateOfBirth".to_owned(),
            self.date_of_birth
                .map_or(FieldValue::Null, |date| {
                    date.and_time(chrono::NaiveTime::MIN).and_utc().into()
                }),
        );
        map.insert(
            "gender".to_owned(),
            self.parsed_gender()
                .map_or(FieldValue::Null, |gender| gender.as_str().into()),
        );
        map.insert("portfolioLink".to_owned(), self.portfolio_link.clone().into());
        let address = &self.address_details;
        let mut address_map = FieldMap::new();
        address_map.insert("province".to_owned(), address.province.clone().into());
        address_map.insert("city".to_owned(), address.city.clone().into());
        address_map.insert("baranggay".to_owned(), address.baranggay.clone().into());
        map.insert("addressDetails".to_owned(), FieldValue::Map(address_map));
        map
    }
}

/// Failures of the profile workflow; `Display` is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// Form input broke one or more rules.
    #[error("{}", .0.joined())]
    Validation(ValidationReport),
    /// The account does not exist.
    #[error("User not found")]
    NotFound,
    /// The store could not complete the call.
    #[error("Failed to update profile. Please try again.")]
    Unavailable,
}

impl From<ProfileError> for DomainError {
    fn from(value: ProfileError) -> Self {
        let message = value.to_string();
        match value {
            ProfileError::Validation(_) => Self::invalid_request(message),
            ProfileError::NotFound => Self::not_found(message),
            ProfileError::Unavailable => Self::service_unavailable(message),
        }
    }
}

fn map_store_error(err: DocumentStoreError) -> ProfileError {
    match err {
        DocumentStoreError::NotFound { .. } => ProfileError::NotFound,
        other => {
            warn!(error = %other, "profile store call failed");
            ProfileError::Unavailable
        }
    }
}

/// Reads public profiles and applies profile edits.
#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl ProfileService {
    /// Create the service.
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    /// Public view of an account, or `None` when it does not exist.
    pub async fn public_profile(&self, id: &UserId) -> Result<Option<PublicUser>, ProfileError> {
        let user = self.users.find_by_id(id).await.map_err(map_store_error)?;
        Ok(user.map(|user| user.to_public()))
    }

    /// Validate and save a profile edit, returning the updated account.
    pub async fn update_profile(
        &self,
        id: &UserId,
        update: ProfileUpdate,
    ) -> Result<PublicUser, ProfileError> {
        let update = update.trimmed();
        let report = update.validate(self.clock.utc().date_naive());
        if !report.is_valid() {
            return Err(ProfileError::Validation(report));
        }
        self.users
            .update(id, update.to_fields())
            .await
            .map_err(map_store_error)?;
        info!(user_id = %id, "profile updated");
        self.public_profile(id).await?.ok_or(ProfileError::NotFound)
    }
}
