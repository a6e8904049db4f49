//! Login and registration inputs plus the errors the auth workflow raises.
//!
//! Passwords live in [`Zeroizing`] buffers so they are wiped once the
//! workflow drops them.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{DomainError, UserRole, ValidationReport};
use sample_data::MIN_PASSWORD_LEN;

/// Message shown for every failed login.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Message shown when registering an email that already has an account.
pub const EMAIL_TAKEN_MESSAGE: &str = "Email already registered";

/// Trim and lower-case an email so lookups match exactly.
///
/// # Examples
/// ```
/// use hireboard::domain::normalise_email;
///
/// assert_eq!(normalise_email("  Ana@Hire.Test "), "ana@hire.test");
/// ```
pub fn normalise_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Email and password typed into the login form.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Capture raw form input; the email is normalised.
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: normalise_email(email),
            password: Zeroizing::new(password.to_owned()),
        }
    }

    /// Normalised email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as typed.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Check the login form rules.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        report.require(self.email.contains('@'), "Valid email is required");
        report.require(!self.password.is_empty(), "Password is required");
        report
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Input collected by the registration form.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    email: String,
    password: Zeroizing<String>,
    name: String,
    user_type: String,
}

impl RegistrationRequest {
    /// Capture raw form input. `user_type` stays raw so validation can
    /// report values outside the role set.
    pub fn new(email: &str, password: &str, name: &str, user_type: &str) -> Self {
        Self {
            email: normalise_email(email),
            password: Zeroizing::new(password.to_owned()),
            name: name.trim().to_owned(),
            user_type: user_type.trim().to_owned(),
        }
    }

    /// Normalised email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as typed.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Trimmed display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Parsed role, if the raw value is in the role set.
    pub fn role(&self) -> Option<UserRole> {
        self.user_type.parse().ok()
    }

    /// Check the registration rules.
    ///
    /// # Examples
    /// ```
    /// use hireboard::domain::RegistrationRequest;
    ///
    /// let report = RegistrationRequest::new("nobody", "123", " ", "admin").validate();
    /// assert_eq!(report.errors().len(), 4);
    /// ```
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        report.require(self.email.contains('@'), "Valid email is required");
        report.require(
            self.password.chars().count() >= MIN_PASSWORD_LEN,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters long"),
        );
        report.require(!self.name.is_empty(), "Name is required");
        report.require(self.role().is_some(), "Valid user type is required");
        report
    }
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("user_type", &self.user_type)
            .finish_non_exhaustive()
    }
}

/// Failures of the login and registration workflow.
///
/// `Display` is the message shown to the person signing in.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Unknown email, wrong password or a failed lookup.
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,
    /// Registration hit an existing account.
    #[error("{}", EMAIL_TAKEN_MESSAGE)]
    EmailAlreadyRegistered,
    /// Form input broke one or more rules.
    #[error("{}", .0.joined())]
    Validation(ValidationReport),
    /// The store or storage failed; details are only logged.
    #[error("An unexpected error occurred")]
    Unavailable,
}

impl From<AuthError> for DomainError {
    fn from(value: AuthError) -> Self {
        let message = value.to_string();
        match value {
            AuthError::InvalidCredentials => Self::unauthorized(message),
            AuthError::EmailAlreadyRegistered => Self::conflict(message),
            AuthError::Validation(_) => Self::invalid_request(message),
            AuthError::Unavailable => Self::service_unavailable(message),
        }
    }
}
