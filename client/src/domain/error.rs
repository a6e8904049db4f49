//! Workflow-level error type surfaced to presentation layers.
//!
//! These errors carry a stable code plus a message that is safe to show to
//! the person using the app. Raw transport detail never reaches `message`;
//! adapters log it instead.

use serde::{Deserialize, Serialize};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The input failed validation.
    InvalidRequest,
    /// Credentials were wrong or missing.
    Unauthorized,
    /// The record already exists.
    Conflict,
    /// The requested record does not exist.
    NotFound,
    /// The document store could not complete the call; retrying may help.
    ServiceUnavailable,
    /// An unexpected failure inside the client.
    InternalError,
}

impl ErrorCode {
    /// Message used when a caller supplies a blank one.
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "The request is invalid",
            Self::Unauthorized => "Invalid email or password",
            Self::Conflict => "The record already exists",
            Self::NotFound => "The record was not found",
            Self::ServiceUnavailable => "The service is unavailable, please try again",
            Self::InternalError => "An unexpected error occurred",
        }
    }
}

/// Error payload returned by workflows.
///
/// ## Invariants
/// - `message` is never blank; blank input falls back to the code's
///   default message.
///
/// # Examples
/// ```
/// use hireboard::domain::{DomainError, ErrorCode};
///
/// let err = DomainError::new(ErrorCode::NotFound, "  ");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "The record was not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainError {
    code: ErrorCode,
    message: String,
}

impl DomainError {
    /// Create an error, substituting the code's default for a blank message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.default_message().to_owned()
        } else {
            message
        };
        Self { code, message }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Whether a retry prompt makes sense.
    pub fn is_retryable(&self) -> bool {
        self.code == ErrorCode::ServiceUnavailable
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(DomainError::invalid_request("bad"), ErrorCode::InvalidRequest)]
    #[case(DomainError::unauthorized("no"), ErrorCode::Unauthorized)]
    #[case(DomainError::conflict("dup"), ErrorCode::Conflict)]
    #[case(DomainError::not_found("gone"), ErrorCode::NotFound)]
    #[case(DomainError::service_unavailable("later"), ErrorCode::ServiceUnavailable)]
    #[case(DomainError::internal("oops"), ErrorCode::InternalError)]
    fn constructors_set_codes(#[case] err: DomainError, #[case] expected: ErrorCode) {
        assert_eq!(err.code(), expected);
    }

    #[test]
    fn blank_messages_use_defaults() {
        let err = DomainError::internal("");
        assert_eq!(err.to_string(), "An unexpected error occurred");
    }

    #[test]
    fn only_unavailable_errors_are_retryable() {
        assert!(DomainError::service_unavailable("x").is_retryable());
        assert!(!DomainError::conflict("x").is_retryable());
    }

    #[test]
    fn serialises_code_in_snake_case() {
        let err = DomainError::service_unavailable("try later");
        let json = serde_json::to_value(&err).expect("serialise");
        assert_eq!(
            json,
            serde_json::json!({ "code": "service_unavailable", "message": "try later" })
        );
    }
}
