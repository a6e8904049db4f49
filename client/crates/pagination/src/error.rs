//! Error types for cursor encoding and decoding.

use thiserror::Error;

/// Failures raised while turning cursors into tokens and back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The supplied token was empty or whitespace.
    #[error("cursor token must not be empty")]
    Empty,
    /// The token was not valid URL-safe base64.
    #[error("cursor token is not valid base64: {message}")]
    InvalidEncoding {
        /// Decoder error description.
        message: String,
    },
    /// The decoded bytes did not match the expected cursor key shape.
    #[error("cursor token payload is invalid: {message}")]
    InvalidPayload {
        /// Deserialiser error description.
        message: String,
    },
    /// The cursor key could not be serialised.
    #[error("cursor key could not be serialised: {message}")]
    Serialize {
        /// Serialiser error description.
        message: String,
    },
}
