//! Opaque resume-point cursors.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CursorError;

/// Resume point wrapping a serialisable key.
///
/// The key is encoded as JSON and then as unpadded URL-safe base64 so the
/// token can travel through query strings and local storage untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor<K> {
    key: K,
}

impl<K> Cursor<K> {
    /// Wrap a resume key.
    pub const fn new(key: K) -> Self {
        Self { key }
    }

    /// Borrow the resume key.
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Consume the cursor and return the resume key.
    pub fn into_key(self) -> K {
        self.key
    }
}

impl<K: Serialize> Cursor<K> {
    /// Encode the cursor as an opaque token.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Serialize`] when the key cannot be serialised.
    pub fn encode(&self) -> Result<String, CursorError> {
        let payload = serde_json::to_vec(&self.key).map_err(|err| CursorError::Serialize {
            message: err.to_string(),
        })?;
        Ok(URL_SAFE_NO_PAD.encode(payload))
    }
}

impl<K: DeserializeOwned> Cursor<K> {
    /// Decode an opaque token produced by [`Cursor::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`CursorError`] when the token is blank, is not base64, or
    /// does not decode into `K`.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        if token.trim().is_empty() {
            return Err(CursorError::Empty);
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|err| CursorError::InvalidEncoding {
                message: err.to_string(),
            })?;
        let key = serde_json::from_slice(&bytes).map_err(|err| CursorError::InvalidPayload {
            message: err.to_string(),
        })?;
        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for cursor tokens.
    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]

    use super::*;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct ResumeKey {
        posted: String,
        id: String,
    }

    #[rstest]
    fn token_is_url_safe_and_round_trips() {
        let cursor = Cursor::new(ResumeKey {
            posted: "2024-05-01T10:00:00Z".to_owned(),
            id: "job/with?odd&chars".to_owned(),
        });

        let token = cursor.encode().expect("encode");
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "token should only contain URL-safe characters: {token}"
        );

        let decoded: Cursor<ResumeKey> = Cursor::decode(&token).expect("decode");
        assert_eq!(decoded, cursor);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_tokens_are_rejected(#[case] token: &str) {
        let err = Cursor::<String>::decode(token).expect_err("blank token");
        assert_eq!(err, CursorError::Empty);
    }

    #[rstest]
    fn non_base64_tokens_are_rejected() {
        let err = Cursor::<String>::decode("not base64!").expect_err("bad token");
        assert!(matches!(err, CursorError::InvalidEncoding { .. }));
    }

    #[rstest]
    fn mismatched_payloads_are_rejected() {
        let token = Cursor::new(42_u32).encode().expect("encode");
        let err = Cursor::<ResumeKey>::decode(&token).expect_err("wrong shape");
        assert!(matches!(err, CursorError::InvalidPayload { .. }));
    }
}
