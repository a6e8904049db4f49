//! Store and storage settings loaded via OrthoConfig.
//!
//! Firestore settings read `FIREBASE_*` variables; local session storage
//! reads `HIREBOARD_*`. Required values are only enforced when a component
//! that needs them is built.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::outbound::firestore::{
    DEFAULT_DATABASE_ID, DEFAULT_FIRESTORE_ENDPOINT, DEFAULT_REQUEST_TIMEOUT, FirestoreConfig,
};

const DEFAULT_STORAGE_DIR: &str = ".hireboard";

/// Errors raised while turning settings into adapter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Settings could not be read from the environment or arguments.
    #[error("failed to load settings: {0}")]
    Load(String),
    /// A required setting was absent or blank.
    #[error("missing required setting {0}")]
    Missing(&'static str),
    /// The endpoint is not an absolute http(s) URL.
    #[error("invalid endpoint '{value}': {message}")]
    InvalidEndpoint {
        /// Raw configured value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// The storage directory is not valid UTF-8.
    #[error("storage directory {0:?} is not valid UTF-8")]
    NonUtf8Path(PathBuf),
}

fn required(value: Option<&str>, name: &'static str) -> Result<String, ConfigError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .ok_or(ConfigError::Missing(name))
}

/// Connection settings for the remote document store.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FIREBASE")]
pub struct StoreSettings {
    /// Web API key.
    pub api_key: Option<String>,
    /// Cloud project id.
    pub project_id: Option<String>,
    /// Database id, `(default)` when unset.
    pub database_id: Option<String>,
    /// REST endpoint override, e.g. a local emulator.
    pub endpoint: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Optional bearer token.
    pub auth_token: Option<String>,
}

impl StoreSettings {
    /// Load from the environment only; command-line flags are left to the
    /// caller's own parser.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("hireboard")])
            .map_err(|err| ConfigError::Load(err.to_string()))
    }

    /// Validate into adapter configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for an absent API key or project id
    /// and [`ConfigError::InvalidEndpoint`] for an unusable endpoint.
    pub fn firestore_config(&self) -> Result<FirestoreConfig, ConfigError> {
        let api_key = required(self.api_key.as_deref(), "FIREBASE_API_KEY")?;
        let project_id = required(self.project_id.as_deref(), "FIREBASE_PROJECT_ID")?;
        let raw_endpoint = self
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_FIRESTORE_ENDPOINT);
        let endpoint = Url::parse(raw_endpoint).map_err(|err| ConfigError::InvalidEndpoint {
            value: raw_endpoint.to_owned(),
            message: err.to_string(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                value: raw_endpoint.to_owned(),
                message: "scheme must be http or https".to_owned(),
            });
        }
        let database_id = self
            .database_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_DATABASE_ID)
            .to_owned();
        let timeout = self
            .timeout_secs
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs);
        let auth_token = self
            .auth_token
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_owned);
        Ok(FirestoreConfig {
            endpoint,
            project_id,
            database_id,
            api_key,
            auth_token,
            timeout,
        })
    }
}

/// Location of the device-local session files.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HIREBOARD")]
pub struct LocalStorageSettings {
    /// Directory for session files.
    pub storage_dir: Option<PathBuf>,
}

impl LocalStorageSettings {
    /// Load from the environment only.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from("hireboard")])
            .map_err(|err| ConfigError::Load(err.to_string()))
    }

    /// Configured directory, falling back to `.hireboard`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonUtf8Path`] for a path that is not UTF-8.
    pub fn storage_dir(&self) -> Result<Utf8PathBuf, ConfigError> {
        let path = self
            .storage_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));
        Utf8PathBuf::from_path_buf(path).map_err(ConfigError::NonUtf8Path)
    }
}
