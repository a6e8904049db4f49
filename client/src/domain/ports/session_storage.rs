//! Driven port for the device-local key-value storage holding the session.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;

use super::define_port_error;

/// Keys the session writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Opaque session token.
    AuthToken,
    /// JSON of the signed-in public user.
    UserData,
}

impl StorageKey {
    /// Key name on disk.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthToken => "auth_token",
            Self::UserData => "user_data",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

define_port_error! {
    /// Errors raised by session storage adapters.
    pub enum SessionStorageError {
        /// The storage location could not be opened.
        Unavailable { message: String } => "session storage is unavailable: {message}",
        /// Reading a key failed.
        Read { key: String, message: String } => "failed to read {key}: {message}",
        /// Writing or removing a key failed.
        Write { key: String, message: String } => "failed to write {key}: {message}",
    }
}

/// Asynchronous string key-value storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Stored value, or `None` when the key is absent.
    async fn get_item(&self, key: StorageKey) -> Result<Option<String>, SessionStorageError>;

    /// Replace the value under `key`.
    async fn set_item(&self, key: StorageKey, value: &str) -> Result<(), SessionStorageError>;

    /// Remove `key`; absent keys are ignored.
    async fn remove_item(&self, key: StorageKey) -> Result<(), SessionStorageError>;
}

/// Process-local storage that forgets everything on drop.
///
/// Sharing one instance between two session managers simulates an app
/// restart.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    entries: Mutex<HashMap<StorageKey, String>>,
}

impl MemorySessionStorage {
    /// Storage pre-filled with `entries`.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (StorageKey, &'a str)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key, value.to_owned()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(
        &self,
        key: StorageKey,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<StorageKey, String>>, SessionStorageError> {
        self.entries
            .lock()
            .map_err(|_| SessionStorageError::read(key.as_str(), "storage lock poisoned"))
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn get_item(&self, key: StorageKey) -> Result<Option<String>, SessionStorageError> {
        Ok(self.lock(key)?.get(&key).cloned())
    }

    async fn set_item(&self, key: StorageKey, value: &str) -> Result<(), SessionStorageError> {
        self.lock(key)?.insert(key, value.to_owned());
        Ok(())
    }

    async fn remove_item(&self, key: StorageKey) -> Result<(), SessionStorageError> {
        self.lock(key)?.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    #[tokio::test]
    async fn memory_storage_round_trips_and_removes() {
        let storage = MemorySessionStorage::default();
        storage
            .set_item(StorageKey::AuthToken, "tok")
            .await
            .expect("set");
        assert_eq!(
            storage.get_item(StorageKey::AuthToken).await.expect("get"),
            Some("tok".to_owned())
        );
        storage
            .remove_item(StorageKey::AuthToken)
            .await
            .expect("remove");
        storage
            .remove_item(StorageKey::AuthToken)
            .await
            .expect("second remove is a no-op");
        assert!(storage.get_item(StorageKey::AuthToken).await.expect("get").is_none());
    }

    #[test]
    fn keys_use_documented_names() {
        assert_eq!(StorageKey::AuthToken.as_str(), "auth_token");
        assert_eq!(StorageKey::UserData.as_str(), "user_data");
    }
}
