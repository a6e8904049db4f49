//! File-backed session storage scoped to one directory.
//!
//! Each key is a file named after the key inside a capability-restricted
//! directory. Writes go through a hidden temporary file and a rename, so a
//! crash never leaves a half-written session behind.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

use crate::domain::ports::{SessionStorage, SessionStorageError, StorageKey};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Session storage writing one file per key.
///
/// File calls run on tokio's blocking pool.
#[derive(Debug)]
pub struct FileSessionStorage {
    dir: Arc<Dir>,
    root: Utf8PathBuf,
}

impl FileSessionStorage {
    /// Open `root`, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStorageError::Unavailable`] when the directory
    /// cannot be created or opened.
    pub fn open(root: &Utf8Path) -> Result<Self, SessionStorageError> {
        Dir::create_ambient_dir_all(root, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(root, ambient_authority()))
            .map(|dir| Self::from_dir(dir, root))
            .map_err(|err| SessionStorageError::unavailable(format!("{root}: {err}")))
    }

    /// Wrap an already opened directory.
    pub fn from_dir(dir: Dir, root: &Utf8Path) -> Self {
        Self {
            dir: Arc::new(dir),
            root: root.to_path_buf(),
        }
    }

    /// Directory holding the session files.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    async fn on_blocking_pool<T, F>(&self, op: F) -> io::Result<T>
    where
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let dir = Arc::clone(&self.dir);
        tokio::task::spawn_blocking(move || op(&dir))
            .await
            .map_err(io::Error::other)?
    }
}

fn write_atomic(dir: &Dir, key: StorageKey, contents: &str) -> io::Result<()> {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(".{key}.tmp.{}.{counter}", std::process::id());
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    let written = dir.open_with(&tmp_name, &options).and_then(|mut file| {
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    });
    let renamed = written.and_then(|()| replace(dir, &tmp_name, key.as_str()));
    if renamed.is_err() {
        drop(dir.remove_file(&tmp_name));
    }
    renamed
}

#[cfg(windows)]
fn replace(dir: &Dir, tmp_name: &str, target: &str) -> io::Result<()> {
    match dir.remove_file(target) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target)
}

#[cfg(not(windows))]
fn replace(dir: &Dir, tmp_name: &str, target: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target)
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn get_item(&self, key: StorageKey) -> Result<Option<String>, SessionStorageError> {
        let read = self
            .on_blocking_pool(move |dir| match dir.read_to_string(key.as_str()) {
                Ok(value) => Ok(Some(value)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err),
            })
            .await;
        read.map_err(|err| SessionStorageError::read(key.as_str(), err.to_string()))
    }

    async fn set_item(&self, key: StorageKey, value: &str) -> Result<(), SessionStorageError> {
        let contents = value.to_owned();
        self.on_blocking_pool(move |dir| write_atomic(dir, key, &contents))
            .await
            .map_err(|err| SessionStorageError::write(key.as_str(), err.to_string()))?;
        debug!(%key, root = %self.root, "stored session entry");
        Ok(())
    }

    async fn remove_item(&self, key: StorageKey) -> Result<(), SessionStorageError> {
        self.on_blocking_pool(move |dir| match dir.remove_file(key.as_str()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        })
        .await
        .map_err(|err| SessionStorageError::write(key.as_str(), err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for file-backed session entries.

    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::*;

    struct Scratch {
        _tmp: TempDir,
        storage: FileSessionStorage,
    }

    #[fixture]
    fn scratch() -> Scratch {
        let tmp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().join("session"))
            .expect("utf-8 temp path");
        let storage = FileSessionStorage::open(&root).expect("open storage");
        Scratch { _tmp: tmp, storage }
    }

    #[rstest]
    #[tokio::test]
    async fn missing_entries_read_as_none(scratch: Scratch) {
        let value = scratch
            .storage
            .get_item(StorageKey::AuthToken)
            .await
            .expect("read");
        assert!(value.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn entries_overwrite_and_survive_reopen(scratch: Scratch) {
        let storage = &scratch.storage;
        storage
            .set_item(StorageKey::UserData, "{\"name\":\"Ana\"}")
            .await
            .expect("first write");
        storage
            .set_item(StorageKey::UserData, "{\"name\":\"Ana Cruz\"}")
            .await
            .expect("second write");

        let reopened = FileSessionStorage::open(storage.root()).expect("reopen");
        let value = reopened
            .get_item(StorageKey::UserData)
            .await
            .expect("read");
        assert_eq!(value.as_deref(), Some("{\"name\":\"Ana Cruz\"}"));
        assert!(
            !reopened
                .dir
                .entries()
                .expect("list")
                .filter_map(Result::ok)
                .any(|entry| entry.file_name().to_string_lossy().contains(".tmp.")),
            "temporary files should be renamed away"
        );
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_writes_leave_one_complete_value(scratch: Scratch) {
        let storage = Arc::new(scratch.storage);
        let writes = (0..8).map(|n| {
            let storage = Arc::clone(&storage);
            tokio::spawn(async move {
                storage
                    .set_item(StorageKey::UserData, &format!("{{\"n\":{n}}}"))
                    .await
            })
        });
        for write in writes.collect::<Vec<_>>() {
            write.await.expect("join").expect("write");
        }

        let value = storage
            .get_item(StorageKey::UserData)
            .await
            .expect("read")
            .expect("present");
        assert!((0..8).any(|n| value == format!("{{\"n\":{n}}}")), "{value}");
    }

    #[rstest]
    #[tokio::test]
    async fn removing_is_idempotent(scratch: Scratch) {
        let storage = &scratch.storage;
        storage
            .set_item(StorageKey::AuthToken, "hb_token")
            .await
            .expect("write");
        storage.remove_item(StorageKey::AuthToken).await.expect("remove");
        storage
            .remove_item(StorageKey::AuthToken)
            .await
            .expect("remove again");
        assert!(
            storage
                .get_item(StorageKey::AuthToken)
                .await
                .expect("read")
                .is_none()
        );
    }
}
