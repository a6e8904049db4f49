//! Test utilities shared by unit and integration tests.
//!
//! Only compiled for tests or with the `test-support` feature.

use std::sync::Arc;

use camino::Utf8PathBuf;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use tempfile::TempDir;

use crate::domain::ports::{DocumentStore, FixtureCredentialHasher, SessionStorageError};
use crate::domain::{AuthService, DocumentAccess, JobBoard};
use crate::outbound::memory_store::InMemoryDocumentStore;
use crate::outbound::persistence::{DocumentJobPostingRepository, DocumentUserRepository};
use crate::outbound::storage::FileSessionStorage;

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Clock frozen at midnight UTC on the given day.
    pub fn on(year: i32, month: u32, day: u32) -> Self {
        let at = Utc
            .with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .unwrap_or_default();
        Self(at)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// In-memory store with the services tests usually need.
pub struct MemoryServices {
    /// Backing store, for direct inspection.
    pub store: Arc<InMemoryDocumentStore>,
    /// Access layer over `store`.
    pub access: DocumentAccess,
    /// Account repository.
    pub users: Arc<DocumentUserRepository>,
    /// Auth workflow using the reversible fixture hasher.
    pub auth: Arc<AuthService>,
    /// Job board over the posting repository.
    pub jobs: JobBoard,
}

impl MemoryServices {
    /// Build everything over a fresh store and `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let store = Arc::new(InMemoryDocumentStore::new());
        let access = DocumentAccess::new(store.clone() as Arc<dyn DocumentStore>, clock);
        let users = Arc::new(DocumentUserRepository::new(access.clone()));
        let auth = Arc::new(AuthService::new(
            users.clone(),
            Arc::new(FixtureCredentialHasher),
        ));
        let jobs = JobBoard::new(Arc::new(DocumentJobPostingRepository::new(access.clone())));
        Self {
            store,
            access,
            users,
            auth,
            jobs,
        }
    }
}

/// File-backed session storage inside a temporary directory.
///
/// The directory is removed when the returned [`TempDir`] drops.
///
/// # Errors
///
/// Returns [`SessionStorageError::Unavailable`] when the directory cannot be
/// created.
pub fn temp_session_storage() -> Result<(TempDir, FileSessionStorage), SessionStorageError> {
    let tmp = TempDir::new().map_err(|err| SessionStorageError::unavailable(err.to_string()))?;
    let root = Utf8PathBuf::from_path_buf(tmp.path().join("session")).map_err(|path| {
        SessionStorageError::unavailable(format!("non UTF-8 path {}", path.display()))
    })?;
    let storage = FileSessionStorage::open(&root)?;
    Ok((tmp, storage))
}
