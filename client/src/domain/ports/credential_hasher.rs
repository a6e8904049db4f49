//! Driven port for salted one-way password hashing.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing a password.
    pub enum CredentialHashError {
        /// The hashing backend failed.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Hashes passwords for storage and verifies login attempts.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Salted hash of `password`.
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHashError>;

    /// Whether `password` produced `hash`. Malformed hashes never verify.
    fn verify(&self, password: &str, hash: &PasswordHash) -> bool;
}

/// Reversible stand-in for tests; never use it for real accounts.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCredentialHasher;

const FIXTURE_PREFIX: &str = "fixture$";

impl CredentialHasher for FixtureCredentialHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialHashError> {
        Ok(PasswordHash::new(format!("{FIXTURE_PREFIX}{password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        hash.as_str()
            .strip_prefix(FIXTURE_PREFIX)
            .is_some_and(|stored| stored == password)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    #[test]
    fn fixture_hasher_verifies_its_own_hashes() {
        let hasher = FixtureCredentialHasher;
        let hash = hasher.hash("secret1").expect("hash");
        assert!(hasher.verify("secret1", &hash));
        assert!(!hasher.verify("secret2", &hash));
        assert!(!hasher.verify("secret1", &PasswordHash::new("secret1")));
    }
}
