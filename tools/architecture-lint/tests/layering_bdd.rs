//! Behaviour tests for the client layering lint.

use std::fs;

use architecture_lint::{ArchitectureLintError, LintSource, Violation};
use camino::{Utf8Path, Utf8PathBuf};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use tempfile::TempDir;

#[derive(Default, ScenarioState)]
struct LintWorld {
    sources: Slot<Vec<LintSource>>,
    violations: Slot<Vec<Violation>>,
    succeeded: Slot<bool>,
}

impl LintWorld {
    fn add(&self, file: &str, contents: &str) {
        let mut sources = self.sources.take().unwrap_or_default();
        sources.push(LintSource {
            file: Utf8PathBuf::from(file),
            contents: contents.to_owned(),
        });
        self.sources.set(sources);
    }
}

#[fixture]
fn world() -> LintWorld {
    LintWorld::default()
}

#[given("domain, seeding and outbound modules that respect the layers")]
fn well_layered_modules(world: &LintWorld) {
    world.add(
        "domain/ports/user_repository.rs",
        "pub trait UserRepository { fn count(&self) -> usize; }",
    );
    world.add(
        "domain/auth_service.rs",
        "use super::ports::UserRepository; pub fn f(users: &dyn UserRepository) -> usize { users.count() }",
    );
    world.add(
        "seeding/mod.rs",
        "use crate::domain::ports::UserRepository; pub fn seed(_: &dyn UserRepository) {} \
         #[cfg(test)] mod tests { use crate::outbound::memory_store::InMemoryDocumentStore; }",
    );
    world.add(
        "outbound/storage.rs",
        "use cap_std::fs::Dir; use crate::domain::ports::UserRepository; pub fn open(_: Dir) {}",
    );
}

#[given("a domain module that imports the Firestore adapter")]
fn domain_imports_firestore(world: &LintWorld) {
    world.add(
        "domain/session_manager.rs",
        "use crate::outbound::firestore::FirestoreDocumentStore; pub fn f(_: FirestoreDocumentStore) {}",
    );
}

#[given("a domain module that imports reqwest")]
fn domain_imports_reqwest(world: &LintWorld) {
    world.add(
        "domain/profile.rs",
        "use reqwest::Url; pub fn f(_: Url) {}",
    );
}

#[given("a seeding module that imports the argon2 hasher")]
fn seeding_imports_hasher(world: &LintWorld) {
    world.add(
        "seeding/users.rs",
        "use crate::outbound::password::Argon2CredentialHasher; pub fn f() { let _ = Argon2CredentialHasher; }",
    );
}

fn write_tree(src: &Utf8Path, sources: &[LintSource]) {
    for source in sources {
        let path = src.join(&source.file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directories");
        }
        fs::write(&path, &source.contents).expect("write source file");
    }
}

#[when("the layering lint runs")]
fn the_layering_lint_runs(world: &LintWorld) {
    let sources = world.sources.get().unwrap_or_default();
    let tmp = TempDir::new().expect("temp dir");
    let client = Utf8PathBuf::from_path_buf(tmp.path().join("client")).expect("utf-8 temp path");
    write_tree(&client.join("src"), &sources);

    match architecture_lint::lint_client_sources(&client) {
        Ok(()) => world.succeeded.set(true),
        Err(ArchitectureLintError::Violations(violations)) => {
            world.succeeded.set(false);
            world.violations.set(violations);
        }
        Err(other) => panic!("lint failed to run: {other}"),
    }
}

#[then("the lint succeeds")]
fn the_lint_succeeds(world: &LintWorld) {
    assert_eq!(world.succeeded.get(), Some(true), "{:?}", world.violations.get());
}

#[then("a violation in \"{file}\" mentions \"{fragment}\"")]
fn a_violation_mentions(world: &LintWorld, file: String, fragment: String) {
    let violations = world.violations.get().expect("lint should report violations");
    assert!(
        violations
            .iter()
            .any(|v| v.file.as_str() == file && v.message.contains(&fragment)),
        "no violation in {file} mentioning {fragment}: {violations:?}"
    );
}

#[scenario(path = "tests/features/layering.feature", name = "A well layered client passes")]
fn well_layered_client_passes(world: LintWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/layering.feature",
    name = "Domain code importing an adapter is reported"
)]
fn domain_importing_adapter(world: LintWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/layering.feature",
    name = "Domain code importing the HTTP client is reported"
)]
fn domain_importing_http_client(world: LintWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/layering.feature",
    name = "Every violation across files is reported"
)]
fn every_violation_reported(world: LintWorld) {
    drop(world);
}
