//! Behavioural tests for signing in, restoring and signing out.

use std::sync::Arc;

use hireboard::domain::ports::{AuthWorkflow, SessionStorage, StorageKey};
use hireboard::domain::{AuthError, RegistrationRequest, RouteGate, SessionManager, SessionState};
use hireboard::outbound::storage::FileSessionStorage;
use hireboard::test_support::{FixedClock, MemoryServices, temp_session_storage};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use tempfile::TempDir;

mod support;

use support::RuntimeHandle;

#[derive(Clone)]
struct Services(Arc<MemoryServices>);

#[derive(Clone)]
struct Manager(Arc<SessionManager>);

#[derive(Default, ScenarioState)]
struct SessionWorld {
    runtime: Slot<RuntimeHandle>,
    services: Slot<Services>,
    scratch: Slot<Arc<TempDir>>,
    storage: Slot<Arc<FileSessionStorage>>,
    manager: Slot<Manager>,
    email: Slot<String>,
    failure: Slot<AuthError>,
    restored: Slot<SessionState>,
}

impl SessionWorld {
    fn runtime(&self) -> RuntimeHandle {
        self.runtime.get().expect("runtime should be set")
    }

    fn manager(&self) -> Arc<SessionManager> {
        self.manager.get().expect("manager should be set").0
    }

    fn storage(&self) -> Arc<FileSessionStorage> {
        self.storage.get().expect("storage should be set")
    }

    fn start_app(&self) -> Arc<SessionManager> {
        let services = self.services.get().expect("services should be set").0;
        let storage = FileSessionStorage::open(self.storage().root()).expect("reopen storage");
        let manager = Arc::new(SessionManager::new(Arc::new(storage), services.auth.clone()));
        self.manager.set(Manager(manager.clone()));
        manager
    }
}

#[fixture]
fn world() -> SessionWorld {
    let world = SessionWorld::default();
    world.runtime.set(RuntimeHandle::current_thread());
    let services = MemoryServices::new(Arc::new(FixedClock::on(2024, 3, 1)));
    world.services.set(Services(Arc::new(services)));
    let (scratch, storage) = temp_session_storage().expect("temp storage");
    world.scratch.set(Arc::new(scratch));
    world.storage.set(Arc::new(storage));
    world
}

#[given("a registered applicant \"{email}\" with password \"{password}\"")]
fn a_registered_applicant(world: &SessionWorld, email: String, password: String) {
    let services = world.services.get().expect("services should be set").0;
    let request = RegistrationRequest::new(&email, &password, "Ana Cruz", "applicant");
    world
        .runtime()
        .block_on(services.auth.register(&request))
        .expect("registration should succeed");
    world.email.set(email);
    let manager = world.start_app();
    world.runtime().block_on(manager.restore());
}

#[when("the applicant signs in with password \"{password}\"")]
fn the_applicant_signs_in(world: &SessionWorld, password: String) {
    let email = world.email.get().expect("email should be set");
    let manager = world.manager();
    if let Err(err) = world.runtime().block_on(manager.login(&email, &password)) {
        world.failure.set(err);
    }
}

#[when("the applicant signs out")]
fn the_applicant_signs_out(world: &SessionWorld) {
    let manager = world.manager();
    world
        .runtime()
        .block_on(manager.logout())
        .expect("sign-out should succeed");
}

#[when("the app restarts")]
fn the_app_restarts(world: &SessionWorld) {
    let manager = world.start_app();
    let restored = world.runtime().block_on(manager.restore());
    world.restored.set(restored);
}

#[then("the restored session is signed in as \"{email}\"")]
fn the_restored_session_is_signed_in(world: &SessionWorld, email: String) {
    let restored = world.restored.get().expect("restored state should be set");
    assert!(restored.is_authenticated);
    assert!(restored.token.is_some());
    let user = restored.user.expect("restored user");
    assert_eq!(user.email, email);
    assert_eq!(user.name, "Ana Cruz");
}

#[then("protected screens are allowed")]
fn protected_screens_are_allowed(world: &SessionWorld) {
    let restored = world.restored.get().expect("restored state should be set");
    assert_eq!(restored.route_gate(), RouteGate::Allowed);
}

#[then("protected screens are denied")]
fn protected_screens_are_denied(world: &SessionWorld) {
    let restored = world.restored.get().expect("restored state should be set");
    assert_eq!(restored.route_gate(), RouteGate::Denied);
    assert!(restored.user.is_none());
}

#[then("sign-in fails with \"{message}\"")]
fn sign_in_fails_with(world: &SessionWorld, message: String) {
    let failure = world.failure.get().expect("sign-in should have failed");
    assert_eq!(failure, AuthError::InvalidCredentials);
    assert_eq!(failure.to_string(), message);
}

#[then("device storage holds no session")]
fn device_storage_holds_no_session(world: &SessionWorld) {
    let storage = world.storage();
    let runtime = world.runtime();
    for key in [StorageKey::AuthToken, StorageKey::UserData] {
        let value = runtime
            .block_on(storage.get_item(key))
            .expect("storage should be readable");
        assert!(value.is_none(), "{key} should be absent");
    }
}

#[then("the session records the error \"{message}\"")]
fn the_session_records_the_error(world: &SessionWorld, message: String) {
    let manager = world.manager();
    let state = world.runtime().block_on(manager.state());
    assert!(!state.is_authenticated);
    assert!(!state.is_loading);
    assert_eq!(state.error.as_deref(), Some(message.as_str()));
}

#[scenario(
    path = "tests/features/session.feature",
    name = "A session survives a restart"
)]
fn session_survives_restart(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "A wrong password leaves nothing behind"
)]
fn wrong_password_leaves_nothing(world: SessionWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session.feature",
    name = "Signing out clears device storage"
)]
fn sign_out_clears_storage(world: SessionWorld) {
    drop(world);
}
