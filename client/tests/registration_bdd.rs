//! Behavioural tests for account registration.

use std::sync::Arc;

use hireboard::domain::ports::{AuthWorkflow, CollectionName};
use hireboard::domain::{AuthError, PublicUser, RegistrationRequest};
use hireboard::test_support::{FixedClock, MemoryServices};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

mod support;

use support::RuntimeHandle;

#[derive(Clone)]
struct Services(Arc<MemoryServices>);

#[derive(Default, ScenarioState)]
struct RegistrationWorld {
    runtime: Slot<RuntimeHandle>,
    services: Slot<Services>,
    registered: Slot<PublicUser>,
    failure: Slot<AuthError>,
}

impl RegistrationWorld {
    fn services(&self) -> Arc<MemoryServices> {
        self.services.get().expect("services should be set").0
    }

    fn register(&self, request: &RegistrationRequest) {
        let services = self.services();
        let runtime = self.runtime.get().expect("runtime should be set");
        match runtime.block_on(services.auth.register(request)) {
            Ok(user) => self.registered.set(user),
            Err(err) => self.failure.set(err),
        }
    }

    fn stored_accounts(&self) -> usize {
        self.services().store.len(&CollectionName::USERS)
    }
}

#[fixture]
fn world() -> RegistrationWorld {
    let world = RegistrationWorld::default();
    world.runtime.set(RuntimeHandle::current_thread());
    world
}

#[given("an empty account store")]
fn an_empty_account_store(world: &RegistrationWorld) {
    let services = MemoryServices::new(Arc::new(FixedClock::on(2024, 3, 1)));
    world.services.set(Services(Arc::new(services)));
}

#[when("\"{email}\" registers as an applicant named \"{name}\"")]
fn registers_as_applicant(world: &RegistrationWorld, email: String, name: String) {
    world.register(&RegistrationRequest::new(&email, "secret1", &name, "applicant"));
}

#[when(
    "someone registers with email \"{email}\", password \"{password}\" and role \"{role}\""
)]
fn someone_registers_with(
    world: &RegistrationWorld,
    email: String,
    password: String,
    role: String,
) {
    world.register(&RegistrationRequest::new(&email, &password, "Ana", &role));
}

#[then("{count} account is stored")]
fn one_account_is_stored(world: &RegistrationWorld, count: usize) {
    assert_eq!(world.stored_accounts(), count);
}

#[then("{count} accounts are stored")]
fn accounts_are_stored(world: &RegistrationWorld, count: usize) {
    assert_eq!(world.stored_accounts(), count);
}

#[then("the returned account has an id and no password")]
fn returned_account_has_no_password(world: &RegistrationWorld) {
    let user = world.registered.get().expect("registration should succeed");
    assert!(user.id.is_some());
    assert_eq!(user.email, "ana@hire.test");

    let json = serde_json::to_value(&user).expect("public user serialises");
    let object = json.as_object().expect("public user is an object");
    assert!(
        object
            .keys()
            .all(|key| !key.to_ascii_lowercase().contains("password"))
    );
}

#[then("registration fails with \"{message}\"")]
fn registration_fails_with(world: &RegistrationWorld, message: String) {
    let failure = world.failure.get().expect("registration should fail");
    assert_eq!(failure, AuthError::EmailAlreadyRegistered);
    assert_eq!(failure.to_string(), message);
}

#[then("registration fails listing \"{message}\"")]
fn registration_fails_listing(world: &RegistrationWorld, message: String) {
    let failure = world.failure.get().expect("registration should fail");
    let AuthError::Validation(report) = &failure else {
        panic!("expected a validation failure, got {failure:?}");
    };
    assert!(report.errors().iter().any(|m| m == &message));
}

#[scenario(
    path = "tests/features/registration.feature",
    name = "A new applicant registers"
)]
fn new_applicant_registers(world: RegistrationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/registration.feature",
    name = "A duplicate email is rejected"
)]
fn duplicate_email_rejected(world: RegistrationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/registration.feature",
    name = "An invalid form reports every broken rule"
)]
fn invalid_form_reports_rules(world: RegistrationWorld) {
    drop(world);
}
