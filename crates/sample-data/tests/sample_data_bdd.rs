//! Behavioural tests for the bundled sample dataset.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use std::collections::HashSet;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use sample_data::{DatasetError, SampleDataset, SampleRole};

#[derive(Default, ScenarioState)]
struct World {
    json_input: Slot<String>,
    result: Slot<Result<SampleDataset, DatasetError>>,
}

impl World {
    fn dataset(&self) -> SampleDataset {
        self.result
            .get()
            .expect("dataset result should be set")
            .expect("dataset should be valid")
    }

    fn error(&self) -> DatasetError {
        self.result
            .get()
            .expect("dataset result should be set")
            .expect_err("dataset should be rejected")
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

#[given("the bundled sample dataset")]
fn the_bundled_sample_dataset(world: &World) {
    world.result.set(SampleDataset::embedded());
}

#[given("a dataset JSON with two accounts sharing an email")]
fn a_dataset_json_with_duplicate_accounts(world: &World) {
    let json = r#"{
        "version": 1,
        "users": [
            {"email": "ana@hire.test", "password": "secret12", "name": "Ana"},
            {"email": "Ana@Hire.test", "password": "secret34", "name": "Ana B"}
        ]
    }"#;
    world.json_input.set(json.to_owned());
}

#[given("a dataset JSON with version {version:u32}")]
fn a_dataset_json_with_version(world: &World, version: u32) {
    world.json_input.set(format!(r#"{{"version": {version}}}"#));
}

#[when("the dataset is parsed")]
fn the_dataset_is_parsed(world: &World) {
    let json = world.json_input.get().expect("json input should be set");
    world.result.set(SampleDataset::from_json(&json));
}

#[then("the dataset has {count:usize} categories")]
fn the_dataset_has_categories(world: &World, count: usize) {
    assert_eq!(world.dataset().categories().len(), count);
}

#[then("the dataset has {count:usize} accounts")]
fn the_dataset_has_accounts(world: &World, count: usize) {
    assert_eq!(world.dataset().users().len(), count);
}

#[then("every job posting belongs to an employer account")]
fn every_job_posting_belongs_to_an_employer(world: &World) {
    let dataset = world.dataset();
    let employers: HashSet<&str> = dataset
        .users_with_role(SampleRole::Employer)
        .map(|user| user.email.as_str())
        .collect();
    for posting in dataset.job_postings() {
        let email = posting
            .employer_email
            .as_deref()
            .expect("bundled postings name an employer");
        assert!(employers.contains(email), "{email} is not an employer");
    }
}

#[then("parsing fails with a duplicate email error")]
fn parsing_fails_with_duplicate_email(world: &World) {
    assert!(matches!(world.error(), DatasetError::DuplicateEmail { .. }));
}

#[then("parsing fails with an unsupported version error")]
fn parsing_fails_with_unsupported_version(world: &World) {
    assert_eq!(
        world.error(),
        DatasetError::UnsupportedVersion {
            expected: 1,
            actual: 9
        }
    );
}

#[scenario(path = "tests/features/sample_data.feature", name = "Bundled dataset loads")]
fn bundled_dataset_loads(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sample_data.feature",
    name = "Duplicate account emails are rejected"
)]
fn duplicate_account_emails_are_rejected(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/sample_data.feature",
    name = "Unsupported dataset version is rejected"
)]
fn unsupported_dataset_version_is_rejected(world: World) {
    let _ = world;
}
