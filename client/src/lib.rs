//! Hireboard client core.
//!
//! Document access over a remote store, typed repositories, the auth and
//! profile workflows, job browsing and the persisted session state machine.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod seeding;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
