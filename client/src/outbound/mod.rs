//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **firestore**: reqwest-backed remote document store
//! - **memory_store**: in-process document store with the same query rules
//! - **persistence**: typed repositories over the document access layer
//! - **storage**: file-per-key session storage
//! - **password**: argon2id credential hashing
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod firestore;
pub mod memory_store;
pub mod password;
pub mod persistence;
pub mod storage;
