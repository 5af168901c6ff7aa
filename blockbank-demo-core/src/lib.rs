//! BlockBank Demo Core Library
//!
//! Native backends for the BlockBank collaborator traits, shared by the demo
//! applications: a JSON file store for records and uploaded documents, and a
//! local identity provider with Argon2 password hashing.

pub mod identity;
pub mod storage;

pub use identity::LocalIdentityProvider;
pub use storage::DemoStorage;

/// Result type for demo operations
pub type Result<T> = anyhow::Result<T>;
