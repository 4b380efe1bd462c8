//! Domain vocabulary and pure business rules for the governance dashboard.
//!
//! Nothing in this crate performs I/O; the `agora-db` and `agora-api` crates
//! build on these types and validation helpers.

pub mod comments;
pub mod consensus;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod types;
