//! Authentication primitives.
//!
//! - [`jwt`] -- validation of HS256 access tokens issued by the identity
//!   provider, plus token minting for trusted tooling and tests.

pub mod jwt;
