//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Read-model structs for joined queries where handlers need them

pub mod comment;
pub mod report;
pub mod user;
pub mod voting;
pub mod workgroup;
