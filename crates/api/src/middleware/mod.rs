//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Claims of a valid JWT Bearer token.
//! - [`auth::CurrentUser`] -- The token's subject, loaded from the database.
//! - [`rbac::RequireAuth`] -- Any active provisioned user.
//! - [`rbac::RequireAdmin`] -- A global `ADMIN` or `SUPER_ADMIN`.

pub mod auth;
pub mod rbac;
