pub mod admin;
pub mod auth;
pub mod comments;
pub mod objections;
pub mod reports;
pub mod rounds;
pub mod votes;
pub mod workgroups;
