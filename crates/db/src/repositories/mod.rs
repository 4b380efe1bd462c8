//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Multi-step transitions open their own
//! transaction.

pub mod comment_repo;
pub mod objection_repo;
pub mod report_repo;
pub mod user_repo;
pub mod vote_repo;
pub mod voting_round_repo;
pub mod workgroup_repo;

pub use comment_repo::{CommentReactionRepo, CommentRepo};
pub use objection_repo::ObjectionRepo;
pub use report_repo::ReportRepo;
pub use user_repo::UserRepo;
pub use vote_repo::VoteRepo;
pub use voting_round_repo::VotingRoundRepo;
pub use workgroup_repo::WorkgroupRepo;
