//! Voting round, vote, and objection models.

use agora_core::consensus::VoteStatistics;
use agora_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `voting_rounds` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VotingRound {
    pub id: DbId,
    pub report_id: DbId,
    pub round_number: i32,
    /// `ACTIVE` or `CLOSED`.
    pub status: String,
    pub started_at: Timestamp,
    pub ended_at: Option<Timestamp>,
}

/// A row from the `votes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vote {
    pub id: DbId,
    pub round_id: DbId,
    pub user_id: DbId,
    pub vote_type: String,
    pub feedback: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for casting (or re-casting) a vote in a round.
#[derive(Debug, Clone, Deserialize)]
pub struct CastVote {
    pub round_id: DbId,
    pub user_id: DbId,
    pub vote_type: String,
    pub feedback: Option<String>,
    /// Required (already validated) when `vote_type` is `OBJECT`.
    pub objection_reason: Option<String>,
}

/// A vote joined with the voter's name and any attached objection.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VoteDetail {
    pub id: DbId,
    pub round_id: DbId,
    pub user_id: DbId,
    pub voter_name: String,
    pub vote_type: String,
    pub feedback: Option<String>,
    pub objection_id: Option<DbId>,
    pub objection_status: Option<String>,
    pub created_at: Timestamp,
}

/// Votes of the active round plus their tally.
#[derive(Debug, Clone, Serialize)]
pub struct VoteSummary {
    pub round: Option<VotingRound>,
    pub votes: Vec<VoteDetail>,
    pub statistics: VoteStatistics,
}

/// Result of casting a vote.
#[derive(Debug, Clone, Serialize)]
pub struct CastVoteResult {
    pub vote: Vote,
    pub objection: Option<Objection>,
}

/// A row from the `objections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Objection {
    pub id: DbId,
    pub vote_id: DbId,
    pub reason: String,
    /// `PENDING`, `VALID` or `INVALID`.
    pub status: String,
    pub resolved_at: Option<Timestamp>,
    pub resolved_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An objection with its round and objector, for per-report listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ObjectionDetail {
    pub id: DbId,
    pub vote_id: DbId,
    pub round_id: DbId,
    pub round_number: i32,
    pub user_id: DbId,
    pub objector_name: String,
    pub reason: String,
    pub status: String,
    pub resolved_at: Option<Timestamp>,
    pub resolved_by: Option<DbId>,
    pub created_at: Timestamp,
}
