//! Repository for the `votes` table and the per-report vote tally.

use agora_core::consensus::{
    VoteStatistics, OBJECTION_PENDING, ROUND_STATUS_ACTIVE, VOTE_OBJECT,
};
use agora_core::types::DbId;
use sqlx::PgPool;

use crate::models::voting::{CastVote, CastVoteResult, Objection, Vote, VoteDetail, VoteSummary};
use crate::repositories::VotingRoundRepo;

const COLUMNS: &str = "id, round_id, user_id, vote_type, feedback, created_at, updated_at";

const OBJECTION_COLUMNS: &str =
    "id, vote_id, reason, status, resolved_at, resolved_by, created_at, updated_at";

/// Provides vote casting and tallying.
pub struct VoteRepo;

impl VoteRepo {
    /// Cast a vote, replacing the user's earlier vote in the same round.
    ///
    /// An `OBJECT` vote creates (or re-opens with the new reason) a `PENDING`
    /// objection on the vote; any other vote type removes the vote's
    /// objection. Vote and objection are written in one transaction that
    /// holds a share lock on the round, so a concurrent close waits for it.
    ///
    /// Returns `None` if the round does not exist or is no longer `ACTIVE`.
    pub async fn cast(
        pool: &PgPool,
        input: &CastVote,
    ) -> Result<Option<CastVoteResult>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let round: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM voting_rounds WHERE id = $1 AND status = $2 FOR SHARE",
        )
        .bind(input.round_id)
        .bind(ROUND_STATUS_ACTIVE)
        .fetch_optional(&mut *tx)
        .await?;
        if round.is_none() {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO votes (round_id, user_id, vote_type, feedback)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (round_id, user_id)
             DO UPDATE SET vote_type = EXCLUDED.vote_type, feedback = EXCLUDED.feedback
             RETURNING {COLUMNS}"
        );
        let vote = sqlx::query_as::<_, Vote>(&query)
            .bind(input.round_id)
            .bind(input.user_id)
            .bind(&input.vote_type)
            .bind(&input.feedback)
            .fetch_one(&mut *tx)
            .await?;

        let objection = if input.vote_type == VOTE_OBJECT {
            let query = format!(
                "INSERT INTO objections (vote_id, reason, status)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (vote_id) DO UPDATE SET
                    reason = EXCLUDED.reason,
                    status = EXCLUDED.status,
                    resolved_at = NULL,
                    resolved_by = NULL
                 RETURNING {OBJECTION_COLUMNS}"
            );
            let objection = sqlx::query_as::<_, Objection>(&query)
                .bind(vote.id)
                .bind(input.objection_reason.as_deref().unwrap_or_default())
                .bind(OBJECTION_PENDING)
                .fetch_one(&mut *tx)
                .await?;
            Some(objection)
        } else {
            sqlx::query("DELETE FROM objections WHERE vote_id = $1")
                .bind(vote.id)
                .execute(&mut *tx)
                .await?;
            None
        };

        tx.commit().await?;
        Ok(Some(CastVoteResult { vote, objection }))
    }

    /// All votes of a round with voter names and objection state, in the
    /// order they were first cast.
    pub async fn list_for_round(
        pool: &PgPool,
        round_id: DbId,
    ) -> Result<Vec<VoteDetail>, sqlx::Error> {
        sqlx::query_as::<_, VoteDetail>(
            "SELECT v.id, v.round_id, v.user_id, u.display_name AS voter_name,
                    v.vote_type, v.feedback,
                    o.id AS objection_id, o.status AS objection_status,
                    v.created_at
             FROM votes v
             JOIN users u ON u.id = v.user_id
             LEFT JOIN objections o ON o.vote_id = v.id
             WHERE v.round_id = $1
             ORDER BY v.created_at ASC, v.id ASC",
        )
        .bind(round_id)
        .fetch_all(pool)
        .await
    }

    /// Votes and statistics for the report's active round.
    ///
    /// A report without an active round yields an empty list and zero counts.
    pub async fn summary_for_report(
        pool: &PgPool,
        report_id: DbId,
    ) -> Result<VoteSummary, sqlx::Error> {
        let Some(round) = VotingRoundRepo::find_active(pool, report_id).await? else {
            return Ok(VoteSummary {
                round: None,
                votes: Vec::new(),
                statistics: VoteStatistics::default(),
            });
        };

        let votes = Self::list_for_round(pool, round.id).await?;
        let statistics = VoteStatistics::tally(votes.iter().map(|v| v.vote_type.as_str()));

        Ok(VoteSummary {
            round: Some(round),
            votes,
            statistics,
        })
    }
}
