//! Repository for the `voting_rounds` table and the round lifecycle.
//!
//! Opening and closing rounds are multi-statement transitions. Each runs in a
//! single transaction that first locks the owning `reports` row, so concurrent
//! callers for the same report are serialized. The partial unique index
//! `uq_voting_rounds_one_active` and `uq_voting_rounds_report_round_number`
//! back the invariants at the storage level.

use agora_core::consensus::{
    next_round_number, CONSENSUS_IN_PROGRESS, CONSENSUS_REACHED, ROUND_STATUS_ACTIVE,
    ROUND_STATUS_CLOSED,
};
use agora_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::report::Report;
use crate::models::voting::VotingRound;

const COLUMNS: &str = "id, report_id, round_number, status, started_at, ended_at";

const REPORT_COLUMNS: &str =
    "id, title, content, workgroup_id, created_by, consensus_status, created_at, updated_at";

/// Provides lifecycle operations for voting rounds.
pub struct VotingRoundRepo;

impl VotingRoundRepo {
    /// Open a new round for a report, closing the currently active one.
    ///
    /// In one transaction:
    /// 1. lock the report row (`FOR UPDATE`),
    /// 2. close any `ACTIVE` round, stamping `ended_at`,
    /// 3. insert round `max(round_number) + 1` as `ACTIVE`,
    /// 4. set the report's `consensus_status` to `IN_CONSENSUS`.
    ///
    /// Returns `None` if the report does not exist.
    pub async fn open_new_round(
        pool: &PgPool,
        report_id: DbId,
    ) -> Result<Option<VotingRound>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !lock_report(&mut tx, report_id).await? {
            return Ok(None);
        }

        close_active_in_tx(&mut tx, report_id).await?;

        let max: (Option<i32>,) =
            sqlx::query_as("SELECT MAX(round_number) FROM voting_rounds WHERE report_id = $1")
                .bind(report_id)
                .fetch_one(&mut *tx)
                .await?;
        let round_number = next_round_number(max.0);

        let query = format!(
            "INSERT INTO voting_rounds (report_id, round_number, status, started_at)
             VALUES ($1, $2, $3, NOW())
             RETURNING {COLUMNS}"
        );
        let round = sqlx::query_as::<_, VotingRound>(&query)
            .bind(report_id)
            .bind(round_number)
            .bind(ROUND_STATUS_ACTIVE)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE reports SET consensus_status = $2 WHERE id = $1")
            .bind(report_id)
            .bind(CONSENSUS_IN_PROGRESS)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(report_id, round_number, "Voting round transition committed");
        Ok(Some(round))
    }

    /// Close the active round of a report without opening a new one.
    ///
    /// Returns the closed round, or `None` if there was no active round.
    pub async fn close_active(
        pool: &PgPool,
        report_id: DbId,
    ) -> Result<Option<VotingRound>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if !lock_report(&mut tx, report_id).await? {
            return Ok(None);
        }
        let closed = close_active_in_tx(&mut tx, report_id).await?;
        tx.commit().await?;
        Ok(closed)
    }

    /// Mark consensus as reached: close the active round (if any) and set the
    /// report's status to `CONSENSUS_REACHED`.
    ///
    /// Returns `None` if the report does not exist.
    pub async fn resolve_consensus(
        pool: &PgPool,
        report_id: DbId,
    ) -> Result<Option<Report>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if !lock_report(&mut tx, report_id).await? {
            return Ok(None);
        }

        close_active_in_tx(&mut tx, report_id).await?;

        let query = format!(
            "UPDATE reports SET consensus_status = $2 WHERE id = $1 RETURNING {REPORT_COLUMNS}"
        );
        let report = sqlx::query_as::<_, Report>(&query)
            .bind(report_id)
            .bind(CONSENSUS_REACHED)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(report))
    }

    /// The report's `ACTIVE` round, if any.
    pub async fn find_active(
        pool: &PgPool,
        report_id: DbId,
    ) -> Result<Option<VotingRound>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM voting_rounds WHERE report_id = $1 AND status = $2"
        );
        sqlx::query_as::<_, VotingRound>(&query)
            .bind(report_id)
            .bind(ROUND_STATUS_ACTIVE)
            .fetch_optional(pool)
            .await
    }

    /// All rounds of a report, oldest first.
    pub async fn list_for_report(
        pool: &PgPool,
        report_id: DbId,
    ) -> Result<Vec<VotingRound>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM voting_rounds WHERE report_id = $1 ORDER BY round_number ASC"
        );
        sqlx::query_as::<_, VotingRound>(&query)
            .bind(report_id)
            .fetch_all(pool)
            .await
    }
}

/// Lock the report row for the rest of the transaction. Returns `false` if
/// the report does not exist.
async fn lock_report(
    tx: &mut Transaction<'_, Postgres>,
    report_id: DbId,
) -> Result<bool, sqlx::Error> {
    let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM reports WHERE id = $1 FOR UPDATE")
        .bind(report_id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(row.is_some())
}

/// Close the report's active round inside an open transaction.
async fn close_active_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    report_id: DbId,
) -> Result<Option<VotingRound>, sqlx::Error> {
    let query = format!(
        "UPDATE voting_rounds SET status = $3, ended_at = NOW()
         WHERE report_id = $1 AND status = $2
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, VotingRound>(&query)
        .bind(report_id)
        .bind(ROUND_STATUS_ACTIVE)
        .bind(ROUND_STATUS_CLOSED)
        .fetch_optional(&mut **tx)
        .await
}
