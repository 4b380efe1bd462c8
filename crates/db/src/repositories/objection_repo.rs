//! Repository for the `objections` table.

use agora_core::types::DbId;
use sqlx::PgPool;

use crate::models::voting::{Objection, ObjectionDetail};

const COLUMNS: &str =
    "id, vote_id, reason, status, resolved_at, resolved_by, created_at, updated_at";

/// Provides lookup and resolution of objections.
pub struct ObjectionRepo;

impl ObjectionRepo {
    /// Find an objection by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Objection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM objections WHERE id = $1");
        sqlx::query_as::<_, Objection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The report an objection was raised against (via vote and round).
    pub async fn find_report_id(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT r.report_id
             FROM objections o
             JOIN votes v ON v.id = o.vote_id
             JOIN voting_rounds r ON r.id = v.round_id
             WHERE o.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Set an objection's status, stamping `resolved_at` and `resolved_by`.
    ///
    /// Re-resolving an already resolved objection overwrites the previous
    /// decision. Returns `None` if the objection does not exist.
    pub async fn resolve(
        pool: &PgPool,
        id: DbId,
        status: &str,
        resolved_by: DbId,
    ) -> Result<Option<Objection>, sqlx::Error> {
        let query = format!(
            "UPDATE objections SET status = $2, resolved_at = NOW(), resolved_by = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Objection>(&query)
            .bind(id)
            .bind(status)
            .bind(resolved_by)
            .fetch_optional(pool)
            .await
    }

    /// All objections raised against a report across its rounds, newest first.
    pub async fn list_for_report(
        pool: &PgPool,
        report_id: DbId,
    ) -> Result<Vec<ObjectionDetail>, sqlx::Error> {
        sqlx::query_as::<_, ObjectionDetail>(
            "SELECT o.id, o.vote_id, r.id AS round_id, r.round_number,
                    v.user_id, u.display_name AS objector_name,
                    o.reason, o.status, o.resolved_at, o.resolved_by, o.created_at
             FROM objections o
             JOIN votes v ON v.id = o.vote_id
             JOIN voting_rounds r ON r.id = v.round_id
             JOIN users u ON u.id = v.user_id
             WHERE r.report_id = $1
             ORDER BY o.created_at DESC, o.id DESC",
        )
        .bind(report_id)
        .fetch_all(pool)
        .await
    }
}
