//! Repository for the `workgroups` and `workgroup_members` tables.

use agora_core::roles::MEMBER_ROLE_ADMIN;
use agora_core::types::DbId;
use sqlx::PgPool;

use crate::models::workgroup::{
    CreateWorkgroup, Workgroup, WorkgroupMember, WorkgroupMemberDetail,
};

const COLUMNS: &str = "id, name, description, created_by, created_at, updated_at";

const MEMBER_COLUMNS: &str = "id, workgroup_id, user_id, role, joined_at";

/// Provides CRUD operations for workgroups and their memberships.
pub struct WorkgroupRepo;

impl WorkgroupRepo {
    /// Insert a workgroup and enroll its creator as an `ADMIN` member, in one
    /// transaction.
    pub async fn create(pool: &PgPool, input: &CreateWorkgroup) -> Result<Workgroup, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO workgroups (name, description, created_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let workgroup = sqlx::query_as::<_, Workgroup>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO workgroup_members (workgroup_id, user_id, role) VALUES ($1, $2, $3)",
        )
        .bind(workgroup.id)
        .bind(input.created_by)
        .bind(MEMBER_ROLE_ADMIN)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(workgroup)
    }

    /// Find a workgroup by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Workgroup>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workgroups WHERE id = $1");
        sqlx::query_as::<_, Workgroup>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all workgroups ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Workgroup>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workgroups ORDER BY name ASC");
        sqlx::query_as::<_, Workgroup>(&query).fetch_all(pool).await
    }

    /// List members of a workgroup with their profiles, oldest membership first.
    pub async fn list_members(
        pool: &PgPool,
        workgroup_id: DbId,
    ) -> Result<Vec<WorkgroupMemberDetail>, sqlx::Error> {
        sqlx::query_as::<_, WorkgroupMemberDetail>(
            "SELECT u.id AS user_id, u.email, u.display_name, m.role, m.joined_at
             FROM workgroup_members m
             JOIN users u ON u.id = m.user_id
             WHERE m.workgroup_id = $1
             ORDER BY m.joined_at ASC, m.id ASC",
        )
        .bind(workgroup_id)
        .fetch_all(pool)
        .await
    }

    /// The user's membership role in the workgroup, if they are a member.
    pub async fn find_member_role(
        pool: &PgPool,
        workgroup_id: DbId,
        user_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT role FROM workgroup_members WHERE workgroup_id = $1 AND user_id = $2",
        )
        .bind(workgroup_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|r| r.0))
    }

    /// Add a member, or change the role of an existing one.
    pub async fn upsert_member(
        pool: &PgPool,
        workgroup_id: DbId,
        user_id: DbId,
        role: &str,
    ) -> Result<WorkgroupMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO workgroup_members (workgroup_id, user_id, role)
             VALUES ($1, $2, $3)
             ON CONFLICT (workgroup_id, user_id) DO UPDATE SET role = EXCLUDED.role
             RETURNING {MEMBER_COLUMNS}"
        );
        sqlx::query_as::<_, WorkgroupMember>(&query)
            .bind(workgroup_id)
            .bind(user_id)
            .bind(role)
            .fetch_one(pool)
            .await
    }

    /// Remove a member. Returns `true` if a membership was deleted.
    pub async fn remove_member(
        pool: &PgPool,
        workgroup_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM workgroup_members WHERE workgroup_id = $1 AND user_id = $2")
                .bind(workgroup_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
