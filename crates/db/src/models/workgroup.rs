//! Workgroup and membership models.

use agora_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `workgroups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Workgroup {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a workgroup.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkgroup {
    pub name: String,
    pub description: Option<String>,
    pub created_by: DbId,
}

/// A row from the `workgroup_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkgroupMember {
    pub id: DbId,
    pub workgroup_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub joined_at: Timestamp,
}

/// Membership joined with the member's profile, for member listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkgroupMemberDetail {
    pub user_id: DbId,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub joined_at: Timestamp,
}
