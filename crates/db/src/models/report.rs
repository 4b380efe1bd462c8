//! Report (proposal) model and DTOs.

use agora_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `reports` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub workgroup_id: Option<DbId>,
    pub created_by: DbId,
    /// `NOT_STARTED`, `IN_CONSENSUS` or `CONSENSUS_REACHED`.
    pub consensus_status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a report.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReport {
    pub title: String,
    pub content: String,
    pub workgroup_id: Option<DbId>,
    pub created_by: DbId,
}

/// DTO for updating a report. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReport {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Filters for report listings. `limit`/`offset` are already clamped.
#[derive(Debug, Clone)]
pub struct ReportFilter {
    pub workgroup_id: Option<DbId>,
    pub consensus_status: Option<String>,
    pub limit: i64,
    pub offset: i64,
}
