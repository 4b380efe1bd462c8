//! Shared query parameter types for API handlers.

use agora_core::types::DbId;
use serde::Deserialize;

/// Query parameters for `GET /reports` (`?limit=&offset=&workgroup_id=&consensus_status=`).
///
/// `limit` and `offset` are clamped in the handler via `clamp_limit` /
/// `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct ReportListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub workgroup_id: Option<DbId>,
    pub consensus_status: Option<String>,
}
