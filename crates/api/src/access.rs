//! Workgroup-scoped capability checks.
//!
//! Reports and workgroup membership grant administrative rights locally: a
//! workgroup `ADMIN` manages consensus on that workgroup's reports without
//! holding a global admin role.

use agora_core::roles::{authorize, Capability};
use agora_core::types::DbId;
use agora_db::repositories::WorkgroupRepo;
use agora_db::DbPool;

use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;

/// Require `capability` for `caller` on a resource owned by `workgroup_id`
/// (`None` for resources outside any workgroup).
///
/// `action` completes the 403 message ("Insufficient permissions to ...").
pub async fn require_capability(
    pool: &DbPool,
    caller: &CurrentUser,
    workgroup_id: Option<DbId>,
    capability: Capability,
    action: &str,
) -> AppResult<()> {
    let membership = match workgroup_id {
        Some(id) => WorkgroupRepo::find_member_role(pool, id, caller.user_id).await?,
        None => None,
    };
    let actor = caller.actor().in_workgroup(membership.as_deref());
    authorize(Some(&actor), capability).require(action)?;
    Ok(())
}

/// Whether `caller` belongs to the workgroup (any membership role).
pub async fn is_member(pool: &DbPool, caller: &CurrentUser, workgroup_id: DbId) -> AppResult<bool> {
    Ok(WorkgroupRepo::find_member_role(pool, workgroup_id, caller.user_id)
        .await?
        .is_some())
}
