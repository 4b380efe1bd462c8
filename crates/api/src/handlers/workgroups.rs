//! Handlers for the `/workgroups` resource and its memberships.

use agora_core::error::CoreError;
use agora_core::roles::{validate_member_role, Capability, MEMBER_ROLE_MEMBER};
use agora_core::types::DbId;
use agora_db::models::workgroup::{
    CreateWorkgroup, Workgroup, WorkgroupMember, WorkgroupMemberDetail,
};
use agora_db::repositories::{UserRepo, WorkgroupRepo};
use agora_db::DbPool;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::access::require_capability;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /workgroups`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkgroupRequest {
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Request body for `POST /workgroups/{id}/members`.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: DbId,
    /// Defaults to `MEMBER`.
    pub role: Option<String>,
}

/// Verify that a workgroup exists, returning it.
pub async fn ensure_workgroup_exists(pool: &DbPool, id: DbId) -> AppResult<Workgroup> {
    WorkgroupRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Workgroup",
            id,
        }))
}

/// POST /api/v1/workgroups
///
/// Create a workgroup. The creator joins it as `ADMIN`.
pub async fn create_workgroup(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(mut input): Json<CreateWorkgroupRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Workgroup>>)> {
    input.name = input.name.trim().to_string();
    input.validate()?;

    let create_dto = CreateWorkgroup {
        name: input.name,
        description: input.description,
        created_by: admin.user_id,
    };
    let workgroup = WorkgroupRepo::create(&state.pool, &create_dto).await?;

    tracing::info!(
        user_id = admin.user_id,
        workgroup_id = workgroup.id,
        "Workgroup created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: workgroup })))
}

/// GET /api/v1/workgroups
pub async fn list_workgroups(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Workgroup>>>> {
    let workgroups = WorkgroupRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: workgroups }))
}

/// GET /api/v1/workgroups/{id}
pub async fn get_workgroup(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Workgroup>>> {
    let workgroup = ensure_workgroup_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: workgroup }))
}

/// GET /api/v1/workgroups/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<WorkgroupMemberDetail>>>> {
    ensure_workgroup_exists(&state.pool, id).await?;
    let members = WorkgroupRepo::list_members(&state.pool, id).await?;
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/v1/workgroups/{id}/members
///
/// Add a member, or change an existing member's role.
pub async fn add_member(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<Json<DataResponse<WorkgroupMember>>> {
    let role = input.role.as_deref().unwrap_or(MEMBER_ROLE_MEMBER);
    validate_member_role(role)?;

    ensure_workgroup_exists(&state.pool, id).await?;
    require_capability(
        &state.pool,
        &user,
        Some(id),
        Capability::ManageWorkgroup,
        "manage this workgroup",
    )
    .await?;

    UserRepo::find_by_id(&state.pool, input.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: input.user_id,
        }))?;

    let member = WorkgroupRepo::upsert_member(&state.pool, id, input.user_id, role).await?;

    tracing::info!(
        user_id = user.user_id,
        workgroup_id = id,
        member_id = input.user_id,
        role = role,
        "Workgroup member saved"
    );

    Ok(Json(DataResponse { data: member }))
}

/// DELETE /api/v1/workgroups/{id}/members/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((id, member_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_workgroup_exists(&state.pool, id).await?;
    require_capability(
        &state.pool,
        &user,
        Some(id),
        Capability::ManageWorkgroup,
        "manage this workgroup",
    )
    .await?;

    let removed = WorkgroupRepo::remove_member(&state.pool, id, member_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "WorkgroupMember",
            id: member_id,
        }));
    }

    tracing::info!(
        user_id = user.user_id,
        workgroup_id = id,
        member_id = member_id,
        "Workgroup member removed"
    );

    Ok(StatusCode::NO_CONTENT)
}
