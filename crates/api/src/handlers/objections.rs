//! Handlers for objections raised through `OBJECT` votes.

use agora_core::consensus::validate_objection_resolution;
use agora_core::error::CoreError;
use agora_core::roles::Capability;
use agora_core::types::DbId;
use agora_db::models::voting::{Objection, ObjectionDetail};
use agora_db::repositories::ObjectionRepo;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::access::require_capability;
use crate::error::{AppError, AppResult};
use crate::handlers::reports::ensure_report_exists;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /objections/{objection_id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateObjectionStatusRequest {
    pub status: String,
}

fn objection_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Objection",
        id,
    })
}

/// GET /api/v1/reports/{report_id}/objections
///
/// Objections across all rounds of the report, newest first.
pub async fn list_objections(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(report_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ObjectionDetail>>>> {
    ensure_report_exists(&state.pool, report_id).await?;
    let objections = ObjectionRepo::list_for_report(&state.pool, report_id).await?;
    Ok(Json(DataResponse { data: objections }))
}

/// PUT /api/v1/objections/{objection_id}/status
///
/// Rule an objection `VALID` or `INVALID`. A later ruling overwrites an
/// earlier one.
pub async fn update_objection_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(objection_id): Path<DbId>,
    Json(input): Json<UpdateObjectionStatusRequest>,
) -> AppResult<Json<DataResponse<Objection>>> {
    validate_objection_resolution(&input.status)?;

    let report_id = ObjectionRepo::find_report_id(&state.pool, objection_id)
        .await?
        .ok_or_else(|| objection_not_found(objection_id))?;
    let report = ensure_report_exists(&state.pool, report_id).await?;
    require_capability(
        &state.pool,
        &user,
        report.workgroup_id,
        Capability::ManageConsensus,
        "resolve objections",
    )
    .await?;

    let objection = ObjectionRepo::resolve(&state.pool, objection_id, &input.status, user.user_id)
        .await?
        .ok_or_else(|| objection_not_found(objection_id))?;

    tracing::info!(
        user_id = user.user_id,
        report_id,
        objection_id,
        status = %objection.status,
        "Objection resolved"
    );

    Ok(Json(DataResponse { data: objection }))
}
