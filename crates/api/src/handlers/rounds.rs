//! Handlers for the consensus round lifecycle of a report.
//!
//! Opening, closing and resolving require `ManageConsensus`: a global admin,
//! or an admin of the workgroup that owns the report.

use agora_core::error::CoreError;
use agora_core::roles::Capability;
use agora_core::types::DbId;
use agora_db::models::report::Report;
use agora_db::models::voting::VotingRound;
use agora_db::repositories::VotingRoundRepo;
use axum::extract::{Path, State};
use axum::Json;

use crate::access::require_capability;
use crate::error::{AppError, AppResult};
use crate::handlers::reports::ensure_report_exists;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

fn report_not_found(report_id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Report",
        id: report_id,
    })
}

/// POST /api/v1/reports/{report_id}/rounds
///
/// Close the active round (if any) and open the next one. The report moves
/// to `IN_CONSENSUS`.
pub async fn open_round(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(report_id): Path<DbId>,
) -> AppResult<Json<DataResponse<VotingRound>>> {
    let report = ensure_report_exists(&state.pool, report_id).await?;
    require_capability(
        &state.pool,
        &user,
        report.workgroup_id,
        Capability::ManageConsensus,
        "open a voting round",
    )
    .await?;

    let round = VotingRoundRepo::open_new_round(&state.pool, report_id)
        .await?
        .ok_or_else(|| report_not_found(report_id))?;

    tracing::info!(
        user_id = user.user_id,
        report_id,
        round_number = round.round_number,
        "Voting round opened"
    );

    Ok(Json(DataResponse { data: round }))
}

/// GET /api/v1/reports/{report_id}/rounds
///
/// Every round of the report, by ascending round number.
pub async fn list_rounds(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(report_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<VotingRound>>>> {
    ensure_report_exists(&state.pool, report_id).await?;
    let rounds = VotingRoundRepo::list_for_report(&state.pool, report_id).await?;
    Ok(Json(DataResponse { data: rounds }))
}

/// POST /api/v1/reports/{report_id}/rounds/close
///
/// Close the active round without opening another. 404 when no round is
/// active.
pub async fn close_round(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(report_id): Path<DbId>,
) -> AppResult<Json<DataResponse<VotingRound>>> {
    let report = ensure_report_exists(&state.pool, report_id).await?;
    require_capability(
        &state.pool,
        &user,
        report.workgroup_id,
        Capability::ManageConsensus,
        "close a voting round",
    )
    .await?;

    let round = VotingRoundRepo::close_active(&state.pool, report_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Active voting round for report",
            id: report_id,
        }))?;

    tracing::info!(
        user_id = user.user_id,
        report_id,
        round_number = round.round_number,
        "Voting round closed"
    );

    Ok(Json(DataResponse { data: round }))
}

/// POST /api/v1/reports/{report_id}/consensus/resolve
///
/// Close the active round (if any) and mark consensus as reached.
pub async fn resolve_consensus(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(report_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Report>>> {
    let report = ensure_report_exists(&state.pool, report_id).await?;
    require_capability(
        &state.pool,
        &user,
        report.workgroup_id,
        Capability::ManageConsensus,
        "resolve consensus",
    )
    .await?;

    let resolved = VotingRoundRepo::resolve_consensus(&state.pool, report_id)
        .await?
        .ok_or_else(|| report_not_found(report_id))?;

    tracing::info!(user_id = user.user_id, report_id, "Consensus reached");

    Ok(Json(DataResponse { data: resolved }))
}
