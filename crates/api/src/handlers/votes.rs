//! Handlers for votes on a report's active round.

use agora_core::consensus::{normalize_objection_reason, validate_vote_type, VOTE_OBJECT};
use agora_core::error::CoreError;
use agora_core::types::DbId;
use agora_db::models::voting::{CastVote, CastVoteResult, VoteSummary};
use agora_db::repositories::{VoteRepo, VotingRoundRepo};
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::reports::ensure_report_exists;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /reports/{report_id}/votes`.
#[derive(Debug, Deserialize, Validate)]
pub struct CastVoteRequest {
    pub vote_type: String,
    #[validate(length(max = 1000))]
    pub feedback: Option<String>,
    /// Objection reason; required when `vote_type` is `OBJECT`.
    pub objection: Option<String>,
}

fn no_active_round() -> AppError {
    AppError::Core(CoreError::Validation(
        "No active voting round for this report".into(),
    ))
}

/// GET /api/v1/reports/{report_id}/votes
///
/// Votes of the active round with per-type statistics. A report without an
/// active round returns an empty list and zero counts.
pub async fn get_votes(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(report_id): Path<DbId>,
) -> AppResult<Json<DataResponse<VoteSummary>>> {
    ensure_report_exists(&state.pool, report_id).await?;
    let summary = VoteRepo::summary_for_report(&state.pool, report_id).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/reports/{report_id}/votes
///
/// Cast or replace the caller's vote in the active round.
pub async fn cast_vote(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(report_id): Path<DbId>,
    Json(input): Json<CastVoteRequest>,
) -> AppResult<Json<DataResponse<CastVoteResult>>> {
    input.validate()?;
    validate_vote_type(&input.vote_type)?;

    let objection_reason = if input.vote_type == VOTE_OBJECT {
        Some(normalize_objection_reason(input.objection.as_deref())?)
    } else {
        None
    };

    ensure_report_exists(&state.pool, report_id).await?;
    let round = VotingRoundRepo::find_active(&state.pool, report_id)
        .await?
        .ok_or_else(no_active_round)?;

    let cast = CastVote {
        round_id: round.id,
        user_id: user.user_id,
        vote_type: input.vote_type,
        feedback: input.feedback,
        objection_reason,
    };
    // The round can close between the lookup and the write.
    let result = VoteRepo::cast(&state.pool, &cast)
        .await?
        .ok_or_else(no_active_round)?;

    tracing::info!(
        user_id = user.user_id,
        report_id,
        round_number = round.round_number,
        vote_type = %result.vote.vote_type,
        "Vote cast"
    );

    Ok(Json(DataResponse { data: result }))
}
