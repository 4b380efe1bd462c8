//! Handlers for report comments and their like/dislike reactions.

use agora_core::comments::{
    ensure_not_own_comment, normalize_comment_content, validate_reply_parent, Reaction,
};
use agora_core::error::CoreError;
use agora_core::roles::{authorize, Capability};
use agora_core::types::DbId;
use agora_db::models::comment::{Comment, CommentThread, CreateComment, ReactionSets};
use agora_db::repositories::{CommentReactionRepo, CommentRepo};
use agora_db::DbPool;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::reports::ensure_report_exists;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /comments`.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub report_id: DbId,
    pub content: String,
    pub parent_id: Option<DbId>,
}

/// Request body for `POST /comments/{comment_id}/vote`.
#[derive(Debug, Deserialize)]
pub struct CommentVoteRequest {
    #[serde(rename = "type")]
    pub reaction: String,
}

/// A comment with its reaction sets.
#[derive(Debug, Serialize)]
pub struct CommentWithReactions {
    #[serde(flatten)]
    pub comment: Comment,
    #[serde(flatten)]
    pub reactions: ReactionSets,
}

/// Reaction sets of a comment after a like/dislike.
#[derive(Debug, Serialize)]
pub struct CommentReactions {
    pub comment_id: DbId,
    #[serde(flatten)]
    pub reactions: ReactionSets,
}

async fn ensure_comment_exists(pool: &DbPool, id: DbId) -> AppResult<Comment> {
    CommentRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/comments
///
/// Comment on a report, or reply to a top-level comment of the same report.
pub async fn create_comment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CommentWithReactions>>)> {
    let content = normalize_comment_content(&input.content)?;

    ensure_report_exists(&state.pool, input.report_id).await?;
    if let Some(parent_id) = input.parent_id {
        let parent = ensure_comment_exists(&state.pool, parent_id).await?;
        validate_reply_parent(input.report_id, parent.report_id, parent.parent_id)?;
    }

    let create_dto = CreateComment {
        report_id: input.report_id,
        user_id: user.user_id,
        parent_id: input.parent_id,
        content,
    };
    let comment = CommentRepo::create(&state.pool, &create_dto).await?;

    tracing::info!(
        user_id = user.user_id,
        report_id = comment.report_id,
        comment_id = comment.id,
        parent_id = ?comment.parent_id,
        "Comment created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CommentWithReactions {
                comment,
                reactions: ReactionSets::default(),
            },
        }),
    ))
}

/// GET /api/v1/reports/{report_id}/comments
///
/// Top-level comments newest first, each with its replies oldest first.
pub async fn list_comments(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(report_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CommentThread>>>> {
    ensure_report_exists(&state.pool, report_id).await?;
    let threads = CommentRepo::list_for_report(&state.pool, report_id).await?;
    Ok(Json(DataResponse { data: threads }))
}

/// POST /api/v1/comments/{comment_id}/vote
///
/// Like or dislike a comment. Repeating the held reaction retracts it;
/// authors cannot react to their own comments.
pub async fn vote_comment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(comment_id): Path<DbId>,
    Json(input): Json<CommentVoteRequest>,
) -> AppResult<Json<DataResponse<CommentReactions>>> {
    let reaction = Reaction::parse(&input.reaction)?;

    let comment = ensure_comment_exists(&state.pool, comment_id).await?;
    ensure_not_own_comment(comment.user_id, user.user_id)?;

    let reactions =
        CommentReactionRepo::toggle(&state.pool, comment_id, user.user_id, reaction).await?;

    tracing::debug!(
        user_id = user.user_id,
        comment_id,
        reaction = reaction.as_str(),
        "Comment reaction toggled"
    );

    Ok(Json(DataResponse {
        data: CommentReactions {
            comment_id,
            reactions,
        },
    }))
}

/// DELETE /api/v1/comments/{comment_id}
///
/// Delete a comment and its replies. Allowed for the author and global
/// admins.
pub async fn delete_comment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(comment_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let comment = ensure_comment_exists(&state.pool, comment_id).await?;
    if comment.user_id != user.user_id {
        authorize(Some(&user.actor()), Capability::ModerateComments)
            .require("delete this comment")?;
    }

    CommentRepo::delete(&state.pool, comment_id).await?;

    tracing::info!(
        user_id = user.user_id,
        report_id = comment.report_id,
        comment_id,
        "Comment deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}
