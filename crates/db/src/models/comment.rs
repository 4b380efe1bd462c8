//! Comment and reaction models.

use agora_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub report_id: DbId,
    pub user_id: DbId,
    pub parent_id: Option<DbId>,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a comment. `content` is already trimmed and validated.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub report_id: DbId,
    pub user_id: DbId,
    pub parent_id: Option<DbId>,
    pub content: String,
}

/// A comment joined with its author's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub report_id: DbId,
    pub user_id: DbId,
    pub author_name: String,
    pub parent_id: Option<DbId>,
    pub content: String,
    pub created_at: Timestamp,
}

/// A row from the `comment_reactions` table (subset).
#[derive(Debug, Clone, FromRow)]
pub struct CommentReaction {
    pub comment_id: DbId,
    pub user_id: DbId,
    pub reaction: String,
}

/// User ids that currently like / dislike a comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReactionSets {
    pub likes: Vec<DbId>,
    pub dislikes: Vec<DbId>,
}

/// A comment as returned by listings: author, reactions and direct replies.
///
/// Replies carry an empty `replies` list; nesting is one level deep.
#[derive(Debug, Clone, Serialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: CommentWithAuthor,
    #[serde(flatten)]
    pub reactions: ReactionSets,
    pub replies: Vec<CommentThread>,
}
