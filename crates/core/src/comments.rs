//! Comment content rules and like/dislike reaction transitions.

use crate::error::CoreError;
use crate::types::DbId;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Minimum comment length in characters, after trimming.
pub const MIN_COMMENT_LENGTH: usize = 5;

/// Maximum comment length in characters, after trimming.
pub const MAX_COMMENT_LENGTH: usize = 1000;

pub const REACTION_LIKE: &str = "LIKE";
pub const REACTION_DISLIKE: &str = "DISLIKE";

/// A user's reaction to a comment. A user holds at most one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    pub fn as_str(self) -> &'static str {
        match self {
            Reaction::Like => REACTION_LIKE,
            Reaction::Dislike => REACTION_DISLIKE,
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            REACTION_LIKE => Ok(Reaction::Like),
            REACTION_DISLIKE => Ok(Reaction::Dislike),
            other => Err(CoreError::Validation(format!(
                "Invalid reaction '{other}'. Must be one of: {REACTION_LIKE}, {REACTION_DISLIKE}"
            ))),
        }
    }
}

/* --------------------------------------------------------------------------
Validation and transitions
-------------------------------------------------------------------------- */

/// Trim comment content and check its length, returning the stored form.
pub fn normalize_comment_content(content: &str) -> Result<String, CoreError> {
    let trimmed = content.trim();
    let len = trimmed.chars().count();
    if len < MIN_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment must be at least {MIN_COMMENT_LENGTH} characters"
        )));
    }
    if len > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment must be at most {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Check a reply's parent: same report, and itself top-level.
pub fn validate_reply_parent(
    report_id: DbId,
    parent_report_id: DbId,
    parent_parent_id: Option<DbId>,
) -> Result<(), CoreError> {
    if parent_report_id != report_id {
        return Err(CoreError::Validation(
            "Parent comment belongs to a different report".to_string(),
        ));
    }
    if parent_parent_id.is_some() {
        return Err(CoreError::Validation(
            "Replies can only be made to top-level comments".to_string(),
        ));
    }
    Ok(())
}

/// Authors may not react to their own comments.
pub fn ensure_not_own_comment(author_id: DbId, user_id: DbId) -> Result<(), CoreError> {
    if author_id == user_id {
        return Err(CoreError::Forbidden(
            "You cannot vote on your own comment".to_string(),
        ));
    }
    Ok(())
}

/// The reaction a user holds after requesting `requested` while holding
/// `current`.
///
/// Repeating the held reaction retracts it; anything else replaces it.
pub fn toggle_reaction(current: Option<Reaction>, requested: Reaction) -> Option<Reaction> {
    if current == Some(requested) {
        None
    } else {
        Some(requested)
    }
}
