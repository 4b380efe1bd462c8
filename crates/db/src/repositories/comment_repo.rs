//! Repository for the `comments` and `comment_reactions` tables.

use std::collections::HashMap;

use agora_core::comments::{toggle_reaction, Reaction, REACTION_DISLIKE, REACTION_LIKE};
use agora_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::comment::{
    Comment, CommentReaction, CommentThread, CommentWithAuthor, CreateComment, ReactionSets,
};

const COLUMNS: &str = "id, report_id, user_id, parent_id, content, created_at, updated_at";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (report_id, user_id, parent_id, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.report_id)
            .bind(input.user_id)
            .bind(input.parent_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a comment (its replies and reactions cascade).
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Comment threads for a report: top-level comments newest first, each
    /// with its direct replies oldest first, all with reaction sets.
    pub async fn list_for_report(
        pool: &PgPool,
        report_id: DbId,
    ) -> Result<Vec<CommentThread>, sqlx::Error> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.report_id, c.user_id, u.display_name AS author_name,
                    c.parent_id, c.content, c.created_at
             FROM comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.report_id = $1
             ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(report_id)
        .fetch_all(pool)
        .await?;

        let reactions = sqlx::query_as::<_, CommentReaction>(
            "SELECT cr.comment_id, cr.user_id, cr.reaction
             FROM comment_reactions cr
             JOIN comments c ON c.id = cr.comment_id
             WHERE c.report_id = $1
             ORDER BY cr.created_at ASC, cr.id ASC",
        )
        .bind(report_id)
        .fetch_all(pool)
        .await?;

        Ok(assemble_threads(comments, reactions))
    }
}

/// Provides like/dislike toggling for comments.
pub struct CommentReactionRepo;

impl CommentReactionRepo {
    /// Apply a like/dislike request from `user_id` and return the comment's
    /// updated reaction sets.
    ///
    /// Repeating the held reaction retracts it; the opposite reaction replaces
    /// it. The read and the write happen in one transaction with the user's
    /// reaction row locked.
    pub async fn toggle(
        pool: &PgPool,
        comment_id: DbId,
        user_id: DbId,
        requested: Reaction,
    ) -> Result<ReactionSets, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current: Option<(String,)> = sqlx::query_as(
            "SELECT reaction FROM comment_reactions
             WHERE comment_id = $1 AND user_id = $2
             FOR UPDATE",
        )
        .bind(comment_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        let current = current.and_then(|(r,)| Reaction::parse(&r).ok());

        match toggle_reaction(current, requested) {
            None => {
                sqlx::query("DELETE FROM comment_reactions WHERE comment_id = $1 AND user_id = $2")
                    .bind(comment_id)
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await?;
            }
            Some(next) => {
                sqlx::query(
                    "INSERT INTO comment_reactions (comment_id, user_id, reaction)
                     VALUES ($1, $2, $3)
                     ON CONFLICT (comment_id, user_id) DO UPDATE SET reaction = EXCLUDED.reaction",
                )
                .bind(comment_id)
                .bind(user_id)
                .bind(next.as_str())
                .execute(&mut *tx)
                .await?;
            }
        }

        let sets = reaction_sets_in_tx(&mut tx, comment_id).await?;
        tx.commit().await?;
        Ok(sets)
    }

    /// Current reaction sets of a comment.
    pub async fn sets_for_comment(
        pool: &PgPool,
        comment_id: DbId,
    ) -> Result<ReactionSets, sqlx::Error> {
        let rows = sqlx::query_as::<_, CommentReaction>(
            "SELECT comment_id, user_id, reaction FROM comment_reactions
             WHERE comment_id = $1
             ORDER BY created_at ASC, id ASC",
        )
        .bind(comment_id)
        .fetch_all(pool)
        .await?;
        Ok(collect_sets(rows.iter()))
    }
}

async fn reaction_sets_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    comment_id: DbId,
) -> Result<ReactionSets, sqlx::Error> {
    let rows = sqlx::query_as::<_, CommentReaction>(
        "SELECT comment_id, user_id, reaction FROM comment_reactions
         WHERE comment_id = $1
         ORDER BY created_at ASC, id ASC",
    )
    .bind(comment_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(collect_sets(rows.iter()))
}

fn collect_sets<'a>(rows: impl Iterator<Item = &'a CommentReaction>) -> ReactionSets {
    let mut sets = ReactionSets::default();
    for row in rows {
        match row.reaction.as_str() {
            REACTION_LIKE => sets.likes.push(row.user_id),
            REACTION_DISLIKE => sets.dislikes.push(row.user_id),
            _ => {}
        }
    }
    sets
}

/// Group flat comments (ordered oldest first) into one-level threads.
///
/// Top-level comments come out newest first; replies keep their oldest-first
/// order. Replies whose parent is missing from `comments` are dropped.
fn assemble_threads(
    comments: Vec<CommentWithAuthor>,
    reactions: Vec<CommentReaction>,
) -> Vec<CommentThread> {
    let mut reactions_by_comment: HashMap<DbId, Vec<CommentReaction>> = HashMap::new();
    for reaction in reactions {
        reactions_by_comment
            .entry(reaction.comment_id)
            .or_default()
            .push(reaction);
    }
    let sets_for = |id: DbId| {
        reactions_by_comment
            .get(&id)
            .map(|rows| collect_sets(rows.iter()))
            .unwrap_or_default()
    };

    let mut replies_by_parent: HashMap<DbId, Vec<CommentThread>> = HashMap::new();
    let mut top_level = Vec::new();
    for comment in comments {
        let reactions = sets_for(comment.id);
        let thread = CommentThread {
            comment,
            reactions,
            replies: Vec::new(),
        };
        let parent_id = thread.comment.parent_id;
        match parent_id {
            Some(parent_id) => replies_by_parent.entry(parent_id).or_default().push(thread),
            None => top_level.push(thread),
        }
    }

    top_level.reverse();
    for thread in &mut top_level {
        if let Some(replies) = replies_by_parent.remove(&thread.comment.id) {
            thread.replies = replies;
        }
    }
    top_level
}
