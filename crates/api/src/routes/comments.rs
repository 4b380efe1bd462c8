use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Routes mounted at `/comments`.
///
/// ```text
/// POST    /                      create_comment
/// POST    /{comment_id}/vote     vote_comment
/// DELETE  /{comment_id}          delete_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(comments::create_comment))
        .route("/{comment_id}/vote", post(comments::vote_comment))
        .route("/{comment_id}", delete(comments::delete_comment))
}
