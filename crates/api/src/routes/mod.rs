pub mod admin;
pub mod comments;
pub mod health;
pub mod objections;
pub mod reports;
pub mod workgroups;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/me                                         current user profile
///
/// /admin/users                                     list, provision (admin only)
/// /admin/users/{id}                                get, deactivate
/// /admin/users/{id}/role                           change global role
///
/// /workgroups                                      list, create (admin)
/// /workgroups/{id}                                 get
/// /workgroups/{id}/members                         list, add/update member
/// /workgroups/{id}/members/{user_id}               remove member
///
/// /reports                                         list, create
/// /reports/{report_id}                             get, update
/// /reports/{report_id}/rounds                      list, open next round
/// /reports/{report_id}/rounds/close                close active round
/// /reports/{report_id}/consensus/resolve           mark consensus reached
/// /reports/{report_id}/votes                       active-round tally, cast vote
/// /reports/{report_id}/objections                  objections across rounds
/// /reports/{report_id}/comments                    comment threads
///
/// /objections/{objection_id}/status                rule VALID / INVALID
///
/// /comments                                        create
/// /comments/{comment_id}                           delete
/// /comments/{comment_id}/vote                      like / dislike toggle
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .nest("/admin", admin::router())
        .nest("/workgroups", workgroups::router())
        .nest("/reports", reports::router())
        .nest("/objections", objections::router())
        .nest("/comments", comments::router())
}
