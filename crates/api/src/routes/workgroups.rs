use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::workgroups;
use crate::state::AppState;

/// Routes mounted at `/workgroups`.
///
/// ```text
/// GET, POST  /                          list_workgroups, create_workgroup
/// GET        /{id}                      get_workgroup
/// GET, POST  /{id}/members              list_members, add_member
/// DELETE     /{id}/members/{user_id}    remove_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(workgroups::list_workgroups).post(workgroups::create_workgroup),
        )
        .route("/{id}", get(workgroups::get_workgroup))
        .route(
            "/{id}/members",
            get(workgroups::list_members).post(workgroups::add_member),
        )
        .route("/{id}/members/{user_id}", delete(workgroups::remove_member))
}
