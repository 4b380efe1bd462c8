use axum::routing::put;
use axum::Router;

use crate::handlers::objections;
use crate::state::AppState;

/// Routes mounted at `/objections`.
///
/// ```text
/// PUT     /{objection_id}/status     update_objection_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{objection_id}/status",
        put(objections::update_objection_status),
    )
}
