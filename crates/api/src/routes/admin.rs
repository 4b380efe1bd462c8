use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require a global admin.
///
/// ```text
/// GET, POST    /users              list_users, create_user
/// GET, DELETE  /users/{id}         get_user, deactivate_user
/// PUT          /users/{id}/role    update_user_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            get(admin::get_user).delete(admin::deactivate_user),
        )
        .route("/users/{id}/role", put(admin::update_user_role))
}
