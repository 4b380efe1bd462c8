//! Handlers for the `/auth` resource.
//!
//! Sign-in happens at the identity provider; this API only describes the
//! session it was handed.

use agora_core::error::CoreError;
use agora_db::models::user::User;
use agora_db::repositories::UserRepo;
use axum::extract::State;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/auth/me
///
/// Profile of the token's subject. 404 if the user row is gone, 403 if the
/// account is deactivated.
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    Ok(Json(DataResponse { data: user }))
}
