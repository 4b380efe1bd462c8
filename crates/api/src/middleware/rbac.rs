//! Role-based access control (RBAC) extractors.
//!
//! Each extractor authenticates the caller, loads its current row, and runs
//! the global capability check through [`authorize`]. Workgroup-scoped checks
//! need the target resource and live in [`crate::access`].

use agora_core::roles::{authorize, Capability};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::{AuthUser, CurrentUser};
use crate::error::AppError;
use crate::state::AppState;

async fn current_user_with(
    parts: &mut Parts,
    state: &AppState,
    capability: Capability,
    action: &str,
) -> Result<CurrentUser, AppError> {
    let auth = AuthUser::from_request_parts(parts, state).await?;
    let user = CurrentUser::load(&state.pool, &auth).await?;
    authorize(Some(&user.actor()), capability).require(action)?;
    Ok(user)
}

/// Requires an active, provisioned user. Rejects deactivated users with 403.
///
/// ```ignore
/// async fn any_authed(RequireAuth(user): RequireAuth) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = current_user_with(parts, state, Capability::Participate, "use the API").await?;
        Ok(RequireAuth(user))
    }
}

/// Requires the global `ADMIN` or `SUPER_ADMIN` role. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user =
            current_user_with(parts, state, Capability::AdministerUsers, "administer users")
                .await?;
        Ok(RequireAdmin(user))
    }
}
