//! Handlers for the `/admin` resource (user management).
//!
//! All handlers require a global admin via [`RequireAdmin`]. Granting or
//! revoking `SUPER_ADMIN` additionally requires the caller to be one.

use agora_core::error::CoreError;
use agora_core::roles::{authorize, validate_role, Capability, ROLE_SUPER_ADMIN};
use agora_core::types::DbId;
use agora_db::models::user::{CreateUser, User};
use agora_db::repositories::UserRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    #[validate(url)]
    pub avatar_url: Option<String>,
    pub role: Option<String>,
}

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_super_admin(admin: &CurrentUser) -> AppResult<()> {
    authorize(Some(&admin.actor()), Capability::AssignSuperAdmin)
        .require("grant or revoke the SUPER_ADMIN role")?;
    Ok(())
}

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/users
///
/// Provision a user so the identity provider's subject can be mapped to it.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<User>>)> {
    input.validate()?;
    if let Some(role) = input.role.as_deref() {
        validate_role(role)?;
        if role == ROLE_SUPER_ADMIN {
            require_super_admin(&admin)?;
        }
    }

    let email = input.email.trim().to_string();
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "A user with email '{email}' already exists"
        ))));
    }

    let create_dto = CreateUser {
        email,
        display_name: input.display_name.trim().to_string(),
        avatar_url: input.avatar_url,
        role: input.role,
    };
    let user = UserRepo::create(&state.pool, &create_dto).await?;

    tracing::info!(
        admin_id = admin.user_id,
        user_id = user.id,
        role = %user.role,
        "User provisioned"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /api/v1/admin/users
///
/// List all users, newest first.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<User>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = find_user(&state, id).await?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/admin/users/{id}/role
///
/// Change a user's global role. Moving a user into or out of `SUPER_ADMIN`
/// requires the caller to be `SUPER_ADMIN`.
pub async fn update_user_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<Json<DataResponse<User>>> {
    validate_role(&input.role)?;

    let target = find_user(&state, id).await?;
    if input.role == ROLE_SUPER_ADMIN || target.role == ROLE_SUPER_ADMIN {
        require_super_admin(&admin)?;
    }

    let user = UserRepo::update_role(&state.pool, id, &input.role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(
        admin_id = admin.user_id,
        user_id = id,
        from = %target.role,
        to = %user.role,
        "User role changed"
    );

    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Deactivate a user. The row is kept so authored content stays attributed.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "You cannot deactivate your own account".into(),
        ));
    }

    let target = find_user(&state, id).await?;
    if target.role == ROLE_SUPER_ADMIN {
        require_super_admin(&admin)?;
    }

    UserRepo::deactivate(&state.pool, id).await?;
    tracing::info!(admin_id = admin.user_id, user_id = id, "User deactivated");

    Ok(StatusCode::NO_CONTENT)
}
