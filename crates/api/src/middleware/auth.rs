//! JWT-based authentication extractor for Axum handlers.

use agora_core::error::CoreError;
use agora_core::roles::Actor;
use agora_core::types::DbId;
use agora_db::repositories::UserRepo;
use agora_db::DbPool;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::jwt::validate_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Authenticated caller extracted from a JWT Bearer token in the
/// `Authorization` header.
///
/// Only the token is checked here. Handlers that act on the caller's
/// current role or active flag go through [`CurrentUser`] (usually via the
/// RBAC extractors) instead.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser { user_id: claims.sub })
    }
}

/// The token's subject as currently stored: role changes and deactivation
/// take effect immediately, without waiting for the token to expire.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: DbId,
    pub role: String,
    pub is_active: bool,
}

impl CurrentUser {
    /// Resolve the token subject. A subject with no `users` row is rejected
    /// as unauthenticated.
    pub async fn load(pool: &DbPool, auth: &AuthUser) -> AppResult<Self> {
        let user = UserRepo::find_by_id(pool, auth.user_id)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Token subject is not a known user".into(),
                ))
            })?;

        Ok(CurrentUser {
            user_id: user.id,
            role: user.role,
            is_active: user.is_active,
        })
    }

    /// The caller with its global role only.
    pub fn actor(&self) -> Actor<'_> {
        Actor {
            role: &self.role,
            is_active: self.is_active,
            workgroup_role: None,
        }
    }
}
