//! Bearer-token identity and the role gate.
//!
//! The verified caller is an extractor argument of each protected handler.
//! Nothing is stashed in request extensions. Identity and role are read from
//! the stored user on every request, so a deleted or demoted account loses
//! access before its token expires.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::api::AppState;
use crate::config::{ADMIN_ROLES, BEARER_TOKEN_PREFIX};
use crate::domain::UserRole;
use crate::errors::AppError;

/// Authenticated caller, as currently stored
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
    pub role: UserRole,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let claims = state.auth_service.verify_token(token)?;

        let user = match state.user_service.get_user(claims.sub).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => {
                tracing::debug!(user_id = claims.sub, "Token subject no longer exists");
                return Err(AppError::Unauthorized);
            }
            Err(e) => return Err(e),
        };

        Ok(CurrentUser {
            id: user.id,
            email: user.email,
            role: user.role,
        })
    }
}

/// Caller holding one of the admin roles
#[derive(Clone, Debug)]
pub struct AdminUser(pub CurrentUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        require_role(&user, ADMIN_ROLES)?;
        Ok(AdminUser(user))
    }
}

/// Reject callers whose role id is not in `allowed`.
pub fn require_role(user: &CurrentUser, allowed: &[i32]) -> Result<(), AppError> {
    if allowed.contains(&user.role.id()) {
        Ok(())
    } else {
        tracing::debug!(user_id = user.id, role = %user.role, "Role not allowed");
        Err(AppError::Unauthorized)
    }
}
