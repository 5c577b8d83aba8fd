//! User management handlers.

use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::PHONE_REGEX;
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{AdminUser, CurrentUser};
use crate::api::AppState;
use crate::config::{MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_PHONE_LENGTH, MIN_NAME_LENGTH};
use crate::domain::{UserChanges, UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::services::NewAccount;
use crate::types::{ApiResponse, Created, NoPayload};

/// Account created by an admin
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "please enter a first name"))]
    #[schema(example = "Alex")]
    pub first_name: String,
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "please enter a last name"))]
    #[schema(example = "Manager")]
    pub last_name: String,
    #[validate(
        email(message = "please enter a valid email"),
        length(max = MAX_EMAIL_LENGTH, message = "email is too long")
    )]
    #[schema(example = "alex@example.com")]
    pub email: String,
    #[schema(example = "Secret123", min_length = 8)]
    pub password: String,
    #[validate(
        regex(path = *PHONE_REGEX, message = "please enter a valid phone number"),
        length(max = MAX_PHONE_LENGTH, message = "phone number is too long")
    )]
    pub default_phone: Option<String>,
    /// 1 = superadmin, 2 = admin, 4 = resident
    #[schema(example = 2)]
    pub role: i32,
}

/// Partial profile update. Omitted fields keep their stored values and an
/// empty `defaultPhone` clears the number.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "please enter a first name"))]
    pub first_name: Option<String>,
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "please enter a last name"))]
    pub last_name: Option<String>,
    #[validate(
        email(message = "please enter a valid email"),
        length(max = MAX_EMAIL_LENGTH, message = "email is too long")
    )]
    pub email: Option<String>,
    #[validate(length(max = MAX_PHONE_LENGTH, message = "phone number is too long"))]
    pub default_phone: Option<String>,
    /// Ignored on `/update/current-user`
    pub role: Option<i32>,
}

impl UpdateUserRequest {
    fn into_changes(self) -> AppResult<UserChanges> {
        let default_phone = match self.default_phone {
            Some(phone) if phone.trim().is_empty() => Some(None),
            Some(phone) if !PHONE_REGEX.is_match(&phone) => {
                return Err(AppError::invalid_field(
                    "defaultPhone",
                    "please enter a valid phone number",
                ))
            }
            other => other.map(Some),
        };

        Ok(UserChanges {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            default_phone,
            role: self.role.map(UserRole::parse).transpose()?,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "please enter your current password"))]
    pub old_password: String,
    #[schema(min_length = 8)]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "passwords must match"))]
    pub confirm_new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserPayload {
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersPayload {
    pub users: Vec<UserResponse>,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/change-password", put(change_password))
        .route("/update/current-user", put(update_current_user))
        .route("/update/:id", put(update_user))
        .route("/delete/:id", delete(delete_user))
        .route("/:id", get(get_user))
}

/// List every account (admin)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Accounts under `users`", body = UsersPayload),
        (status = 401, description = "Not an admin")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<ApiResponse<UsersPayload>> {
    let users = state.user_service.list_users().await?;
    Ok(ApiResponse::new(
        "Users were found",
        UsersPayload {
            users: users.into_iter().map(UserResponse::from).collect(),
        },
    ))
}

/// Create an account with any role (admin)
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "New account under `user`", body = UserPayload),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not an admin"),
        (status = 409, description = "Email is already taken")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Created<UserPayload>> {
    let role = UserRole::parse(payload.role)?;
    let user = state
        .user_service
        .create_user(NewAccount {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password: payload.password,
            default_phone: payload.default_phone,
            role,
        })
        .await?;

    tracing::debug!(admin_id = admin.id, user_id = user.id, "Account created by admin");
    Ok(Created(ApiResponse::new(
        "User was added",
        UserPayload { user: user.into() },
    )))
}

/// Get one account (admin)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Account under `user`", body = UserPayload),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<UserPayload>> {
    let user = state.user_service.get_user(id).await?;
    Ok(ApiResponse::new(
        "User was found",
        UserPayload { user: user.into() },
    ))
}

/// Edit any account, role included (admin)
#[utoipa::path(
    put,
    path = "/api/users/update/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account under `user`", body = UserPayload),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email is already taken")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserPayload>> {
    let user = state
        .user_service
        .update_user(id, payload.into_changes()?)
        .await?;
    Ok(ApiResponse::new(
        "User was updated",
        UserPayload { user: user.into() },
    ))
}

/// Edit the caller's own profile
#[utoipa::path(
    put,
    path = "/api/users/update/current-user",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated profile under `user`", body = UserPayload),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Email is already taken")
    )
)]
pub async fn update_current_user(
    State(state): State<AppState>,
    caller: CurrentUser,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserPayload>> {
    let changes = UpdateUserRequest {
        role: None,
        ..payload
    }
    .into_changes()?;
    let user = state.user_service.update_profile(caller.id, changes).await?;
    Ok(ApiResponse::new(
        "User was updated",
        UserPayload { user: user.into() },
    ))
}

/// Delete an account (admin)
#[utoipa::path(
    delete,
    path = "/api/users/delete/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User was deleted"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<NoPayload>> {
    state.user_service.delete_user(id).await?;
    Ok(ApiResponse::message("User was deleted"))
}

/// Change the caller's password
#[utoipa::path(
    put,
    path = "/api/users/change-password",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password was changed"),
        (status = 400, description = "New password rejected"),
        (status = 401, description = "Old password is wrong or token invalid")
    )
)]
pub async fn change_password(
    State(state): State<AppState>,
    caller: CurrentUser,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<ApiResponse<NoPayload>> {
    state
        .user_service
        .change_password(caller.id, payload.old_password, payload.new_password)
        .await?;
    Ok(ApiResponse::message("Password was changed"))
}
