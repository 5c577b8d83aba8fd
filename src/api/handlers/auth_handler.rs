//! Authentication handlers.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::user_handler::UserPayload;
use super::PHONE_REGEX;
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::{MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_PHONE_LENGTH, MIN_NAME_LENGTH};
use crate::errors::AppResult;
use crate::services::{Registration, TokenResponse};
use crate::types::{ApiResponse, Created};

/// Self-registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "please enter your first name"))]
    #[schema(example = "Jane")]
    pub first_name: String,
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "please enter your last name"))]
    #[schema(example = "Doe")]
    pub last_name: String,
    #[validate(
        email(message = "please enter a valid email"),
        length(max = MAX_EMAIL_LENGTH, message = "email is too long")
    )]
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// At least 8 characters with a lowercase letter, an uppercase letter and a digit
    #[schema(example = "Secret123", min_length = 8)]
    pub password: String,
    #[validate(must_match(other = "password", message = "passwords must match"))]
    #[schema(example = "Secret123")]
    pub confirm_password: String,
    #[validate(
        regex(path = *PHONE_REGEX, message = "please enter a valid phone number"),
        length(max = MAX_PHONE_LENGTH, message = "phone number is too long")
    )]
    #[schema(example = "555-123-4567")]
    pub default_phone: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(
        email(message = "please enter a valid email"),
        length(max = MAX_EMAIL_LENGTH, message = "email is too long")
    )]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "please enter your password"))]
    #[schema(example = "Secret123")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(current_user))
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Profile of the authenticated caller
#[utoipa::path(
    get,
    path = "/api/auth",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's profile under `user`", body = UserPayload),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> AppResult<ApiResponse<UserPayload>> {
    let user = state.user_service.get_user(caller.id).await?;
    Ok(ApiResponse::new(
        "User was found",
        UserPayload { user: user.into() },
    ))
}

/// Register a resident account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "New account under `user`", body = UserPayload),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email is already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserPayload>> {
    let user = state
        .auth_service
        .register(Registration {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password: payload.password,
            default_phone: payload.default_phone,
        })
        .await?;

    Ok(Created(ApiResponse::new(
        "Account added",
        UserPayload { user: user.into() },
    )))
}

/// Login and get a JWT
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token fields next to `message`", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.email, payload.password)
        .await?;

    Ok(ApiResponse::new("Login Successful", token))
}
