//! Permit handlers.
//!
//! `POST /api/permits` is public: residents and anonymous visitors request
//! permits through the same form. Everything else is admin-only except the
//! caller's own permit list.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, get, put},
    Json, Router,
};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{id_list, required, DeletedPayload, PHONE_REGEX};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{AdminUser, CurrentUser};
use crate::api::AppState;
use crate::config::{
    MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MAX_PHONE_LENGTH, MAX_PLATE_LENGTH,
    MAX_SHORT_FIELD_LENGTH, MIN_NAME_LENGTH,
};
use crate::domain::{PermitChanges, PermitDetails, PermitRequest};
use crate::errors::{AppError, AppResult};
use crate::types::{ApiResponse, Numeric};

const DURATION_NOT_NUMERIC: &str = "Duration must be a whole number of days";

/// Permit request form
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePermitRequest {
    /// Location id
    #[validate(required(message = "Please select a location"))]
    #[schema(example = 1)]
    pub location: Option<i32>,
    #[validate(
        required(message = "please enter the unit you are visiting"),
        length(min = 1, max = MAX_SHORT_FIELD_LENGTH, message = "please enter the unit you are visiting")
    )]
    #[schema(example = "12B")]
    pub unit: Option<String>,
    /// Days to stay; a JSON number or a numeric string
    #[validate(required(message = "please select how many days you are staying"))]
    #[schema(value_type = i32, example = 3)]
    pub duration: Option<Numeric>,
    #[validate(
        required(message = "please enter your first name"),
        length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "please enter your first name")
    )]
    #[schema(example = "Sam")]
    pub first_name: Option<String>,
    #[validate(
        required(message = "please enter your last name"),
        length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "please enter your last name")
    )]
    #[schema(example = "Guest")]
    pub last_name: Option<String>,
    #[validate(
        required(message = "please enter a valid email"),
        email(message = "please enter a valid email"),
        length(max = MAX_EMAIL_LENGTH, message = "email is too long")
    )]
    #[schema(example = "sam@example.com")]
    pub email: Option<String>,
    #[validate(
        required(message = "please enter a valid phone number"),
        regex(path = *PHONE_REGEX, message = "please enter a valid phone number"),
        length(max = MAX_PHONE_LENGTH, message = "phone number is too long")
    )]
    #[schema(example = "555-123-4567")]
    pub default_phone: Option<String>,
    #[validate(
        required(message = "please enter your vehicle's plate number"),
        length(min = 1, max = MAX_PLATE_LENGTH, message = "please enter your vehicle's plate number")
    )]
    #[schema(example = "ABC123")]
    pub vplate: Option<String>,
    #[validate(length(max = MAX_SHORT_FIELD_LENGTH))]
    #[schema(example = "Honda")]
    pub vmake: Option<String>,
    #[validate(length(max = MAX_SHORT_FIELD_LENGTH))]
    #[schema(example = "Civic")]
    pub vmodel: Option<String>,
    #[validate(length(max = MAX_SHORT_FIELD_LENGTH))]
    #[schema(example = "Blue")]
    pub vcolor: Option<String>,
    /// Sublocation id inside `location`
    pub sublocation: Option<i32>,
    /// Owning resident, if any
    pub user_id: Option<i32>,
}

impl CreatePermitRequest {
    fn into_request(self) -> AppResult<PermitRequest> {
        Ok(PermitRequest {
            location_id: required(self.location, "location")?,
            duration: parse_duration(required(self.duration, "duration")?)?,
            vplate: required(self.vplate, "vplate")?,
            vmake: self.vmake,
            vmodel: self.vmodel,
            vcolor: self.vcolor,
            user_id: self.user_id,
            sublocation_id: self.sublocation,
            unit: self.unit,
            email: self.email,
            phone: self.default_phone,
            first_name: self.first_name,
            last_name: self.last_name,
        })
    }
}

/// Admin permit edit. Omitted fields keep their stored values.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePermitRequest {
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "please enter a first name"))]
    pub first_name: Option<String>,
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "please enter a last name"))]
    pub last_name: Option<String>,
    #[validate(
        email(message = "please enter a valid email"),
        length(max = MAX_EMAIL_LENGTH, message = "email is too long")
    )]
    pub email: Option<String>,
    #[validate(
        regex(path = *PHONE_REGEX, message = "please enter a valid phone number"),
        length(max = MAX_PHONE_LENGTH, message = "phone number is too long")
    )]
    pub default_phone: Option<String>,
    #[validate(length(min = 1, max = MAX_PLATE_LENGTH, message = "please enter your vehicle's plate number"))]
    pub vplate: Option<String>,
    #[validate(length(max = MAX_SHORT_FIELD_LENGTH))]
    pub vmake: Option<String>,
    #[validate(length(max = MAX_SHORT_FIELD_LENGTH))]
    pub vmodel: Option<String>,
    #[validate(length(max = MAX_SHORT_FIELD_LENGTH))]
    pub vcolor: Option<String>,
    /// Location id
    #[serde(alias = "locationId")]
    pub location: Option<i32>,
    pub sublocation: Option<i32>,
    #[validate(length(min = 1, max = MAX_SHORT_FIELD_LENGTH, message = "please enter the unit you are visiting"))]
    pub unit: Option<String>,
    #[schema(value_type = Option<i32>, example = 0)]
    pub duration: Option<Numeric>,
    #[schema(value_type = Option<String>, example = "2024-01-04T23:59:59")]
    pub exp_date: Option<NaiveDateTime>,
}

impl UpdatePermitRequest {
    fn into_changes(self) -> AppResult<PermitChanges> {
        Ok(PermitChanges {
            duration: self.duration.map(parse_duration).transpose()?,
            vplate: self.vplate,
            vmake: self.vmake,
            vmodel: self.vmodel,
            vcolor: self.vcolor,
            location_id: self.location,
            sublocation_id: self.sublocation,
            unit: self.unit,
            email: self.email,
            phone: self.default_phone,
            first_name: self.first_name,
            last_name: self.last_name,
            exp_date: self.exp_date,
        })
    }
}

fn parse_duration(duration: Numeric) -> AppResult<i32> {
    duration
        .to_i32()
        .ok_or_else(|| AppError::invalid_field("duration", DURATION_NOT_NUMERIC))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PermitsPayload {
    pub permits: Vec<PermitDetails>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PermitPayload {
    pub permit: PermitDetails,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPermitPayload {
    pub created_permit: PermitDetails,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedPermitPayload {
    pub updated_permit: PermitDetails,
}

/// Create permit routes
pub fn permit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_permits).post(create_permit))
        .route("/current-user", get(list_current_user_permits))
        .route("/update/:id", put(update_permit))
        .route("/delete", delete(delete_permits))
        .route("/:id", get(get_permit))
}

/// Request a visitor parking permit
///
/// The expiry is computed from the location's curfew reset and the server's
/// local clock.
#[utoipa::path(
    post,
    path = "/api/permits",
    tag = "Permits",
    request_body = CreatePermitRequest,
    responses(
        (status = 200, description = "Issued permit under `createdPermit`", body = CreatedPermitPayload),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Location or user not found"),
        (status = 409, description = "Plate already has an active permit, cumulative cap exceeded, or a concurrent request won")
    )
)]
pub async fn create_permit(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePermitRequest>,
) -> AppResult<ApiResponse<CreatedPermitPayload>> {
    let request = payload.into_request()?;
    let created_permit = state
        .permit_service
        .create_permit(request, Local::now().naive_local())
        .await?;

    Ok(ApiResponse::new(
        "Permit was created",
        CreatedPermitPayload { created_permit },
    ))
}

/// List every permit, newest first (admin)
#[utoipa::path(
    get,
    path = "/api/permits",
    tag = "Permits",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Permits under `permits`", body = PermitsPayload),
        (status = 401, description = "Not an admin")
    )
)]
pub async fn list_permits(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<ApiResponse<PermitsPayload>> {
    let permits = state.permit_service.list_permits().await?;
    Ok(ApiResponse::new("Permits were found", PermitsPayload { permits }))
}

/// List the caller's own permits, newest first
#[utoipa::path(
    get,
    path = "/api/permits/current-user",
    tag = "Permits",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Permits under `permits`", body = PermitsPayload),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_current_user_permits(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> AppResult<ApiResponse<PermitsPayload>> {
    let permits = state.permit_service.list_for_user(caller.id).await?;
    Ok(ApiResponse::new("Permits were found", PermitsPayload { permits }))
}

/// Get one permit (admin)
#[utoipa::path(
    get,
    path = "/api/permits/{id}",
    tag = "Permits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Permit id")),
    responses(
        (status = 200, description = "Permit under `permit`", body = PermitPayload),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "Permit not found")
    )
)]
pub async fn get_permit(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<PermitPayload>> {
    let permit = state.permit_service.get_permit(id).await?;
    Ok(ApiResponse::new("Permit was found", PermitPayload { permit }))
}

/// Edit a permit, including its expiry (admin)
#[utoipa::path(
    put,
    path = "/api/permits/update/{id}",
    tag = "Permits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Permit id")),
    request_body = UpdatePermitRequest,
    responses(
        (status = 200, description = "Permit under `updatedPermit`", body = UpdatedPermitPayload),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "Permit or location not found")
    )
)]
pub async fn update_permit(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdatePermitRequest>,
) -> AppResult<ApiResponse<UpdatedPermitPayload>> {
    let updated_permit = state
        .permit_service
        .update_permit(id, payload.into_changes()?)
        .await?;

    Ok(ApiResponse::new(
        "Permit was updated",
        UpdatedPermitPayload { updated_permit },
    ))
}

/// Delete permits by id (admin)
#[utoipa::path(
    delete,
    path = "/api/permits/delete",
    tag = "Permits",
    security(("bearer_auth" = [])),
    request_body(content = [i32], description = "Permit ids"),
    responses(
        (status = 200, description = "Row count under `deleted`", body = DeletedPayload),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "No permit matched")
    )
)]
pub async fn delete_permits(
    State(state): State<AppState>,
    _admin: AdminUser,
    body: Result<Json<Vec<i32>>, JsonRejection>,
) -> AppResult<ApiResponse<DeletedPayload>> {
    let deleted = state.permit_service.delete_permits(id_list(body)?).await?;
    Ok(ApiResponse::new(
        "Permit(s) was deleted",
        DeletedPayload { deleted },
    ))
}
