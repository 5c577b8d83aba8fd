//! Location handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, get, put},
    Json, Router,
};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{id_list, DeletedPayload};
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::AdminUser;
use crate::api::AppState;
use crate::config::{MAX_NAME_LENGTH, MIN_NAME_LENGTH};
use crate::domain::{Location, LocationChanges, LocationWithSublocations, NewLocation};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationRequest {
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "please enter a location name"))]
    #[schema(example = "Maple Court")]
    pub name: String,
    /// Defaults to 31
    #[validate(range(min = 0, message = "max form duration cannot be negative"))]
    #[schema(example = 31)]
    pub max_form_duration: Option<i32>,
    /// Defaults to 31; 0 disables the cumulative cap
    #[validate(range(min = 0, message = "max monthly duration cannot be negative"))]
    #[schema(example = 31)]
    pub max_monthly_duration: Option<i32>,
    /// `HH:MM:SS`, defaults to 23:59:59
    #[schema(value_type = Option<String>, example = "23:59:59")]
    pub curfew_reset: Option<NaiveTime>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "please enter a location name"))]
    pub name: Option<String>,
    #[validate(range(min = 0, message = "max form duration cannot be negative"))]
    pub max_form_duration: Option<i32>,
    #[validate(range(min = 0, message = "max monthly duration cannot be negative"))]
    pub max_monthly_duration: Option<i32>,
    #[schema(value_type = Option<String>, example = "22:00:00")]
    pub curfew_reset: Option<NaiveTime>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationsPayload {
    pub locations: Vec<LocationWithSublocations>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationDetailPayload {
    pub location: LocationWithSublocations,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationPayload {
    pub location: Location,
}

/// Create location routes
pub fn location_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route("/update/:id", put(update_location))
        .route("/delete", delete(delete_locations))
        .route("/:id", get(get_location))
}

/// List locations with their sublocations
#[utoipa::path(
    get,
    path = "/api/locations",
    tag = "Locations",
    responses((status = 200, description = "Locations under `locations`", body = LocationsPayload))
)]
pub async fn list_locations(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<LocationsPayload>> {
    let locations = state.location_service.list_locations().await?;
    Ok(ApiResponse::new(
        "Locations were found",
        LocationsPayload { locations },
    ))
}

/// Get one location with its sublocations
#[utoipa::path(
    get,
    path = "/api/locations/{id}",
    tag = "Locations",
    params(("id" = i32, Path, description = "Location id")),
    responses(
        (status = 200, description = "Location under `location`", body = LocationDetailPayload),
        (status = 404, description = "Location not found")
    )
)]
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<LocationDetailPayload>> {
    let location = state.location_service.get_location(id).await?;
    Ok(ApiResponse::new(
        "Location was found",
        LocationDetailPayload { location },
    ))
}

/// Create a location (admin)
#[utoipa::path(
    post,
    path = "/api/locations",
    tag = "Locations",
    security(("bearer_auth" = [])),
    request_body = CreateLocationRequest,
    responses(
        (status = 201, description = "New location under `location`", body = LocationPayload),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not an admin"),
        (status = 409, description = "Location name already exists")
    )
)]
pub async fn create_location(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(payload): ValidatedJson<CreateLocationRequest>,
) -> AppResult<Created<LocationPayload>> {
    let location = state
        .location_service
        .create_location(NewLocation::with_defaults(
            payload.name,
            payload.max_form_duration,
            payload.max_monthly_duration,
            payload.curfew_reset,
        ))
        .await?;

    Ok(Created(ApiResponse::new(
        "Location was created",
        LocationPayload { location },
    )))
}

/// Edit a location (admin)
#[utoipa::path(
    put,
    path = "/api/locations/update/{id}",
    tag = "Locations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Location id")),
    request_body = UpdateLocationRequest,
    responses(
        (status = 200, description = "Updated location under `location`", body = LocationPayload),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "Location not found")
    )
)]
pub async fn update_location(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateLocationRequest>,
) -> AppResult<ApiResponse<LocationPayload>> {
    let location = state
        .location_service
        .update_location(
            id,
            LocationChanges {
                name: payload.name,
                max_form_duration: payload.max_form_duration,
                max_monthly_duration: payload.max_monthly_duration,
                curfew_reset: payload.curfew_reset,
            },
        )
        .await?;

    Ok(ApiResponse::new(
        "Location was updated",
        LocationPayload { location },
    ))
}

/// Delete locations with their sublocations and permits (admin)
#[utoipa::path(
    delete,
    path = "/api/locations/delete",
    tag = "Locations",
    security(("bearer_auth" = [])),
    request_body(content = [i32], description = "Location ids"),
    responses(
        (status = 200, description = "Row count under `deleted`", body = DeletedPayload),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "No location matched")
    )
)]
pub async fn delete_locations(
    State(state): State<AppState>,
    _admin: AdminUser,
    body: Result<Json<Vec<i32>>, JsonRejection>,
) -> AppResult<ApiResponse<DeletedPayload>> {
    let deleted = state.location_service.delete_locations(id_list(body)?).await?;
    Ok(ApiResponse::new(
        "Location(s) was deleted",
        DeletedPayload { deleted },
    ))
}
