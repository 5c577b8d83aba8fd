//! Sublocation handlers.

use axum::{
    extract::{Path, State},
    routing::{delete, get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::required;
use crate::api::extractors::ValidatedJson;
use crate::api::middleware::AdminUser;
use crate::api::AppState;
use crate::config::{MAX_NAME_LENGTH, MIN_NAME_LENGTH};
use crate::domain::{Sublocation, SublocationDetails};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, NoPayload};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSublocationRequest {
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "please enter a sublocation name"))]
    #[schema(example = "Building B")]
    pub name: String,
    /// Parent location id
    #[validate(required(message = "Please select a location"))]
    #[schema(example = 1)]
    pub location: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSublocationRequest {
    #[validate(length(min = MIN_NAME_LENGTH, max = MAX_NAME_LENGTH, message = "please enter a sublocation name"))]
    #[schema(example = "Building C")]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SublocationsPayload {
    pub sublocations: Vec<SublocationDetails>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SublocationDetailPayload {
    pub sublocation: SublocationDetails,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SublocationPayload {
    pub sublocation: Sublocation,
}

/// Create sublocation routes
pub fn sublocation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sublocations).post(create_sublocation))
        .route("/update/:id", put(update_sublocation))
        .route("/delete/:id", delete(delete_sublocation))
        .route("/:id", get(get_sublocation))
}

/// List sublocations with their location
#[utoipa::path(
    get,
    path = "/api/sublocations",
    tag = "Sublocations",
    responses((status = 200, description = "Sublocations under `sublocations`", body = SublocationsPayload))
)]
pub async fn list_sublocations(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SublocationsPayload>> {
    let sublocations = state.location_service.list_sublocations().await?;
    Ok(ApiResponse::new(
        "Sublocations were found",
        SublocationsPayload { sublocations },
    ))
}

#[utoipa::path(
    get,
    path = "/api/sublocations/{id}",
    tag = "Sublocations",
    params(("id" = i32, Path, description = "Sublocation id")),
    responses(
        (status = 200, description = "Sublocation under `sublocation`", body = SublocationDetailPayload),
        (status = 404, description = "Sublocation not found")
    )
)]
pub async fn get_sublocation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<SublocationDetailPayload>> {
    let sublocation = state.location_service.get_sublocation(id).await?;
    Ok(ApiResponse::new(
        "Sublocation was found",
        SublocationDetailPayload { sublocation },
    ))
}

/// Add a sublocation to a location (admin)
#[utoipa::path(
    post,
    path = "/api/sublocations",
    tag = "Sublocations",
    security(("bearer_auth" = [])),
    request_body = CreateSublocationRequest,
    responses(
        (status = 201, description = "New sublocation under `sublocation`", body = SublocationPayload),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "Location not found")
    )
)]
pub async fn create_sublocation(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(payload): ValidatedJson<CreateSublocationRequest>,
) -> AppResult<Created<SublocationPayload>> {
    let location_id = required(payload.location, "location")?;
    let sublocation = state
        .location_service
        .create_sublocation(payload.name, location_id)
        .await?;

    Ok(Created(ApiResponse::new(
        "Sublocation was created",
        SublocationPayload { sublocation },
    )))
}

/// Rename a sublocation (admin)
#[utoipa::path(
    put,
    path = "/api/sublocations/update/{id}",
    tag = "Sublocations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Sublocation id")),
    request_body = UpdateSublocationRequest,
    responses(
        (status = 200, description = "Updated sublocation under `sublocation`", body = SublocationPayload),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "Sublocation not found")
    )
)]
pub async fn update_sublocation(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateSublocationRequest>,
) -> AppResult<ApiResponse<SublocationPayload>> {
    let sublocation = state
        .location_service
        .update_sublocation(id, payload.name)
        .await?;
    Ok(ApiResponse::new(
        "Sublocation was updated",
        SublocationPayload { sublocation },
    ))
}

#[utoipa::path(
    delete,
    path = "/api/sublocations/delete/{id}",
    tag = "Sublocations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Sublocation id")),
    responses(
        (status = 200, description = "Sublocation was deleted"),
        (status = 401, description = "Not an admin"),
        (status = 404, description = "Sublocation not found")
    )
)]
pub async fn delete_sublocation(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i32>,
) -> AppResult<ApiResponse<NoPayload>> {
    state.location_service.delete_sublocation(id).await?;
    Ok(ApiResponse::message("Sublocation was deleted"))
}
