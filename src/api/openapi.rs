//! OpenAPI documentation configuration.
//!
//! Served through Swagger UI at `/swagger-ui`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, location_handler, permit_handler, sublocation_handler, user_handler,
    DeletedPayload,
};
use crate::domain::{
    Location, LocationWithSublocations, Permit, PermitDetails, Sublocation, SublocationDetails,
    UserResponse,
};
use crate::services::TokenResponse;

/// OpenAPI documentation for the parking permits API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parking Permits API",
        version = "0.1.0",
        description = "Visitor parking permits with curfew-anchored expiry and per-plate duration caps. \
                       Successful responses wrap the documented payload as \
                       `{ message: [..], success: true, ...payload }`; failures are \
                       `{ errors: [{ msg, param?, code }], success: false }`.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        auth_handler::current_user,
        auth_handler::register,
        auth_handler::login,
        user_handler::list_users,
        user_handler::create_user,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::update_current_user,
        user_handler::delete_user,
        user_handler::change_password,
        permit_handler::create_permit,
        permit_handler::list_permits,
        permit_handler::list_current_user_permits,
        permit_handler::get_permit,
        permit_handler::update_permit,
        permit_handler::delete_permits,
        location_handler::list_locations,
        location_handler::get_location,
        location_handler::create_location,
        location_handler::update_location,
        location_handler::delete_locations,
        sublocation_handler::list_sublocations,
        sublocation_handler::get_sublocation,
        sublocation_handler::create_sublocation,
        sublocation_handler::update_sublocation,
        sublocation_handler::delete_sublocation,
    ),
    components(
        schemas(
            // Domain types
            UserResponse,
            Location,
            LocationWithSublocations,
            Sublocation,
            SublocationDetails,
            Permit,
            PermitDetails,
            TokenResponse,
            DeletedPayload,
            // Requests
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            user_handler::CreateUserRequest,
            user_handler::UpdateUserRequest,
            user_handler::ChangePasswordRequest,
            permit_handler::CreatePermitRequest,
            permit_handler::UpdatePermitRequest,
            location_handler::CreateLocationRequest,
            location_handler::UpdateLocationRequest,
            sublocation_handler::CreateSublocationRequest,
            sublocation_handler::UpdateSublocationRequest,
            // Payloads
            user_handler::UserPayload,
            user_handler::UsersPayload,
            permit_handler::PermitsPayload,
            permit_handler::PermitPayload,
            permit_handler::CreatedPermitPayload,
            permit_handler::UpdatedPermitPayload,
            location_handler::LocationsPayload,
            location_handler::LocationPayload,
            location_handler::LocationDetailPayload,
            sublocation_handler::SublocationsPayload,
            sublocation_handler::SublocationPayload,
            sublocation_handler::SublocationDetailPayload,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and the caller's profile"),
        (name = "Users", description = "Account administration"),
        (name = "Permits", description = "Permit requests and administration"),
        (name = "Locations", description = "Locations and their permit limits"),
        (name = "Sublocations", description = "Buildings and areas inside a location")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
