//! HTTP request handlers.

use axum::{extract::rejection::JsonRejection, Json};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};

pub mod auth_handler;
pub mod location_handler;
pub mod permit_handler;
pub mod sublocation_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use location_handler::location_routes;
pub use permit_handler::permit_routes;
pub use sublocation_handler::sublocation_routes;
pub use user_handler::user_routes;

/// Optional leading `+`, 7 to 15 digits, common separators between them.
pub(crate) static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?(?:[ ().-]*[0-9]){7,15}[ ().-]*$").expect("phone pattern is valid")
});

/// Unwrap a field that passed a `required` rule.
pub(crate) fn required<T>(value: Option<T>, param: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::invalid_field(param, format!("{} is required", param)))
}

/// Row count returned by the bulk delete routes
#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedPayload {
    #[schema(example = 2)]
    pub deleted: u64,
}

/// Body of the bulk delete routes: a JSON array of ids.
pub(crate) fn id_list(body: Result<Json<Vec<i32>>, JsonRejection>) -> AppResult<Vec<i32>> {
    body.map(|Json(ids)| ids)
        .map_err(|e| AppError::validation(e.body_text()))
}
