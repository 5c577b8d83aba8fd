use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// Success envelope: `{ message: [..], success: true, ...payload }`.
///
/// The payload's fields are flattened next to `message` and `success`, so a
/// payload struct with a `created_permit` field yields `createdPermit`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: Vec<String>,
    pub success: bool,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: impl Into<String>, payload: T) -> Self {
        Self {
            message: vec![message.into()],
            success: true,
            payload,
        }
    }
}

impl ApiResponse<NoPayload> {
    /// Envelope carrying only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(message, NoPayload {})
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Empty payload for message-only responses
#[derive(Debug, Serialize)]
pub struct NoPayload {}

/// 201 variant of the success envelope
pub struct Created<T: Serialize>(pub ApiResponse<T>);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}
