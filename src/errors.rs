//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion into the
//! `{ errors: [...], success: false }` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::PermitRejection;

/// A single client-facing error entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub msg: String,
    /// Request field the message refers to, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

impl FieldError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: None,
        }
    }

    pub fn for_field(param: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: Some(param.into()),
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("No {0} was found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Permit(#[from] PermitRejection),

    // Validation
    #[error("{}", join_messages(.0))]
    Validation(Vec<FieldError>),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.msg.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error envelope body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    errors: Vec<ErrorEntry>,
    success: bool,
}

#[derive(Debug, Serialize)]
struct ErrorEntry {
    msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    param: Option<String>,
    code: &'static str,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Permit(PermitRejection::PlateAlreadyActive { .. }) => "PLATE_ALREADY_ACTIVE",
            AppError::Permit(PermitRejection::DurationCapExceeded { .. }) => "DURATION_CAP_EXCEEDED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::Permit(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing entries (hides internal details)
    fn entries(&self) -> Vec<FieldError> {
        match self {
            AppError::Validation(errors) => errors.clone(),

            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                vec![FieldError::new("A database error occurred")]
            }
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                vec![FieldError::new("Invalid or expired token")]
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                vec![FieldError::new("An internal error occurred")]
            }

            _ => vec![FieldError::new(self.to_string())],
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let body = ErrorResponse {
            errors: self
                .entries()
                .into_iter()
                .map(|e| ErrorEntry {
                    msg: e.msg,
                    param: e.param,
                    code,
                })
                .collect(),
            success: false,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, entity: &'static str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &'static str) -> AppResult<T> {
        self.ok_or(AppError::NotFound(entity))
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(msg)])
    }

    pub fn invalid_field(param: impl Into<String>, msg: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::for_field(param, msg)])
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
