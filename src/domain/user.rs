//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{is_valid_role, ROLE_ADMIN, ROLE_RESIDENT, ROLE_SUPERADMIN};
use crate::errors::{AppError, AppResult};

/// User roles, stored as their integer ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    SuperAdmin,
    Admin,
    Resident,
}

impl UserRole {
    pub fn id(&self) -> i32 {
        match self {
            UserRole::SuperAdmin => ROLE_SUPERADMIN,
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Resident => ROLE_RESIDENT,
        }
    }

    /// Strict conversion for ids coming from requests.
    pub fn parse(id: i32) -> AppResult<Self> {
        if is_valid_role(id) {
            Ok(Self::from(id))
        } else {
            Err(AppError::invalid_field("role", "Role must be 1, 2 or 4"))
        }
    }
}

/// Unknown ids fall back to the least privileged role.
impl From<i32> for UserRole {
    fn from(id: i32) -> Self {
        match id {
            ROLE_SUPERADMIN => UserRole::SuperAdmin,
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::Resident,
        }
    }
}

impl From<UserRole> for i32 {
    fn from(role: UserRole) -> Self {
        role.id()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::SuperAdmin => write!(f, "superadmin"),
            UserRole::Admin => write!(f, "admin"),
            UserRole::Resident => write!(f, "resident"),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub default_phone: Option<String>,
    pub role: UserRole,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to insert a user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub default_phone: Option<String>,
    pub role: UserRole,
    pub password_hash: String,
}

/// Partial user update. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the phone number
    pub default_phone: Option<Option<String>>,
    pub role: Option<UserRole>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "Jane")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[schema(example = "555-123-4567")]
    pub default_phone: Option<String>,
    /// 1 = superadmin, 2 = admin, 4 = resident
    #[schema(example = 4)]
    pub role: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            default_phone: user.default_phone,
            role: user.role.id(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
