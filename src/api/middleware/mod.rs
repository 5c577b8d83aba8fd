//! Request authentication.

mod auth;

pub use auth::{require_role, AdminUser, CurrentUser};
