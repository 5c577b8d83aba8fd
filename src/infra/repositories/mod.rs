//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

use sea_orm::{DbErr, SqlErr};

use crate::errors::AppError;

pub(crate) mod entities;
mod location_repository;
mod permit_repository;
mod sublocation_repository;
mod user_repository;

pub use location_repository::{LocationRepository, LocationStore};
pub use permit_repository::{PermitRepository, PermitStore};
pub use sublocation_repository::{SublocationRepository, SublocationStore};
pub use user_repository::{UserRepository, UserStore};

pub(crate) use permit_repository::{find_by_plate, insert_permit};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use location_repository::MockLocationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use permit_repository::MockPermitRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use sublocation_repository::MockSublocationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;

/// Map a unique-index violation to a conflict carrying `message`.
pub(crate) fn conflict_on_unique(err: DbErr, message: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(message),
        _ => AppError::from(err),
    }
}
