//! Infrastructure layer - PostgreSQL persistence
//!
//! Database connection and migrations, SeaORM repositories, and the Unit of
//! Work that hands them to services.

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    LocationRepository, LocationStore, PermitRepository, PermitStore, SublocationRepository,
    SublocationStore, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use unit_of_work::MockUnitOfWork;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockLocationRepository, MockPermitRepository, MockSublocationRepository, MockUserRepository,
};
