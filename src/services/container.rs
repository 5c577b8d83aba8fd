//! Service Container - Centralized service access.
//!
//! Builds every service over one shared Unit of Work.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, LocationManager, LocationService, PermitManager, PermitService,
    UserManager, UserService,
};
use crate::config::Config;
use crate::infra::{Persistence, UnitOfWork};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn locations(&self) -> Arc<dyn LocationService>;

    fn permits(&self) -> Arc<dyn PermitService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    location_service: Arc<dyn LocationService>,
    permit_service: Arc<dyn PermitService>,
}

impl Services {
    /// Services over the PostgreSQL Unit of Work
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        Self::from_unit_of_work(Arc::new(Persistence::new(db)), config)
    }

    /// Services over any Unit of Work (tests pass an in-memory one)
    pub fn from_unit_of_work<U: UnitOfWork + 'static>(uow: Arc<U>, config: Config) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            location_service: Arc::new(LocationManager::new(uow.clone())),
            permit_service: Arc::new(PermitManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn locations(&self) -> Arc<dyn LocationService> {
        self.location_service.clone()
    }

    fn permits(&self) -> Arc<dyn PermitService> {
        self.permit_service.clone()
    }
}
