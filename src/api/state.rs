//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, LocationService, PermitService, ServiceContainer, Services, UserService,
};

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub location_service: Arc<dyn LocationService>,
    pub permit_service: Arc<dyn PermitService>,
    /// Used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire every service over the database connection.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let services = Services::from_connection(database.get_connection(), config);
        Self::from_services(&services, database)
    }

    /// Take services from an existing container.
    pub fn from_services(services: &dyn ServiceContainer, database: Arc<Database>) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            location_service: services.locations(),
            permit_service: services.permits(),
            database,
        }
    }
}
