//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and persistence through the Unit of
//! Work. Handlers only see the service traits.

mod auth_service;
pub mod container;
mod location_service;
mod permit_service;
mod user_service;

pub use container::{ServiceContainer, Services};

pub use auth_service::{AuthService, Authenticator, Claims, Registration, TokenResponse};
pub use location_service::{LocationManager, LocationService};
pub use permit_service::{PermitManager, PermitService};
pub use user_service::{NewAccount, UserManager, UserService};
