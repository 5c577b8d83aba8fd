//! Domain layer - Core business entities and rules
//!
//! Entities (users, locations, permits), the password value object and the
//! permit eligibility policy. Nothing here touches storage or HTTP.

pub mod location;
pub mod password;
pub mod permit;
pub mod policy;
pub mod user;

pub use location::{
    default_curfew_reset, Location, LocationChanges, LocationWithSublocations, NewLocation,
    Sublocation, SublocationDetails,
};
pub use password::{Password, PASSWORD_POLICY_MESSAGE};
pub use permit::{
    normalize_plate, NewPermit, Permit, PermitChanges, PermitDetails, PermitRequest,
};
pub use policy::{PermitPolicy, PermitRejection};
pub use user::{NewUser, User, UserChanges, UserResponse, UserRole};
