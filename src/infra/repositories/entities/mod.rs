//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod location;
pub mod permit;
pub mod sublocation;
pub mod user;
