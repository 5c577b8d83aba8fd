//! Parking permits - visitor parking permit backend
//!
//! Residents and visitors request time-bounded permits for a vehicle at a
//! location. A permit's expiry is anchored to the location's daily curfew
//! reset, a plate may hold only one active permit, and the days a plate has
//! accumulated are capped per location.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Entities and the permit eligibility policy
//! - **services**: Application use cases
//! - **infra**: PostgreSQL persistence (SeaORM)
//! - **api**: HTTP handlers, extractors and routes
//! - **types**: Shared response and input types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server (applies pending migrations)
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Create the first superadmin
//! cargo run -- admin create --email root@example.com --password Secret123
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, PermitPolicy, PermitRejection, User, UserRole};
pub use errors::{AppError, AppResult};
